//! Tabu-search refinement engine for fuzzy emerging-pattern mining.
//!
//! Emerging patterns are fuzzy rules over a labeled tabular dataset that
//! discriminate one class from the rest. An outer population-based search
//! (genetic algorithm, memetic algorithm, ...) owns the population; this
//! crate implements the single-solution local refinement it periodically
//! delegates to:
//!
//! - **Rule representation**: a bit-encoded rule with one variable (bit
//!   segment) per dataset attribute, selecting fuzzy linguistic labels or
//!   nominal categories.
//! - **Fuzzy evaluation**: a pure single pass over the dataset that turns a
//!   rule into a {tp, fp, tn, fn} contingency table via fuzzy membership
//!   degrees.
//! - **Quality scoring**: Normalized Weighted Relative Accuracy over the
//!   contingency table.
//! - **Tabu search**: a fixed-budget walk with unconditional acceptance,
//!   elite tracking, a FIFO tabu list over recently mutated bit patterns,
//!   and a long-term frequency memory that drives reinitialization on
//!   stagnation.
//!
//! # Architecture
//!
//! The crate contains no I/O: dataset loading, report writing, and the
//! outer evolutionary loop are all defined by consumers. The caller hands
//! [`tabu::TabuRunner`] an immutable dataset, a precomputed fuzzy label
//! table, and one or more rules; it gets back refined clones and never has
//! its own rule objects mutated in place.

pub mod dataset;
pub mod evaluation;
pub mod fuzzy;
pub mod quality;
pub mod rule;
pub mod tabu;
