//! Tabu-search local refinement.
//!
//! A single-solution trajectory metaheuristic over bit-encoded rules: a
//! fixed-budget walk with unconditional acceptance, a short-term FIFO tabu
//! list over recently mutated variable patterns, and a long-term frequency
//! memory that rebuilds a stagnating rule from its extreme entries.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod runner;
mod types;

pub use config::TabuConfig;
pub use runner::{PopulationResult, TabuResult, TabuRunner};
pub use types::{LongTermMemory, SearchContext, TabuList};
