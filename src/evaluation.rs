//! Fuzzy rule evaluation against a dataset.
//!
//! The hot path of the whole engine: every candidate the tabu search
//! generates is scored through one pass over all dataset rows, computing a
//! fuzzy firing degree per row and tallying a contingency table against
//! the rule's target class. This pass runs hundreds of thousands of times
//! per refinement run, so it is pure, allocation-free per row, and can
//! fan out over rows behind the `parallel` feature.

use thiserror::Error;

use crate::dataset::{Attribute, Dataset, Instance};
use crate::fuzzy::FuzzyLabels;
use crate::rule::Rule;

/// Fatal evaluation-invariant violations.
///
/// These signal a bug in the evaluator or in a quality measure, not a data
/// issue: they propagate up and terminate the run rather than being
/// silently substituted with a default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The contingency table's total does not match the dataset size.
    #[error("contingency table total {actual} does not match dataset size {expected}")]
    InvalidTable {
        /// Expected total (number of dataset instances).
        expected: usize,
        /// Total actually found in the table.
        actual: usize,
    },
    /// A quality measure produced NaN or a value outside its defined range.
    #[error("measure {measure} produced an invalid quality value: {value}")]
    InvalidQuality {
        /// Short name of the offending measure.
        measure: &'static str,
        /// The invalid value.
        value: f64,
    },
}

/// Counts summarizing rule coverage vs. the target class across a dataset.
///
/// Built fresh per (rule, dataset) evaluation and immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContingencyTable {
    /// Covered instances of the target class.
    pub tp: usize,
    /// Covered instances of other classes.
    pub fp: usize,
    /// Uncovered instances of other classes.
    pub tn: usize,
    /// Uncovered instances of the target class.
    pub fn_: usize,
}

impl ContingencyTable {
    /// Creates a table from its four counts.
    pub fn new(tp: usize, fp: usize, tn: usize, fn_: usize) -> Self {
        Self { tp, fp, tn, fn_ }
    }

    /// Total number of observations.
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Checks the table covers exactly `expected` observations.
    pub fn validate(&self, expected: usize) -> Result<(), EvalError> {
        if self.total() != expected {
            return Err(EvalError::InvalidTable {
                expected,
                actual: self.total(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TP: {}  FP: {}  TN: {}  FN: {}",
            self.tp, self.fp, self.tn, self.fn_
        )
    }
}

/// Computes the fuzzy firing degree of `rule` on one instance, in [0, 1].
///
/// The degree starts at 1.0 and is AND-combined (min) across participating
/// attributes:
///
/// - nominal attribute: crisp membership — if the instance's category bit
///   is not set in the rule's variable, the whole degree drops to zero;
/// - numeric attribute: fuzzy OR (max) of the membership degrees of the
///   selected labels at the instance's value, then min-accumulated;
/// - missing values contribute no constraint for their attribute.
///
/// Zero is absorbing, so remaining attributes are skipped once reached.
/// Pure function of its inputs.
pub fn firing_degree(
    rule: &Rule,
    labels: &FuzzyLabels,
    dataset: &Dataset,
    instance: &Instance,
) -> f64 {
    let mut trigger = 1.0_f64;

    for var in 0..dataset.num_attributes() {
        if trigger <= 0.0 {
            break;
        }
        if !rule.participates(var) {
            continue;
        }
        let Some(value) = instance.values[var] else {
            continue;
        };
        match dataset.attribute(var) {
            Attribute::Nominal { .. } => {
                if !rule.variable(var)[value as usize] {
                    trigger = 0.0;
                }
            }
            Attribute::Numeric { .. } => {
                let mut belonging = 0.0_f64;
                for (k, set) in labels.labels(var).iter().enumerate() {
                    if rule.variable(var)[k] {
                        belonging = belonging.max(set.membership(value));
                    }
                }
                trigger = trigger.min(belonging);
            }
        }
    }

    trigger
}

/// Builds the contingency table of `rule` over the whole dataset.
///
/// A row is covered iff its firing degree is strictly positive. Empty
/// rules produce the all-zero table; callers score that state with the
/// worst-quality sentinel instead of running a measure over zeros.
pub fn contingency_table(rule: &Rule, labels: &FuzzyLabels, dataset: &Dataset) -> ContingencyTable {
    if rule.is_empty() {
        return ContingencyTable::default();
    }

    let mut table = ContingencyTable::default();
    for instance in dataset.instances() {
        tally(&mut table, rule, labels, dataset, instance);
    }
    table
}

/// Parallel variant of [`contingency_table`]: fans out over rows with
/// rayon and fan-ins via count reduction. The dataset and label table are
/// read-only for the duration, so no state is shared mutably.
#[cfg(feature = "parallel")]
pub fn contingency_table_par(
    rule: &Rule,
    labels: &FuzzyLabels,
    dataset: &Dataset,
) -> ContingencyTable {
    use rayon::prelude::*;

    if rule.is_empty() {
        return ContingencyTable::default();
    }

    dataset
        .instances()
        .par_iter()
        .map(|instance| {
            let mut table = ContingencyTable::default();
            tally(&mut table, rule, labels, dataset, instance);
            table
        })
        .reduce(ContingencyTable::default, |a, b| {
            ContingencyTable::new(a.tp + b.tp, a.fp + b.fp, a.tn + b.tn, a.fn_ + b.fn_)
        })
}

fn tally(
    table: &mut ContingencyTable,
    rule: &Rule,
    labels: &FuzzyLabels,
    dataset: &Dataset,
    instance: &Instance,
) {
    let covered = firing_degree(rule, labels, dataset, instance) > 0.0;
    let matches = instance.class == rule.class();
    match (covered, matches) {
        (true, true) => table.tp += 1,
        (true, false) => table.fp += 1,
        (false, false) => table.tn += 1,
        (false, true) => table.fn_ += 1,
    }
}
