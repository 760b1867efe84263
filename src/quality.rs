//! Quality measures over contingency tables.
//!
//! The wider catalog of emerging-pattern quality measures lives with the
//! outer search; the refinement engine only needs the measure it scores
//! candidates with, so the measures are a closed variant rather than an
//! open hierarchy.

use crate::evaluation::{ContingencyTable, EvalError};

/// The quality measure the tabu search compares candidates with.
///
/// Higher is better for both variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measure {
    /// Weighted Relative Accuracy: `coverage * (confidence - classPct)`,
    /// in [-1, 1].
    WRAcc,
    /// WRAcc rescaled into [0, 1] by its class-dependent extreme values.
    /// The engine's default.
    #[default]
    WRAccNorm,
}

impl Measure {
    /// Short name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Measure::WRAcc => "WRAcc",
            Measure::WRAccNorm => "WRAcc_Norm",
        }
    }

    /// Computes the measure's value for `table`.
    ///
    /// Defined for every well-formed table: a zero total, an uncovered
    /// rule (`tp + fp = 0`), and a degenerate class distribution all map
    /// to 0 rather than NaN.
    pub fn value(&self, table: &ContingencyTable) -> f64 {
        match self {
            Measure::WRAcc => wracc(table),
            Measure::WRAccNorm => wracc_norm(table),
        }
    }

    /// Checks `value` against the measure's defined range, surfacing NaN
    /// or out-of-range values as a hard error.
    pub fn validate(&self, value: f64) -> Result<(), EvalError> {
        let in_range = match self {
            Measure::WRAcc => (-1.0..=1.0).contains(&value),
            Measure::WRAccNorm => (0.0..=1.0).contains(&value),
        };
        if value.is_nan() || !in_range {
            return Err(EvalError::InvalidQuality {
                measure: self.name(),
                value,
            });
        }
        Ok(())
    }
}

fn wracc(table: &ContingencyTable) -> f64 {
    let total = table.total() as f64;
    if total == 0.0 {
        return 0.0;
    }
    let class_pct = (table.tp + table.fn_) as f64 / total;
    let coverage = (table.tp + table.fp) as f64 / total;
    let confidence = if table.tp + table.fp == 0 {
        0.0
    } else {
        table.tp as f64 / (table.tp + table.fp) as f64
    };
    coverage * (confidence - class_pct)
}

fn wracc_norm(table: &ContingencyTable) -> f64 {
    let total = table.total() as f64;
    let class_pct = if total == 0.0 {
        0.0
    } else {
        (table.tp + table.fn_) as f64 / total
    };

    let min_unus = (1.0 - class_pct) * (0.0 - class_pct);
    let max_unus = class_pct * (1.0 - class_pct);

    if max_unus - min_unus == 0.0 {
        return 0.0;
    }
    (wracc(table) - min_unus) / (max_unus - min_unus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_wracc_perfect_separation() {
        // Covers exactly the target class: tp=2, tn=2.
        let table = ContingencyTable::new(2, 0, 2, 0);
        // coverage = 0.5, confidence = 1.0, classPct = 0.5
        assert_relative_eq!(Measure::WRAcc.value(&table), 0.25);
        assert_relative_eq!(Measure::WRAccNorm.value(&table), 1.0);
    }

    #[test]
    fn test_wracc_norm_uninformative_rule_is_midpoint() {
        // Covers everything: confidence equals classPct, raw WRAcc is 0.
        let table = ContingencyTable::new(2, 2, 0, 0);
        assert_relative_eq!(Measure::WRAcc.value(&table), 0.0);
        // 0 sits between minUnus = -0.25 and maxUnus = 0.25.
        assert_relative_eq!(Measure::WRAccNorm.value(&table), 0.5);
    }

    #[test]
    fn test_zero_total_scores_zero() {
        let table = ContingencyTable::default();
        assert_eq!(Measure::WRAcc.value(&table), 0.0);
        assert_eq!(Measure::WRAccNorm.value(&table), 0.0);
    }

    #[test]
    fn test_degenerate_class_distribution_scores_zero() {
        // Every instance belongs to the target class: classPct = 1, the
        // normalization denominator collapses.
        let table = ContingencyTable::new(3, 0, 0, 1);
        assert_eq!(Measure::WRAccNorm.value(&table), 0.0);
    }

    #[test]
    fn test_validate_rejects_nan_and_out_of_range() {
        assert!(Measure::WRAccNorm.validate(f64::NAN).is_err());
        assert!(Measure::WRAccNorm.validate(1.5).is_err());
        assert!(Measure::WRAccNorm.validate(-0.1).is_err());
        assert!(Measure::WRAccNorm.validate(0.0).is_ok());
        assert!(Measure::WRAccNorm.validate(1.0).is_ok());
        assert!(Measure::WRAcc.validate(-0.5).is_ok());
        assert!(Measure::WRAcc.validate(-1.5).is_err());
    }

    proptest! {
        /// For any table with total > 0, Normalized WRAcc stays in [0, 1]
        /// and never produces NaN.
        #[test]
        fn prop_wracc_norm_in_unit_range(
            tp in 0usize..200,
            fp in 0usize..200,
            tn in 0usize..200,
            fn_ in 0usize..200,
        ) {
            prop_assume!(tp + fp + tn + fn_ > 0);
            let table = ContingencyTable::new(tp, fp, tn, fn_);
            let value = Measure::WRAccNorm.value(&table);
            prop_assert!(!value.is_nan());
            prop_assert!((0.0..=1.0).contains(&value), "out of range: {}", value);
        }

        /// Raw WRAcc stays within [-1, 1].
        #[test]
        fn prop_wracc_bounded(
            tp in 0usize..200,
            fp in 0usize..200,
            tn in 0usize..200,
            fn_ in 0usize..200,
        ) {
            let table = ContingencyTable::new(tp, fp, tn, fn_);
            let value = Measure::WRAcc.value(&table);
            prop_assert!(!value.is_nan());
            prop_assert!((-1.0..=1.0).contains(&value));
        }
    }
}
