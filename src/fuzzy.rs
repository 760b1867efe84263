//! Fuzzy membership functions and linguistic label generation.
//!
//! Each numeric attribute gets an ordered list of membership functions
//! ("linguistic labels") spanning its [min, max] range. The label table is
//! built once per dataset and shared read-only by every rule evaluation.

use crate::dataset::{Attribute, Dataset};

/// A fuzzy membership function, evaluable at a scalar value.
///
/// Modeled as a closed variant rather than a trait object: the engine only
/// ever needs the membership degree, and the three shapes below cover the
/// label generators in use.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MembershipFunction {
    /// Triangular function with feet `a`, `c` and peak `b` (`a <= b <= c`).
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoidal function with feet `a`, `d` and plateau `[b, c]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Gaussian function centered at `mean` with width `sigma`.
    Gaussian { mean: f64, sigma: f64 },
}

impl MembershipFunction {
    /// Membership degree of `x`, in [0, 1].
    pub fn membership(&self, x: f64) -> f64 {
        match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x <= a || x >= c {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else if x > b {
                    (c - x) / (c - b)
                } else {
                    1.0
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    1.0 - ((x - c) / (d - c))
                }
            }
            MembershipFunction::Gaussian { mean, sigma } => {
                (-(x - mean) * (x - mean) / (2.0 * sigma * sigma)).exp()
            }
        }
    }
}

/// Snaps `val` onto 0 or onto `bound` when it lands within epsilon of
/// either, compensating for the accumulation error of the uniform
/// partition arithmetic.
fn snap(val: f64, bound: f64) -> f64 {
    if val > -1e-4 && val < 1e-4 {
        0.0
    } else if val > bound - 1e-4 && val < bound + 1e-4 {
        bound
    } else {
        val
    }
}

/// Generates `num_labels` triangular linguistic labels uniformly covering
/// `[min, max]`.
///
/// Adjacent labels overlap at membership 0.5; the first and last labels
/// extend their outer feet to `±f64::MAX` so that values at (or slightly
/// past) the range bounds keep full membership. `f64::MAX` is used instead
/// of infinity so the slope arithmetic stays finite.
pub fn triangular_labels(min: f64, max: f64, num_labels: usize) -> Vec<MembershipFunction> {
    assert!(num_labels >= 2, "at least 2 linguistic labels are required");
    let step = (max - min) / ((num_labels - 1) as f64);
    let mut labels = Vec::with_capacity(num_labels);

    for label in 0..num_labels {
        let a = if label == 0 {
            -f64::MAX
        } else {
            snap(min + step * ((label as f64) - 1.0), max)
        };
        let b = snap(min + step * (label as f64), max);
        let c = if label == num_labels - 1 {
            f64::MAX
        } else {
            snap(min + step * ((label as f64) + 1.0), max)
        };
        labels.push(MembershipFunction::Triangular { a, b, c });
    }

    labels
}

/// The precomputed fuzzy label table of a dataset: one label list per
/// numeric attribute, an empty list per nominal attribute.
///
/// # Examples
///
/// ```
/// use fuzzy_epm::dataset::{Attribute, Dataset};
/// use fuzzy_epm::fuzzy::FuzzyLabels;
///
/// let data = Dataset::new(
///     vec![Attribute::Numeric { name: "x".into(), min: 0.0, max: 10.0 }],
///     2,
/// );
/// let labels = FuzzyLabels::build(&data, 3);
/// assert_eq!(labels.labels(0).len(), 3);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuzzyLabels {
    per_attribute: Vec<Vec<MembershipFunction>>,
    num_labels: usize,
}

impl FuzzyLabels {
    /// Builds the label table for `dataset` with `num_labels` labels per
    /// numeric attribute.
    pub fn build(dataset: &Dataset, num_labels: usize) -> Self {
        let per_attribute = dataset
            .attributes()
            .iter()
            .map(|attr| match attr {
                Attribute::Numeric { min, max, .. } => triangular_labels(*min, *max, num_labels),
                Attribute::Nominal { .. } => Vec::new(),
            })
            .collect();
        Self {
            per_attribute,
            num_labels,
        }
    }

    /// Label list of attribute `var` (empty for nominal attributes).
    pub fn labels(&self, var: usize) -> &[MembershipFunction] {
        &self.per_attribute[var]
    }

    /// Labels generated per numeric attribute.
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }
}
