//! Bit-encoded rule representation.
//!
//! A rule is an ordered sequence of *variables*, one per dataset attribute
//! (the class attribute excluded). Each variable is a fixed-width bit
//! pattern selecting a subset of fuzzy linguistic labels (numeric
//! attribute) or nominal categories. Rules are value objects: every slot
//! the search tracks (current, elite, candidate) owns an independent deep
//! copy, never a shared alias.

use bitvec::prelude::*;
use rand::Rng;

use crate::dataset::{Attribute, Dataset};

/// A bit-encoded candidate emerging pattern targeting one class.
///
/// A variable *participates* in the rule iff its bit pattern is a strict
/// non-empty, non-full subset of its width; all-zero and all-one patterns
/// are "don't care". A rule where no variable participates is *empty*,
/// which is a defined (worst-quality) state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    variables: Vec<BitVec>,
    class: usize,
}

impl Rule {
    /// Creates an all-zero (empty) rule shaped for `dataset`: numeric
    /// variables are `num_labels` bits wide, nominal variables one bit per
    /// category.
    pub fn empty(dataset: &Dataset, num_labels: usize, class: usize) -> Self {
        let variables = dataset
            .attributes()
            .iter()
            .map(|attr| match attr {
                Attribute::Numeric { .. } => bitvec![0; num_labels],
                Attribute::Nominal { categories, .. } => bitvec![0; categories.len()],
            })
            .collect();
        Self { variables, class }
    }

    /// Creates a rule with every bit set independently with probability
    /// 0.5. Used by callers to seed a search and by tests.
    pub fn random<R: Rng>(dataset: &Dataset, num_labels: usize, class: usize, rng: &mut R) -> Self {
        let mut rule = Self::empty(dataset, num_labels, class);
        for variable in &mut rule.variables {
            for j in 0..variable.len() {
                variable.set(j, rng.random_bool(0.5));
            }
        }
        rule
    }

    /// The target class this rule discriminates.
    pub fn class(&self) -> usize {
        self.class
    }

    /// Number of variables (= number of non-class attributes).
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Bit width of variable `var`.
    pub fn width(&self, var: usize) -> usize {
        self.variables[var].len()
    }

    /// The bit pattern of variable `var`.
    pub fn variable(&self, var: usize) -> &BitSlice {
        &self.variables[var]
    }

    /// Replaces the bit pattern of variable `var`.
    ///
    /// # Panics
    ///
    /// Panics if the new pattern's width differs from the variable's
    /// width; changing a variable's width would break the rule/dataset
    /// correspondence.
    pub fn set_variable(&mut self, var: usize, pattern: BitVec) {
        assert_eq!(
            pattern.len(),
            self.variables[var].len(),
            "variable {} has width {}, replacement has width {}",
            var,
            self.variables[var].len(),
            pattern.len()
        );
        self.variables[var] = pattern;
    }

    /// Whether variable `var` participates in the rule (strict non-empty,
    /// non-full subset of bits set).
    pub fn participates(&self, var: usize) -> bool {
        let ones = self.variables[var].count_ones();
        ones > 0 && ones < self.variables[var].len()
    }

    /// Whether no variable participates. Empty rules evaluate to the worst
    /// possible quality.
    pub fn is_empty(&self) -> bool {
        (0..self.variables.len()).all(|var| !self.participates(var))
    }
}
