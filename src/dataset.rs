//! Read-only tabular dataset abstraction.
//!
//! The dataset is the shared, immutable context of every rule evaluation:
//! attribute definitions (numeric or nominal), instance values with an
//! explicit missing-value marker, and a class label per instance. Loading
//! and parsing (ARFF, CSV, ...) are the consumer's responsibility; this
//! module only defines the shape the refinement engine reads from.

/// An attribute of the dataset, excluding the class attribute.
///
/// The class attribute is not part of the attribute list: rules never
/// constrain it, and instances carry their class label separately.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    /// A numeric attribute with the [min, max] range its fuzzy linguistic
    /// labels must span.
    Numeric {
        /// Attribute name.
        name: String,
        /// Lower bound observed (or declared) for the attribute.
        min: f64,
        /// Upper bound observed (or declared) for the attribute.
        max: f64,
    },
    /// A nominal attribute with a fixed category list.
    Nominal {
        /// Attribute name.
        name: String,
        /// Category names; instance values index into this list.
        categories: Vec<String>,
    },
}

impl Attribute {
    /// Returns the attribute name.
    pub fn name(&self) -> &str {
        match self {
            Attribute::Numeric { name, .. } => name,
            Attribute::Nominal { name, .. } => name,
        }
    }

    /// Returns `true` for numeric attributes.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Attribute::Numeric { .. })
    }

    /// Number of categories of a nominal attribute, `None` for numeric.
    pub fn cardinality(&self) -> Option<usize> {
        match self {
            Attribute::Numeric { .. } => None,
            Attribute::Nominal { categories, .. } => Some(categories.len()),
        }
    }
}

/// One row of the dataset.
///
/// Values are stored positionally, one per [`Attribute`]; `None` marks a
/// missing value. Nominal values hold the category index as `f64`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    /// Attribute values, `None` = missing.
    pub values: Vec<Option<f64>>,
    /// Class label index, in `0..dataset.num_classes()`.
    pub class: usize,
}

/// An immutable labeled tabular dataset.
///
/// # Examples
///
/// ```
/// use fuzzy_epm::dataset::{Attribute, Dataset};
///
/// let mut data = Dataset::new(
///     vec![Attribute::Numeric { name: "x".into(), min: 0.0, max: 10.0 }],
///     2,
/// );
/// data.push(vec![Some(7.0)], 1).unwrap();
/// assert_eq!(data.num_instances(), 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset {
    attributes: Vec<Attribute>,
    num_classes: usize,
    instances: Vec<Instance>,
}

impl Dataset {
    /// Creates an empty dataset with the given attribute definitions and
    /// number of distinct class labels.
    pub fn new(attributes: Vec<Attribute>, num_classes: usize) -> Self {
        Self {
            attributes,
            num_classes,
            instances: Vec::new(),
        }
    }

    /// Appends one instance, validating its shape against the attribute
    /// definitions.
    pub fn push(&mut self, values: Vec<Option<f64>>, class: usize) -> Result<(), String> {
        if values.len() != self.attributes.len() {
            return Err(format!(
                "instance has {} values, dataset has {} attributes",
                values.len(),
                self.attributes.len()
            ));
        }
        if class >= self.num_classes {
            return Err(format!(
                "class index {} out of range (num_classes = {})",
                class, self.num_classes
            ));
        }
        for (i, value) in values.iter().enumerate() {
            if let (Some(v), Some(card)) = (value, self.attributes[i].cardinality()) {
                let idx = *v as usize;
                if *v < 0.0 || idx >= card {
                    return Err(format!(
                        "nominal value {} out of range for attribute '{}' ({} categories)",
                        v,
                        self.attributes[i].name(),
                        card
                    ));
                }
            }
        }
        self.instances.push(Instance { values, class });
        Ok(())
    }

    /// Recomputes the [min, max] bounds of every numeric attribute from the
    /// instances currently loaded. Attributes with no observed value keep
    /// their declared bounds.
    pub fn fit_bounds(&mut self) {
        for (i, attr) in self.attributes.iter_mut().enumerate() {
            if let Attribute::Numeric { min, max, .. } = attr {
                let mut lo = f64::INFINITY;
                let mut hi = f64::NEG_INFINITY;
                for inst in &self.instances {
                    if let Some(v) = inst.values[i] {
                        lo = lo.min(v);
                        hi = hi.max(v);
                    }
                }
                if lo.is_finite() && hi.is_finite() {
                    *min = lo;
                    *max = hi;
                }
            }
        }
    }

    /// Number of attributes (the class attribute is not counted).
    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Number of distinct class labels.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Number of instances.
    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    /// Returns the `i`-th attribute definition.
    pub fn attribute(&self, i: usize) -> &Attribute {
        &self.attributes[i]
    }

    /// All attribute definitions.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// All instances.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }
}
