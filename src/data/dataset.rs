//! In-memory column dataset.
//!
//! This is the canonical owned [`FeatureSource`] for growing trees.

use crate::Float;

use super::error::ConfigurationError;
use super::traits::{check_category, check_n_categories, FeatureKind, FeatureSource};

/// A single feature column.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureColumn {
    /// Numeric feature values (one per row).
    Numeric { name: Option<String>, values: Vec<Float> },
    /// Categorical feature values (one per row).
    ///
    /// Values are category indices in `0..n_categories`.
    Categorical {
        name: Option<String>,
        values: Vec<u32>,
        n_categories: u32,
    },
}

impl FeatureColumn {
    /// Unnamed numeric column.
    pub fn numeric(values: Vec<Float>) -> Self {
        FeatureColumn::Numeric { name: None, values }
    }

    /// Unnamed categorical column.
    pub fn categorical(values: Vec<u32>, n_categories: u32) -> Self {
        FeatureColumn::Categorical {
            name: None,
            values,
            n_categories,
        }
    }

    /// Feature name, if present.
    pub fn name(&self) -> Option<&str> {
        match self {
            FeatureColumn::Numeric { name, .. } => name.as_deref(),
            FeatureColumn::Categorical { name, .. } => name.as_deref(),
        }
    }

    /// Declared kind of this column.
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureColumn::Numeric { .. } => FeatureKind::Continuous,
            FeatureColumn::Categorical { n_categories, .. } => FeatureKind::Categorical {
                n_categories: *n_categories,
            },
        }
    }

    /// Number of rows in this column.
    pub fn len(&self) -> usize {
        match self {
            FeatureColumn::Numeric { values, .. } => values.len(),
            FeatureColumn::Categorical { values, .. } => values.len(),
        }
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn value(&self, row: usize) -> Float {
        match self {
            FeatureColumn::Numeric { values, .. } => values[row],
            FeatureColumn::Categorical { values, .. } => values[row] as Float,
        }
    }

    fn validate(&self, feature: usize) -> Result<(), ConfigurationError> {
        match self {
            FeatureColumn::Numeric { .. } => Ok(()),
            FeatureColumn::Categorical {
                values,
                n_categories,
                ..
            } => {
                check_n_categories(feature, *n_categories)?;
                match values.iter().position(|&v| v >= *n_categories) {
                    Some(sample) => Err(ConfigurationError::CategoryOutOfRange {
                        feature,
                        sample,
                        value: values[sample] as Float,
                        n_categories: *n_categories,
                    }),
                    None => Ok(()),
                }
            }
        }
    }
}

/// A column-oriented dataset with responses and optional weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Vec<FeatureColumn>,
    targets: Vec<Float>,
    weights: Option<Vec<Float>>,
    n_rows: usize,
}

impl Dataset {
    /// Create a dataset from feature columns and a target vector.
    ///
    /// Every column must have one value per target, and categorical columns
    /// may only hold indices below their category count.
    pub fn new(features: Vec<FeatureColumn>, targets: Vec<Float>) -> Result<Self, ConfigurationError> {
        let n_rows = targets.len();

        for (feature, col) in features.iter().enumerate() {
            let got = col.len();
            if got != n_rows {
                return Err(ConfigurationError::InconsistentRows {
                    feature,
                    expected: n_rows,
                    got,
                });
            }
            col.validate(feature)?;
        }

        Ok(Self {
            features,
            targets,
            weights: None,
            n_rows,
        })
    }

    /// Create an empty dataset with the given feature kinds.
    ///
    /// Samples are appended with [`push_sample`](Self::push_sample).
    pub fn with_kinds(kinds: &[FeatureKind]) -> Result<Self, ConfigurationError> {
        let features = kinds
            .iter()
            .map(|kind| match *kind {
                FeatureKind::Continuous => FeatureColumn::numeric(Vec::new()),
                FeatureKind::Categorical { n_categories } => {
                    FeatureColumn::categorical(Vec::new(), n_categories)
                }
            })
            .collect();
        Self::new(features, Vec::new())
    }

    /// Attach per-row weights.
    pub fn with_weights(mut self, weights: Vec<Float>) -> Result<Self, ConfigurationError> {
        if weights.len() != self.n_rows {
            return Err(ConfigurationError::WeightLenMismatch {
                rows: self.n_rows,
                weights: weights.len(),
            });
        }
        self.weights = Some(weights);
        Ok(self)
    }

    /// Append one sample.
    ///
    /// Categorical entries must be whole numbers below the column's category
    /// count. When weights are attached the new sample gets unit weight.
    pub fn push_sample(&mut self, features: &[Float], response: Float) -> Result<(), ConfigurationError> {
        if features.len() != self.features.len() {
            return Err(ConfigurationError::InconsistentRows {
                feature: features.len().min(self.features.len()),
                expected: self.features.len(),
                got: features.len(),
            });
        }

        // Check everything before mutating so a rejected sample leaves no trace.
        for (feature, (col, &value)) in self.features.iter().zip(features).enumerate() {
            if let FeatureColumn::Categorical { n_categories, .. } = col {
                check_category(feature, self.n_rows, value, *n_categories)?;
            }
        }

        for (col, &value) in self.features.iter_mut().zip(features) {
            match col {
                FeatureColumn::Numeric { values, .. } => values.push(value),
                FeatureColumn::Categorical { values, .. } => values.push(value as u32),
            }
        }
        self.targets.push(response);
        if let Some(weights) = &mut self.weights {
            weights.push(1.0);
        }
        self.n_rows += 1;
        Ok(())
    }

    /// Re-declare the kind of a feature, converting its stored values.
    ///
    /// Declaring a feature categorical validates that every stored value is a
    /// whole number in `[0, n_categories)`.
    pub fn set_feature_kind(&mut self, feature: usize, kind: FeatureKind) -> Result<(), ConfigurationError> {
        let n_features = self.features.len();
        let col = self
            .features
            .get_mut(feature)
            .ok_or(ConfigurationError::FeatureIndexOutOfRange { feature, n_features })?;

        let name = col.name().map(str::to_owned);
        let converted = match kind {
            FeatureKind::Continuous => {
                let values = (0..col.len()).map(|row| col.value(row)).collect();
                FeatureColumn::Numeric { name, values }
            }
            FeatureKind::Categorical { n_categories } => {
                if n_categories == 0 {
                    return Err(ConfigurationError::InvalidFeatureType {
                        feature,
                        reason: "categorical features need at least one category".to_string(),
                    });
                }
                check_n_categories(feature, n_categories)?;
                let values = (0..col.len())
                    .map(|row| check_category(feature, row, col.value(row), n_categories))
                    .collect::<Result<Vec<_>, _>>()?;
                FeatureColumn::Categorical {
                    name,
                    values,
                    n_categories,
                }
            }
        };

        *col = converted;
        Ok(())
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Targets (length = n_rows).
    pub fn targets(&self) -> &[Float] {
        &self.targets
    }

    /// Optional weights (length = n_rows).
    pub fn weights(&self) -> Option<&[Float]> {
        self.weights.as_deref()
    }

    /// Feature columns.
    pub fn features(&self) -> &[FeatureColumn] {
        &self.features
    }

    /// Feature vector of one row.
    pub fn row(&self, row: usize) -> Vec<Float> {
        self.features.iter().map(|col| col.value(row)).collect()
    }
}

impl FeatureSource for Dataset {
    #[inline]
    fn n_samples(&self) -> usize {
        self.n_rows
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.features.len()
    }

    #[inline]
    fn feature_kind(&self, feature: usize) -> FeatureKind {
        self.features[feature].kind()
    }

    #[inline]
    fn feature(&self, feature: usize, sample: usize) -> Float {
        self.features[feature].value(sample)
    }

    #[inline]
    fn response(&self, sample: usize) -> Float {
        self.targets[sample]
    }

    #[inline]
    fn weight(&self, sample: usize) -> Float {
        self.weights.as_ref().map_or(1.0, |w| w[sample])
    }
}
