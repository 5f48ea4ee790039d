//! Borrowed `ndarray` provider.

use ndarray::{ArrayView1, ArrayView2};

use crate::Float;

use super::error::ConfigurationError;
use super::traits::{check_n_categories, FeatureKind, FeatureSource};

/// A [`FeatureSource`] over borrowed ndarray views.
///
/// `features` has shape `[n_samples, n_features]`. Any memory layout works,
/// so a feature-major buffer can be passed as a transposed view
/// (`array.t()`) without copying.
#[derive(Debug, Clone)]
pub struct ArrayDataset<'a> {
    features: ArrayView2<'a, Float>,
    targets: ArrayView1<'a, Float>,
    weights: Option<ArrayView1<'a, Float>>,
    kinds: Vec<FeatureKind>,
}

impl<'a> ArrayDataset<'a> {
    /// Create an all-continuous dataset.
    pub fn new(
        features: ArrayView2<'a, Float>,
        targets: ArrayView1<'a, Float>,
    ) -> Result<Self, ConfigurationError> {
        let (rows, n_features) = features.dim();
        if targets.len() != rows {
            return Err(ConfigurationError::TargetLenMismatch {
                rows,
                targets: targets.len(),
            });
        }
        Ok(Self {
            features,
            targets,
            weights: None,
            kinds: vec![FeatureKind::Continuous; n_features],
        })
    }

    /// Attach per-sample weights.
    pub fn with_weights(mut self, weights: ArrayView1<'a, Float>) -> Result<Self, ConfigurationError> {
        let rows = self.features.nrows();
        if weights.len() != rows {
            return Err(ConfigurationError::WeightLenMismatch {
                rows,
                weights: weights.len(),
            });
        }
        self.weights = Some(weights);
        Ok(self)
    }

    /// Declare the kind of one feature.
    ///
    /// Values are checked lazily by [`validate_source`](super::validate_source),
    /// which the grower runs before every tree.
    pub fn with_feature_kind(mut self, feature: usize, kind: FeatureKind) -> Result<Self, ConfigurationError> {
        let n_features = self.kinds.len();
        match self.kinds.get_mut(feature) {
            Some(slot) => {
                if let FeatureKind::Categorical { n_categories } = kind {
                    check_n_categories(feature, n_categories)?;
                }
                *slot = kind;
                Ok(self)
            }
            None => Err(ConfigurationError::FeatureIndexOutOfRange { feature, n_features }),
        }
    }
}

impl FeatureSource for ArrayDataset<'_> {
    #[inline]
    fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.features.ncols()
    }

    #[inline]
    fn feature_kind(&self, feature: usize) -> FeatureKind {
        self.kinds[feature]
    }

    #[inline]
    fn feature(&self, feature: usize, sample: usize) -> Float {
        self.features[[sample, feature]]
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
