//! Dataset configuration errors.

use crate::Float;

/// Errors raised while building or validating a feature source.
///
/// All of these are detected before the growth loop starts; the split search
/// itself never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("inconsistent number of rows: feature {feature} expected {expected}, got {got}")]
    InconsistentRows {
        feature: usize,
        expected: usize,
        got: usize,
    },

    #[error("number of targets ({targets}) does not match number of rows ({rows})")]
    TargetLenMismatch { rows: usize, targets: usize },

    #[error("number of weights ({weights}) does not match number of rows ({rows})")]
    WeightLenMismatch { rows: usize, weights: usize },

    #[error("feature index {feature} out of range ({n_features} features)")]
    FeatureIndexOutOfRange { feature: usize, n_features: usize },

    #[error("sample index {sample} out of range ({n_samples} samples)")]
    SampleIndexOutOfRange { sample: usize, n_samples: usize },

    #[error("invalid type for feature {feature}: {reason}")]
    InvalidFeatureType { feature: usize, reason: String },

    #[error("categorical feature {feature} declares zero categories")]
    ZeroCategories { feature: usize },

    #[error("categorical feature {feature} declares {n_categories} categories (at most {max})")]
    TooManyCategories { feature: usize, n_categories: u32, max: u32 },

    #[error(
        "feature {feature}, sample {sample}: value {value} is not a category index in [0, {n_categories})"
    )]
    CategoryOutOfRange {
        feature: usize,
        sample: usize,
        value: Float,
        n_categories: u32,
    },

    #[error("feature {feature}, sample {sample}: value is not finite")]
    NonFiniteFeature { feature: usize, sample: usize },

    #[error("response of sample {sample} is not finite")]
    NonFiniteResponse { sample: usize },

    #[error("weight of sample {sample} must be finite and positive, got {weight}")]
    InvalidWeight { sample: usize, weight: Float },
}
