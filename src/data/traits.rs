//! Core traits for dataset access.

use crate::repr::MAX_CATEGORIES;
use crate::Float;

use super::error::ConfigurationError;

/// Declared type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Real-valued feature, split by a threshold.
    Continuous,
    /// Categorical feature whose values are category indices in `0..n_categories`.
    Categorical { n_categories: u32 },
}

impl FeatureKind {
    /// Whether this is a categorical feature.
    #[inline]
    pub fn is_categorical(&self) -> bool {
        matches!(self, FeatureKind::Categorical { .. })
    }
}

/// Read-only capability set the tree engine consumes.
///
/// Provides a uniform interface for accessing feature values, responses and
/// weights during split search, regardless of the underlying storage (column
/// store, row-major matrix, transposed view, memory map).
///
/// # Categorical Values
///
/// Categorical features store category indices as `Float` (`0.0`, `1.0`, ...).
/// Use [`validate_source`] to reject malformed sources before growing a tree.
pub trait FeatureSource {
    /// Number of samples (rows).
    fn n_samples(&self) -> usize;

    /// Number of features (columns).
    fn n_features(&self) -> usize;

    /// Declared kind of `feature`.
    fn feature_kind(&self, feature: usize) -> FeatureKind;

    /// Value of `feature` for `sample`.
    ///
    /// # Panics
    ///
    /// May panic if either index is out of range.
    fn feature(&self, feature: usize, sample: usize) -> Float;

    /// Response (target) of `sample`.
    fn response(&self, sample: usize) -> Float;

    /// Weight of `sample`. Unit weights unless overridden.
    #[inline]
    fn weight(&self, _sample: usize) -> Float {
        1.0
    }

    /// Copy all feature values of `sample` into `buf`.
    ///
    /// # Panics
    ///
    /// Panics if `buf.len() < n_features()`.
    fn copy_sample(&self, sample: usize, buf: &mut [Float]) {
        for (feature, slot) in buf[..self.n_features()].iter_mut().enumerate() {
            *slot = self.feature(feature, sample);
        }
    }
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    fn n_samples(&self) -> usize {
        (**self).n_samples()
    }

    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn feature_kind(&self, feature: usize) -> FeatureKind {
        (**self).feature_kind(feature)
    }

    fn feature(&self, feature: usize, sample: usize) -> Float {
        (**self).feature(feature, sample)
    }

    fn response(&self, sample: usize) -> Float {
        (**self).response(sample)
    }

    fn weight(&self, sample: usize) -> Float {
        (**self).weight(sample)
    }
}

/// Interpret a feature value as a category index.
///
/// Returns `None` for negative, fractional or non-finite values.
#[inline]
pub fn category_index(value: Float) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as Float {
        Some(value as u32)
    } else {
        None
    }
}

/// Check a declared category count: at least one, at most [`MAX_CATEGORIES`].
pub(crate) fn check_n_categories(feature: usize, n_categories: u32) -> Result<(), ConfigurationError> {
    if n_categories == 0 {
        return Err(ConfigurationError::ZeroCategories { feature });
    }
    if n_categories > MAX_CATEGORIES {
        return Err(ConfigurationError::TooManyCategories {
            feature,
            n_categories,
            max: MAX_CATEGORIES,
        });
    }
    Ok(())
}

/// Check a single categorical value against its declared category count.
#[inline]
pub(crate) fn check_category(
    feature: usize,
    sample: usize,
    value: Float,
    n_categories: u32,
) -> Result<u32, ConfigurationError> {
    match category_index(value) {
        Some(cat) if cat < n_categories => Ok(cat),
        _ => Err(ConfigurationError::CategoryOutOfRange {
            feature,
            sample,
            value,
            n_categories,
        }),
    }
}

/// Validate every feature kind, feature value, response and weight of a source.
///
/// The split search assumes finite values and in-range category indices; this
/// is the fail-fast gate run before growth begins.
pub fn validate_source<D: FeatureSource + ?Sized>(source: &D) -> Result<(), ConfigurationError> {
    let n_samples = source.n_samples();

    for feature in 0..source.n_features() {
        match source.feature_kind(feature) {
            FeatureKind::Continuous => {
                for sample in 0..n_samples {
                    if !source.feature(feature, sample).is_finite() {
                        return Err(ConfigurationError::NonFiniteFeature { feature, sample });
                    }
                }
            }
            FeatureKind::Categorical { n_categories } => {
                check_n_categories(feature, n_categories)?;
                for sample in 0..n_samples {
                    check_category(feature, sample, source.feature(feature, sample), n_categories)?;
                }
            }
        }
    }

    for sample in 0..n_samples {
        if !source.response(sample).is_finite() {
            return Err(ConfigurationError::NonFiniteResponse { sample });
        }
        let weight = source.weight(sample);
        if !(weight.is_finite() && weight > 0.0) {
            return Err(ConfigurationError::InvalidWeight { sample, weight });
        }
    }

    Ok(())
}
