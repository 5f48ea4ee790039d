//! Axis-aligned feature subspaces.
//!
//! A [`Subspace`] is the region of feature space routed to one node. The root
//! covers everything; each split bisects its node's subspace into the child
//! subspaces via [`SplitCriterion::bisect`](super::SplitCriterion::bisect).

use crate::data::{category_index, FeatureKind, FeatureSource};
use crate::Float;

use super::categorical::CatBitset;

/// Admissible values of one feature.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureRange {
    /// Values in the half-open interval `(lower, upper]`.
    Numeric { lower: Float, upper: Float },
    /// Category indices in the set.
    Categorical(CatBitset),
}

impl FeatureRange {
    /// The whole range of a feature of the given kind.
    pub fn full(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::Continuous => FeatureRange::Numeric {
                lower: Float::NEG_INFINITY,
                upper: Float::INFINITY,
            },
            FeatureKind::Categorical { n_categories } => {
                FeatureRange::Categorical(CatBitset::full(n_categories))
            }
        }
    }

    /// Whether `value` lies in the range.
    pub fn contains(&self, value: Float) -> bool {
        match self {
            FeatureRange::Numeric { lower, upper } => *lower < value && value <= *upper,
            FeatureRange::Categorical(set) => category_index(value).is_some_and(|c| set.contains(c)),
        }
    }

    /// Whether no value lies in the range.
    pub fn is_empty(&self) -> bool {
        match self {
            FeatureRange::Numeric { lower, upper } => lower >= upper,
            FeatureRange::Categorical(set) => set.is_empty(),
        }
    }
}

/// Hyper-rectangle of admissible feature values, one range per feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Subspace {
    ranges: Vec<FeatureRange>,
}

impl Subspace {
    /// Subspace from explicit per-feature ranges.
    pub fn new(ranges: Vec<FeatureRange>) -> Self {
        Self { ranges }
    }

    /// The whole feature space of `source`.
    pub fn full<D: FeatureSource + ?Sized>(source: &D) -> Self {
        let ranges = (0..source.n_features())
            .map(|f| FeatureRange::full(source.feature_kind(f)))
            .collect();
        Self { ranges }
    }

    /// Number of features.
    pub fn n_features(&self) -> usize {
        self.ranges.len()
    }

    /// Range of one feature.
    pub fn range(&self, feature: usize) -> &FeatureRange {
        &self.ranges[feature]
    }

    /// All ranges.
    pub fn ranges(&self) -> &[FeatureRange] {
        &self.ranges
    }

    pub(crate) fn range_mut(&mut self, feature: usize) -> &mut FeatureRange {
        &mut self.ranges[feature]
    }

    /// Whether a feature vector lies inside the subspace.
    pub fn contains(&self, sample: &[Float]) -> bool {
        self.ranges
            .iter()
            .zip(sample)
            .all(|(range, &value)| range.contains(value))
    }

    /// Whether any feature range is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.iter().any(FeatureRange::is_empty)
    }
}
