//! Split criteria.

use std::fmt;

use crate::data::category_index;
use crate::{Float, BRANCHING};

use super::categorical::CatBitset;
use super::subspace::{FeatureRange, Subspace};

/// Routing rule of an internal node.
///
/// Child 0 is the "left" child, child 1 the "right" child.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitCriterion {
    /// Route to child 1 iff `value > threshold`.
    Numeric { feature: usize, threshold: Float },
    /// Route to child 0 iff the category is in `admitted`.
    ///
    /// Values that are not valid category indices go to child 1.
    Categorical { feature: usize, admitted: CatBitset },
}

impl SplitCriterion {
    /// Feature index the criterion reads.
    #[inline]
    pub fn feature(&self) -> usize {
        match self {
            SplitCriterion::Numeric { feature, .. } => *feature,
            SplitCriterion::Categorical { feature, .. } => *feature,
        }
    }

    /// Child index for a feature value.
    #[inline]
    pub fn child_index(&self, value: Float) -> usize {
        match self {
            SplitCriterion::Numeric { threshold, .. } => usize::from(value > *threshold),
            SplitCriterion::Categorical { admitted, .. } => match category_index(value) {
                Some(cat) if admitted.contains(cat) => 0,
                _ => 1,
            },
        }
    }

    /// Child index for a full feature vector.
    #[inline]
    pub fn route(&self, sample: &[Float]) -> usize {
        self.child_index(sample[self.feature()])
    }

    /// Split the subspace routed to this node into the child subspaces.
    ///
    /// Numeric: the left child's upper bound and the right child's lower bound
    /// become the threshold (clamped to the input interval). Categorical: the
    /// left child keeps the admissible categories that are admitted, the right
    /// child keeps the rest.
    ///
    /// # Panics
    ///
    /// Panics if the subspace's range for the split feature has the other kind.
    pub fn bisect(&self, space: &Subspace) -> [Subspace; BRANCHING] {
        let mut left = space.clone();
        let mut right = space.clone();
        let feature = self.feature();

        match (self, space.range(feature)) {
            (SplitCriterion::Numeric { threshold, .. }, FeatureRange::Numeric { lower, upper }) => {
                let t = threshold.max(*lower).min(*upper);
                *left.range_mut(feature) = FeatureRange::Numeric {
                    lower: *lower,
                    upper: t,
                };
                *right.range_mut(feature) = FeatureRange::Numeric {
                    lower: t,
                    upper: *upper,
                };
            }
            (SplitCriterion::Categorical { admitted, .. }, FeatureRange::Categorical(set)) => {
                *left.range_mut(feature) = FeatureRange::Categorical(set.intersection(admitted));
                *right.range_mut(feature) = FeatureRange::Categorical(set.difference(admitted));
            }
            _ => panic!("feature {feature}: split criterion and subspace range disagree on kind"),
        }

        [left, right]
    }

    /// Short human-readable rule, e.g. `x[2] <= 0.5` or `x[1] in {0, 3}`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SplitCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitCriterion::Numeric { feature, threshold } => {
                write!(f, "x[{feature}] <= {threshold}")
            }
            SplitCriterion::Categorical { feature, admitted } => {
                write!(f, "x[{feature}] in {{")?;
                for (i, cat) in admitted.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{cat}")?;
                }
                f.write_str("}")
            }
        }
    }
}
