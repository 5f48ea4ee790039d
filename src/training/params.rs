//! Growth configuration.

use crate::Float;

use super::logger::Verbosity;

/// Invalid growth parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("min_samples_to_split must be at least 2, got {0}")]
    MinSamplesToSplit(usize),

    #[error("min_samples_per_leaf must be at least 1, got {0}")]
    MinSamplesPerLeaf(usize),

    #[error("max_nodes must be at least 1, got {0}")]
    MaxNodes(usize),

    #[error("merge_tolerance must be finite and non-negative, got {0}")]
    MergeTolerance(Float),

    #[error("max_features_per_split ({requested}) exceeds number of features ({n_features})")]
    TooManyFeatures { requested: usize, n_features: usize },

    #[error("n_trees must be at least 1")]
    NoTrees,

    #[error("bootstrap sample fraction must be in (0, 1], got {0}")]
    SampleFraction(Float),
}

/// Parameters for growing one tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeParams {
    /// Candidate features drawn per node (without replacement); 0 = all.
    pub max_features_per_split: usize,
    /// Nodes at this depth become leaves. The root has depth 0.
    pub max_depth: u32,
    /// Nodes with fewer samples become leaves.
    pub min_samples_to_split: usize,
    /// Minimum samples on every side of a split.
    pub min_samples_per_leaf: usize,
    /// Upper bound on the arena size.
    pub max_nodes: usize,
    /// Sorted feature values within this distance of a group's first value
    /// fall into the same candidate cut.
    pub merge_tolerance: Float,
    /// Logging level.
    pub verbosity: Verbosity,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_features_per_split: 0,
            max_depth: u32::MAX,
            min_samples_to_split: 2,
            min_samples_per_leaf: 1,
            max_nodes: usize::MAX,
            merge_tolerance: 1e-6,
            verbosity: Verbosity::Silent,
        }
    }
}

impl TreeParams {
    /// Check values independent of the dataset.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.min_samples_to_split < 2 {
            return Err(ParamsError::MinSamplesToSplit(self.min_samples_to_split));
        }
        if self.min_samples_per_leaf < 1 {
            return Err(ParamsError::MinSamplesPerLeaf(self.min_samples_per_leaf));
        }
        if self.max_nodes < 1 {
            return Err(ParamsError::MaxNodes(self.max_nodes));
        }
        if !(self.merge_tolerance.is_finite() && self.merge_tolerance >= 0.0) {
            return Err(ParamsError::MergeTolerance(self.merge_tolerance));
        }
        Ok(())
    }

    /// Check values against a dataset with `n_features` features.
    pub fn validate_for(&self, n_features: usize) -> Result<(), ParamsError> {
        self.validate()?;
        if self.max_features_per_split > n_features {
            return Err(ParamsError::TooManyFeatures {
                requested: self.max_features_per_split,
                n_features,
            });
        }
        Ok(())
    }

    /// Candidate feature count per node for `n_features` features.
    #[inline]
    pub fn features_per_split(&self, n_features: usize) -> usize {
        if self.max_features_per_split == 0 {
            n_features
        } else {
            self.max_features_per_split.min(n_features)
        }
    }
}

/// Bootstrap configuration for a forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bootstrap {
    /// Every tree sees every sample once.
    None,
    /// Draw `fraction * n_samples` samples with replacement per tree.
    WithReplacement { fraction: Float },
    /// Draw `fraction * n_samples` distinct samples per tree.
    WithoutReplacement { fraction: Float },
}

impl Default for Bootstrap {
    fn default() -> Self {
        Bootstrap::WithReplacement { fraction: 1.0 }
    }
}

/// Parameters for growing many independent trees.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub tree: TreeParams,
    pub bootstrap: Bootstrap,
    /// Tree `i` uses the random stream seeded with `seed + i`.
    pub seed: u64,
    /// Worker threads; 0 = rayon default.
    pub n_threads: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 10,
            tree: TreeParams::default(),
            bootstrap: Bootstrap::default(),
            seed: 0,
            n_threads: 0,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.n_trees == 0 {
            return Err(ParamsError::NoTrees);
        }
        match self.bootstrap {
            Bootstrap::None => {}
            Bootstrap::WithReplacement { fraction } | Bootstrap::WithoutReplacement { fraction } => {
                if !(fraction > 0.0 && fraction <= 1.0) {
                    return Err(ParamsError::SampleFraction(fraction));
                }
            }
        }
        self.tree.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TreeParams::default().validate(), Ok(()));
        assert_eq!(ForestParams::default().validate(), Ok(()));
    }

    #[rstest]
    #[case(TreeParams { min_samples_to_split: 1, ..Default::default() }, ParamsError::MinSamplesToSplit(1))]
    #[case(TreeParams { min_samples_per_leaf: 0, ..Default::default() }, ParamsError::MinSamplesPerLeaf(0))]
    #[case(TreeParams { max_nodes: 0, ..Default::default() }, ParamsError::MaxNodes(0))]
    #[case(TreeParams { merge_tolerance: -1.0, ..Default::default() }, ParamsError::MergeTolerance(-1.0))]
    fn invalid_tree_params(#[case] params: TreeParams, #[case] expected: ParamsError) {
        assert_eq!(params.validate(), Err(expected));
    }

    #[test]
    fn too_many_features() {
        let params = TreeParams {
            max_features_per_split: 4,
            ..Default::default()
        };
        assert_eq!(
            params.validate_for(3),
            Err(ParamsError::TooManyFeatures {
                requested: 4,
                n_features: 3
            })
        );
        assert_eq!(params.validate_for(4), Ok(()));
    }

    #[rstest]
    #[case(0, 5, 5)]
    #[case(2, 5, 2)]
    #[case(5, 5, 5)]
    fn features_per_split(#[case] max: usize, #[case] n: usize, #[case] expected: usize) {
        let params = TreeParams {
            max_features_per_split: max,
            ..Default::default()
        };
        assert_eq!(params.features_per_split(n), expected);
    }

    #[test]
    fn invalid_forest_params() {
        let params = ForestParams {
            n_trees: 0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::NoTrees));

        let params = ForestParams {
            bootstrap: Bootstrap::WithoutReplacement { fraction: 1.5 },
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::SampleFraction(1.5)));
    }
}
