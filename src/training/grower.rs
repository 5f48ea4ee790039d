//! Tree grower.
//!
//! Grows one regression tree breadth-first. A FIFO frontier holds pending
//! nodes (sample range + depth + reserved id). Each dequeued node either
//! becomes a leaf, because the stopping rules fire or no candidate feature has
//! a usable split, or an internal node whose children are reserved and
//! enqueued.
//!
//! Growth of one tree is sequential; the sample partition is rearranged in
//! place.

use std::collections::VecDeque;
use std::ops::Range;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::{validate_source, ConfigurationError, FeatureSource};
use crate::repr::{Node, NodeId, SplitCriterion, Tree};
use crate::{Float, BRANCHING};

use super::builder::TreeBuilder;
use super::logger::{TrainingLogger, Verbosity};
use super::params::{ParamsError, TreeParams};
use super::partition::SamplePartition;
use super::sampling::FeatureSampler;
use super::split::{SplitFinder, SplitResult};

/// Errors that prevent growth from starting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrowError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("dataset has no samples")]
    EmptyDataset,

    #[error("dataset has no features")]
    NoFeatures,

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// A node awaiting its split-or-leaf decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNode {
    pub parent: Option<NodeId>,
    /// Id reserved for this node by the growth loop.
    pub node: NodeId,
    pub depth: u32,
    /// Owned range of the sample partition.
    pub range: Range<usize>,
}

/// Outcome of processing one pending node.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Split {
        criterion: SplitCriterion,
        loss: Float,
        split_fractions: [Float; BRANCHING],
        child_ranges: [Range<usize>; BRANCHING],
    },
    /// Responses sorted ascending.
    Leaf { responses: Vec<Float> },
}

/// Grows regression trees from a [`FeatureSource`].
///
/// The grower owns its random stream; growing several trees in a row with the
/// same grower continues that stream.
pub struct TreeGrower {
    params: TreeParams,
    rng: Xoshiro256PlusPlus,
    partition: SamplePartition,
    finder: SplitFinder,
    candidates: Vec<usize>,
    logger: TrainingLogger,
}

impl TreeGrower {
    /// Grower with a random stream seeded from `seed`.
    pub fn new(params: TreeParams, seed: u64) -> Result<Self, ParamsError> {
        Self::with_rng(params, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// Grower continuing an existing random stream.
    pub fn with_rng(params: TreeParams, rng: Xoshiro256PlusPlus) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            finder: SplitFinder::from_params(&params),
            logger: TrainingLogger::new(params.verbosity),
            params,
            rng,
            partition: SamplePartition::new(),
            candidates: Vec::new(),
        })
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Replace the logger, e.g. to tag messages with a tree index.
    pub fn set_logger(&mut self, logger: TrainingLogger) {
        self.logger = logger;
    }

    /// Grow a tree over every sample of `source`.
    pub fn grow<D: FeatureSource + ?Sized>(&mut self, source: &D) -> Result<Tree, GrowError> {
        self.grow_inner(source, None)
    }

    /// Grow a tree over the given sample indices (repeats allowed).
    pub fn grow_from<D: FeatureSource + ?Sized>(&mut self, source: &D, sampled: &[u32]) -> Result<Tree, GrowError> {
        let n_samples = source.n_samples();
        if let Some(&sample) = sampled.iter().find(|&&s| s as usize >= n_samples) {
            return Err(ConfigurationError::SampleIndexOutOfRange {
                sample: sample as usize,
                n_samples,
            }
            .into());
        }
        self.grow_inner(source, Some(sampled))
    }

    fn grow_inner<D: FeatureSource + ?Sized>(&mut self, source: &D, sampled: Option<&[u32]>) -> Result<Tree, GrowError> {
        let n_features = source.n_features();
        if n_features == 0 {
            return Err(GrowError::NoFeatures);
        }
        self.params.validate_for(n_features)?;
        validate_source(source)?;
        self.grow_validated(source, sampled)
    }

    /// Growth over a source that already passed [`validate_source`] and
    /// `validate_for`, with in-range sample indices.
    pub(crate) fn grow_validated<D: FeatureSource + ?Sized>(
        &mut self,
        source: &D,
        sampled: Option<&[u32]>,
    ) -> Result<Tree, GrowError> {
        let n_features = source.n_features();
        let root_range = self.partition.reset(source.n_samples(), sampled);
        if root_range.is_empty() {
            return Err(GrowError::EmptyDataset);
        }

        self.logger.info(&format!(
            "Growing tree: {} samples, {} features",
            root_range.len(),
            n_features
        ));

        let mut sampler = FeatureSampler::new(n_features, self.params.features_per_split(n_features));
        let mut builder = TreeBuilder::with_capacity(64);
        let root = builder.init_root();
        let mut frontier = VecDeque::from([PendingNode {
            parent: None,
            node: root,
            depth: 0,
            range: root_range,
        }]);

        let mut budget_reached = false;
        while let Some(pending) = frontier.pop_front() {
            let over_budget = builder.n_reserved() + BRANCHING > self.params.max_nodes;
            budget_reached |= over_budget;
            let transition = if over_budget || self.should_stop(&pending, source) {
                Transition::Leaf {
                    responses: self.leaf_responses(source, pending.range.clone()),
                }
            } else {
                let mut candidates = std::mem::take(&mut self.candidates);
                sampler.sample(&mut self.rng, &mut candidates);
                let transition = self.attempt_split(&pending, source, &candidates);
                self.candidates = candidates;
                transition
            };

            match transition {
                Transition::Leaf { responses } => {
                    if self.logger.enabled(Verbosity::Debug) {
                        self.logger.debug(&format!(
                            "node {} (depth {}): leaf with {} samples",
                            pending.node,
                            pending.depth,
                            responses.len()
                        ));
                    }
                    builder.commit(pending.node, Node::leaf(pending.parent, responses));
                }
                Transition::Split {
                    criterion,
                    loss,
                    split_fractions,
                    child_ranges,
                } => {
                    if self.logger.enabled(Verbosity::Debug) {
                        self.logger.debug(&format!(
                            "node {} (depth {}): split {} with loss {}",
                            pending.node, pending.depth, criterion, loss
                        ));
                    }
                    let children = builder.reserve_children();
                    builder.commit(
                        pending.node,
                        Node::internal(pending.parent, children, split_fractions, criterion),
                    );
                    for (child, range) in children.into_iter().zip(child_ranges) {
                        frontier.push_back(PendingNode {
                            parent: Some(pending.node),
                            node: child,
                            depth: pending.depth + 1,
                            range,
                        });
                    }
                }
            }
        }

        if budget_reached {
            self.logger
                .warn(&format!("node budget of {} reached", self.params.max_nodes));
        }

        let tree = builder.finish(n_features);
        self.logger.info(&format!(
            "Grew tree: {} nodes, {} leaves, depth {}",
            tree.n_nodes(),
            tree.n_leaves(),
            tree.depth()
        ));
        Ok(tree)
    }

    /// Stopping rules evaluated before any split search, apart from the node
    /// budget which the growth loop checks itself.
    fn should_stop<D: FeatureSource + ?Sized>(&self, pending: &PendingNode, source: &D) -> bool {
        let n = pending.range.len();
        if pending.depth >= self.params.max_depth
            || n < self.params.min_samples_to_split
            || n < self.params.min_samples_per_leaf.saturating_mul(2)
        {
            return true;
        }

        let indices = self.partition.indices(pending.range.clone());
        let first = source.response(indices[0] as usize);
        indices[1..]
            .iter()
            .all(|&i| source.response(i as usize) == first)
    }

    fn leaf_responses<D: FeatureSource + ?Sized>(&self, source: &D, range: Range<usize>) -> Vec<Float> {
        let mut responses: Vec<Float> = self
            .partition
            .indices(range)
            .iter()
            .map(|&i| source.response(i as usize))
            .collect();
        responses.sort_by(|a, b| a.total_cmp(b));
        responses
    }

    /// Split-or-leaf decision for one pending node over the given candidate
    /// features.
    ///
    /// On a split the node's range is partitioned in place; the returned child
    /// ranges cover it. Never allocates node ids.
    pub fn attempt_split<D: FeatureSource + ?Sized>(
        &mut self,
        pending: &PendingNode,
        source: &D,
        candidates: &[usize],
    ) -> Transition {
        let indices = self.partition.indices(pending.range.clone());
        let Some(SplitResult { loss, criterion }) =
            self.finder.find_best(source, indices, candidates, &mut self.rng)
        else {
            return Transition::Leaf {
                responses: self.leaf_responses(source, pending.range.clone()),
            };
        };

        let child_ranges = self.partition.split(pending.range.clone(), &criterion, source);
        debug_assert!(child_ranges.iter().all(|r| !r.is_empty()));

        let n = pending.range.len() as Float;
        let split_fractions = std::array::from_fn(|i| child_ranges[i].len() as Float / n);

        Transition::Split {
            criterion,
            loss,
            split_fractions,
            child_ranges,
        }
    }

    /// Start a fresh partition over all samples and return the root node.
    ///
    /// Lets callers drive [`attempt_split`](Self::attempt_split) directly.
    pub fn root_pending(&mut self, n_samples: usize) -> PendingNode {
        let range = self.partition.reset(n_samples, None);
        PendingNode {
            parent: None,
            node: 0,
            depth: 0,
            range,
        }
    }

    /// Sample indices currently owned by a range.
    pub fn indices(&self, range: Range<usize>) -> &[u32] {
        self.partition.indices(range)
    }
}
