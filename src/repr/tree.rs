//! Grown tree arena and traversal.

use crate::Float;

use super::criterion::SplitCriterion;
use super::node::{sorted_quantile, LeafStats, Node, NodeId, NodeKind};
use super::subspace::Subspace;

/// Rejected prediction input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("sample has {got} features, tree needs {expected}")]
    TooFewFeatures { expected: usize, got: usize },

    #[error("feature {feature} is not finite")]
    NonFiniteFeature { feature: usize },
}

/// A grown regression tree.
///
/// Nodes live in one flat arena; parents and children are ids, never
/// references. Node 0 is the root and ids follow breadth-first growth order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl Tree {
    /// Assemble a tree from an already consistent arena.
    pub(crate) fn from_nodes(nodes: Vec<Node>, n_features: usize) -> Self {
        debug_assert!(!nodes.is_empty(), "tree needs a root");
        Self { nodes, n_features }
    }

    /// Root id.
    #[inline]
    pub fn root(&self) -> NodeId {
        0
    }

    /// Number of features a sample must provide.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// All nodes in id order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ids of all leaves in ascending order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(id, _)| id as NodeId)
    }

    /// Maximum root-to-leaf depth (a lone root has depth 0).
    pub fn depth(&self) -> usize {
        // Children always have larger ids than their parent.
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max = 0;
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                depths[id] = depths[parent as usize] + 1;
                max = max.max(depths[id]);
            }
        }
        max
    }

    /// Leaf reached by a feature vector.
    ///
    /// The whole vector is checked before traversal: it must hold at least
    /// [`n_features`](Self::n_features) values, all finite.
    pub fn classify(&self, sample: &[Float]) -> Result<NodeId, PredictError> {
        if sample.len() < self.n_features {
            return Err(PredictError::TooFewFeatures {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        if let Some(feature) = sample[..self.n_features].iter().position(|v| !v.is_finite()) {
            return Err(PredictError::NonFiniteFeature { feature });
        }
        Ok(self.classify_unchecked(sample))
    }

    #[inline]
    fn classify_unchecked(&self, sample: &[Float]) -> NodeId {
        let mut id = self.root();
        loop {
            match &self.nodes[id as usize].kind {
                NodeKind::Leaf { .. } => return id,
                NodeKind::Internal {
                    children, criterion, ..
                } => id = children[criterion.route(sample)],
            }
        }
    }

    /// Mean response of the leaf reached by `sample`.
    pub fn predict(&self, sample: &[Float]) -> Result<Float, PredictError> {
        let leaf = self.classify(sample)?;
        Ok(self.leaf_mean(leaf))
    }

    fn leaf_mean(&self, leaf: NodeId) -> Float {
        self.leaf_stats(leaf).map_or(Float::NAN, |s| s.mean)
    }

    /// Count, mean and variance of a leaf, `None` for internal nodes.
    pub fn leaf_stats(&self, id: NodeId) -> Option<LeafStats> {
        self.node(id).leaf_stats()
    }

    /// Quantile `q` in `[0, 1]` of a leaf's responses.
    pub fn quantile(&self, id: NodeId, q: Float) -> Option<Float> {
        self.node(id).responses().and_then(|r| sorted_quantile(r, q))
    }

    /// Split criterion of an internal node.
    pub fn criterion(&self, id: NodeId) -> Option<&SplitCriterion> {
        self.node(id).criterion()
    }

    /// Subspace routed to every leaf, given the root's subspace.
    ///
    /// Returned in ascending leaf-id order.
    pub fn leaf_subspaces(&self, space: &Subspace) -> Vec<(NodeId, Subspace)> {
        let mut out = Vec::with_capacity(self.n_leaves());
        let mut stack = vec![(self.root(), space.clone())];
        while let Some((id, space)) = stack.pop() {
            match &self.node(id).kind {
                NodeKind::Leaf { .. } => out.push((id, space)),
                NodeKind::Internal {
                    children, criterion, ..
                } => {
                    for (&child, sub) in children.iter().zip(criterion.bisect(&space)) {
                        stack.push((child, sub));
                    }
                }
            }
        }
        out.sort_by_key(|(id, _)| *id);
        out
    }
}
