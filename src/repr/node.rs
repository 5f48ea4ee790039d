//! Arena nodes.

use crate::training::RunningStats;
use crate::{Float, BRANCHING};

use super::criterion::SplitCriterion;

/// Node index into a [`Tree`](super::Tree) arena. The root is always 0.
pub type NodeId = u32;

/// One arena entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Parent id, `None` for the root.
    pub parent: Option<NodeId>,
    /// Leaf or internal payload.
    pub kind: NodeKind,
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Terminal node holding the responses of its training samples, sorted
    /// ascending, and their summary computed once at construction.
    Leaf { responses: Vec<Float>, stats: LeafStats },
    /// Node with exactly [`BRANCHING`] children.
    Internal {
        children: [NodeId; BRANCHING],
        /// Fraction of the node's samples sent to each child. Sums to 1.
        split_fractions: [Float; BRANCHING],
        criterion: SplitCriterion,
    },
}

impl Node {
    /// Leaf node; `responses` must already be sorted.
    pub fn leaf(parent: Option<NodeId>, responses: Vec<Float>) -> Self {
        debug_assert!(responses.windows(2).all(|w| w[0] <= w[1]));
        let stats = LeafStats::from_responses(&responses);
        Self {
            parent,
            kind: NodeKind::Leaf { responses, stats },
        }
    }

    /// Internal node.
    pub fn internal(
        parent: Option<NodeId>,
        children: [NodeId; BRANCHING],
        split_fractions: [Float; BRANCHING],
        criterion: SplitCriterion,
    ) -> Self {
        Self {
            parent,
            kind: NodeKind::Internal {
                children,
                split_fractions,
                criterion,
            },
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Children ids, empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::Internal { children, .. } => children,
        }
    }

    /// Split criterion of an internal node.
    #[inline]
    pub fn criterion(&self) -> Option<&SplitCriterion> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { criterion, .. } => Some(criterion),
        }
    }

    /// Sorted responses of a leaf.
    #[inline]
    pub fn responses(&self) -> Option<&[Float]> {
        match &self.kind {
            NodeKind::Leaf { responses, .. } => Some(responses),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Count, mean and variance of a leaf's responses.
    #[inline]
    pub fn leaf_stats(&self) -> Option<LeafStats> {
        match &self.kind {
            NodeKind::Leaf { stats, .. } => Some(*stats),
            NodeKind::Internal { .. } => None,
        }
    }
}

// Leaf stats are a function of the responses; an empty leaf has a NaN mean.
impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeKind::Leaf { responses: a, .. }, NodeKind::Leaf { responses: b, .. }) => a == b,
            (
                NodeKind::Internal {
                    children: ca,
                    split_fractions: fa,
                    criterion: xa,
                },
                NodeKind::Internal {
                    children: cb,
                    split_fractions: fb,
                    criterion: xb,
                },
            ) => ca == cb && fa == fb && xa == xb,
            _ => false,
        }
    }
}

/// Summary of a leaf's responses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafStats {
    pub count: usize,
    pub mean: Float,
    /// Population variance.
    pub variance: Float,
}

impl LeafStats {
    pub(crate) fn from_responses(responses: &[Float]) -> Self {
        let mut stats = RunningStats::new();
        for &y in responses {
            stats.push(y);
        }
        Self {
            count: stats.count(),
            mean: stats.mean(),
            variance: stats.variance(),
        }
    }
}

/// Linear-interpolated quantile of sorted values, `None` if empty or `q`
/// outside `[0, 1]`.
pub(crate) fn sorted_quantile(sorted: &[Float], q: Float) -> Option<Float> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as Float;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as Float;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}
