//! Arena builder for tree growth.
//!
//! The growth loop is the only allocator of node ids. It reserves ids when a
//! node commits to a split, and later writes each pending node into its
//! reserved slot exactly once.

use crate::repr::{Node, NodeId, Tree};
use crate::BRANCHING;

/// Mutable arena used while growing one tree.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    /// `None` = reserved, not yet committed.
    slots: Vec<Option<Node>>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Clear the arena and reserve the root id (always 0).
    pub fn init_root(&mut self) -> NodeId {
        self.slots.clear();
        self.slots.push(None);
        0
    }

    /// Reserve ids for the children of one split, in child order.
    pub fn reserve_children(&mut self) -> [NodeId; BRANCHING] {
        let first = self.slots.len() as NodeId;
        self.slots.extend((0..BRANCHING).map(|_| None));
        std::array::from_fn(|i| first + i as NodeId)
    }

    /// Write a node into its reserved slot.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never reserved or was already committed.
    pub fn commit(&mut self, id: NodeId, node: Node) {
        let n_slots = self.slots.len();
        let slot = self
            .slots
            .get_mut(id as usize)
            .unwrap_or_else(|| panic!("node {id} was never reserved ({n_slots} slots)"));
        assert!(slot.is_none(), "node {id} committed twice");
        *slot = Some(node);
    }

    /// Number of reserved ids, committed or not.
    #[inline]
    pub fn n_reserved(&self) -> usize {
        self.slots.len()
    }

    /// Freeze into a tree.
    ///
    /// # Panics
    ///
    /// Panics if a reserved id was never committed.
    pub fn finish(self, n_features: usize) -> Tree {
        let nodes = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| slot.unwrap_or_else(|| panic!("node {id} reserved but never committed")))
            .collect();
        Tree::from_nodes(nodes, n_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::SplitCriterion;

    fn split() -> SplitCriterion {
        SplitCriterion::Numeric {
            feature: 0,
            threshold: 0.5,
        }
    }

    #[test]
    fn ids_follow_reservation_order() {
        let mut builder = TreeBuilder::new();
        let root = builder.init_root();
        assert_eq!(root, 0);

        let children = builder.reserve_children();
        assert_eq!(children, [1, 2]);
        builder.commit(root, Node::internal(None, children, [0.5, 0.5], split()));
        builder.commit(2, Node::leaf(Some(0), vec![1.0]));
        builder.commit(1, Node::leaf(Some(0), vec![0.0]));

        let tree = builder.finish(1);
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.node(2).responses(), Some(&[1.0][..]));
    }

    #[test]
    #[should_panic(expected = "committed twice")]
    fn double_commit_panics() {
        let mut builder = TreeBuilder::new();
        let root = builder.init_root();
        builder.commit(root, Node::leaf(None, vec![]));
        builder.commit(root, Node::leaf(None, vec![]));
    }

    #[test]
    #[should_panic(expected = "never reserved")]
    fn unreserved_commit_panics() {
        let mut builder = TreeBuilder::new();
        builder.init_root();
        builder.commit(5, Node::leaf(None, vec![]));
    }

    #[test]
    #[should_panic(expected = "never committed")]
    fn unfinished_slot_panics() {
        let mut builder = TreeBuilder::new();
        let root = builder.init_root();
        let children = builder.reserve_children();
        builder.commit(root, Node::internal(None, children, [0.5, 0.5], split()));
        let _ = builder.finish(1);
    }
}
