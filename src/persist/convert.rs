//! Conversion between [`Tree`] and [`TreeSchema`].
//!
//! Loading never trusts the document: ids, parent links, fractions, leaf
//! ordering and split rules are all checked before the arena is assembled.

use std::path::Path;

use crate::repr::{CatBitset, Node, NodeId, NodeKind, SplitCriterion, Tree, MAX_CATEGORIES};
use crate::{Float, BRANCHING};

use super::schema::{NodeSchema, SplitSchema, TreeSchema, FORMAT_VERSION};
use super::PersistError;

/// Allowed deviation of a node's split fractions from a sum of 1.
const FRACTION_SUM_TOLERANCE: Float = 1e-6;

// ============================================================================
// Tree -> schema
// ============================================================================

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        let nodes = tree
            .nodes()
            .iter()
            .map(|node| match &node.kind {
                NodeKind::Leaf { responses, .. } => NodeSchema {
                    parent: node.parent,
                    is_leaf: true,
                    responses: responses.clone(),
                    children: Vec::new(),
                    split_fractions: Vec::new(),
                    split: None,
                },
                NodeKind::Internal {
                    children,
                    split_fractions,
                    criterion,
                } => NodeSchema {
                    parent: node.parent,
                    is_leaf: false,
                    responses: Vec::new(),
                    children: children.to_vec(),
                    split_fractions: split_fractions.to_vec(),
                    split: Some(split_schema(criterion)),
                },
            })
            .collect();

        TreeSchema {
            version: FORMAT_VERSION,
            branching: BRANCHING,
            n_features: tree.n_features(),
            nodes,
        }
    }
}

fn split_schema(criterion: &SplitCriterion) -> SplitSchema {
    match criterion {
        SplitCriterion::Numeric { feature, threshold } => SplitSchema::Numeric {
            feature: *feature,
            threshold: *threshold,
        },
        SplitCriterion::Categorical { feature, admitted } => SplitSchema::Categorical {
            feature: *feature,
            categories: admitted.iter().collect(),
        },
    }
}

// ============================================================================
// Schema -> tree
// ============================================================================

impl TryFrom<TreeSchema> for Tree {
    type Error = PersistError;

    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        if schema.version != FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: schema.version,
                supported: FORMAT_VERSION,
            });
        }
        if schema.branching != BRANCHING {
            return Err(invalid(format!(
                "branching factor {} (expected {BRANCHING})",
                schema.branching
            )));
        }
        if schema.nodes.is_empty() {
            return Err(invalid("tree has no nodes"));
        }
        if schema.nodes.len() > NodeId::MAX as usize {
            return Err(invalid("too many nodes"));
        }

        let n_features = schema.n_features;
        let n_nodes = schema.nodes.len();
        let nodes = schema
            .nodes
            .into_iter()
            .enumerate()
            .map(|(id, node)| convert_node(id, node, n_nodes, n_features))
            .collect::<Result<Vec<_>, _>>()?;

        check_links(&nodes)?;
        Ok(Tree::from_nodes(nodes, n_features))
    }
}

fn invalid(msg: impl Into<String>) -> PersistError {
    PersistError::Invalid(msg.into())
}

fn convert_node(id: usize, node: NodeSchema, n_nodes: usize, n_features: usize) -> Result<Node, PersistError> {
    if id == 0 && node.parent.is_some() {
        return Err(invalid("root must not have a parent"));
    }
    if id != 0 && node.parent.is_none() {
        return Err(invalid(format!("node {id} has no parent")));
    }

    if node.is_leaf {
        if !node.children.is_empty() || !node.split_fractions.is_empty() || node.split.is_some() {
            return Err(invalid(format!("leaf {id} carries split data")));
        }
        if node.responses.iter().any(|r| !r.is_finite()) {
            return Err(invalid(format!("leaf {id} has a non-finite response")));
        }
        if !node.responses.windows(2).all(|w| w[0] <= w[1]) {
            return Err(invalid(format!("leaf {id} responses are not sorted")));
        }
        return Ok(Node::leaf(node.parent, node.responses));
    }

    if !node.responses.is_empty() {
        return Err(invalid(format!("internal node {id} carries responses")));
    }
    let children: [NodeId; BRANCHING] = node
        .children
        .as_slice()
        .try_into()
        .map_err(|_| invalid(format!("node {id} needs {BRANCHING} children")))?;
    // Ids follow breadth-first growth order, so children come after parents.
    if let Some(&child) = children.iter().find(|&&c| c as usize <= id || c as usize >= n_nodes) {
        return Err(invalid(format!("node {id} has invalid child {child}")));
    }

    let split_fractions: [Float; BRANCHING] = node
        .split_fractions
        .as_slice()
        .try_into()
        .map_err(|_| invalid(format!("node {id} needs {BRANCHING} split fractions")))?;
    if split_fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
        return Err(invalid(format!("node {id} has a split fraction outside [0, 1]")));
    }
    let sum: Float = split_fractions.iter().sum();
    if (sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
        return Err(invalid(format!("node {id} split fractions sum to {sum}")));
    }

    let split = node
        .split
        .ok_or_else(|| invalid(format!("internal node {id} has no split")))?;
    let criterion = match split {
        SplitSchema::Numeric { feature, threshold } => {
            if !threshold.is_finite() {
                return Err(invalid(format!("node {id} has a non-finite threshold")));
            }
            SplitCriterion::Numeric { feature, threshold }
        }
        SplitSchema::Categorical { feature, categories } => {
            if let Some(&cat) = categories.iter().find(|&&c| c >= MAX_CATEGORIES) {
                return Err(invalid(format!(
                    "node {id} admits category {cat} (at most {MAX_CATEGORIES} categories)"
                )));
            }
            SplitCriterion::Categorical {
                feature,
                admitted: categories.into_iter().collect::<CatBitset>(),
            }
        }
    };
    if criterion.feature() >= n_features {
        return Err(invalid(format!(
            "node {id} splits on feature {} of {n_features}",
            criterion.feature()
        )));
    }

    Ok(Node::internal(node.parent, children, split_fractions, criterion))
}

/// Every node must be reached exactly once from the root, through a parent
/// whose id matches its `parent` link.
fn check_links(nodes: &[Node]) -> Result<(), PersistError> {
    let mut seen = vec![false; nodes.len()];
    let mut stack = vec![0 as NodeId];
    seen[0] = true;

    while let Some(id) = stack.pop() {
        for &child in nodes[id as usize].children() {
            let slot = &mut seen[child as usize];
            if *slot {
                return Err(invalid(format!("node {child} is reached twice")));
            }
            *slot = true;
            if nodes[child as usize].parent != Some(id) {
                return Err(invalid(format!("node {child} does not link back to parent {id}")));
            }
            stack.push(child);
        }
    }

    match seen.iter().position(|&s| !s) {
        Some(orphan) => Err(invalid(format!("node {orphan} is unreachable from the root"))),
        None => Ok(()),
    }
}

// ============================================================================
// Tree convenience API
// ============================================================================

impl Tree {
    /// Save the tree as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        super::save_json_file(self, path)
    }

    /// Load a tree saved with [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        super::load_json_file(path)
    }
}
