//! Text export of grown trees.

use std::fmt::Write;

use super::criterion::SplitCriterion;
use super::node::{NodeId, NodeKind};
use super::tree::Tree;

/// Label of one node, deterministic in the node's content.
///
/// Leaves render sample count, mean and variance; internal nodes render their
/// split rule.
pub fn node_label(tree: &Tree, id: NodeId, display_index: usize) -> String {
    let node = tree.node(id);
    match &node.kind {
        NodeKind::Leaf { stats, .. } => {
            format!(
                "i = {display_index}: N = {}, mean = {}, variance = {}",
                stats.count, stats.mean, stats.variance
            )
        }
        NodeKind::Internal { criterion, .. } => {
            format!("i = {display_index}: {criterion}")
        }
    }
}

fn latex_rule(criterion: &SplitCriterion) -> String {
    match criterion {
        SplitCriterion::Numeric { feature, threshold } => {
            format!("$f_{{{feature}}} \\le {threshold}$")
        }
        SplitCriterion::Categorical { feature, admitted } => {
            let cats: Vec<String> = admitted.iter().map(|c| c.to_string()).collect();
            format!("$f_{{{feature}}} \\in \\{{{}\\}}$", cats.join(", "))
        }
    }
}

/// Render the tree as a `forest` (TikZ) environment.
///
/// Nodes are numbered by their arena id.
pub fn to_latex(tree: &Tree) -> String {
    let mut out = String::from("\\begin{forest}\n");
    write_latex(tree, tree.root(), 1, &mut out);
    out.push_str("\\end{forest}\n");
    out
}

fn write_latex(tree: &Tree, id: NodeId, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    let node = tree.node(id);
    // Writing to a String cannot fail.
    match &node.kind {
        NodeKind::Leaf { .. } => {
            let _ = writeln!(out, "{pad}[{{{}}}]", node_label(tree, id, id as usize));
        }
        NodeKind::Internal {
            children, criterion, ..
        } => {
            let _ = writeln!(
                out,
                "{pad}[{{i = {id}\\nodepart{{two}} {{{}}}}}, rectangle split, rectangle split parts=2, draw",
                latex_rule(criterion)
            );
            for &child in children {
                write_latex(tree, child, indent + 1, out);
            }
            let _ = writeln!(out, "{pad}]");
        }
    }
}
