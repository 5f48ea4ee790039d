//! Grown tree representation.
//!
//! - [`Tree`]: flat node arena with traversal and leaf queries
//! - [`Node`] / [`NodeKind`]: arena entries addressed by [`NodeId`]
//! - [`SplitCriterion`]: numeric threshold or admitted-category routing rule
//! - [`Subspace`]: axis-aligned region of feature space, bisected by criteria
//! - [`export`]: text labels and LaTeX rendering

mod categorical;
mod criterion;
pub mod export;
mod node;
mod subspace;
mod tree;

pub use categorical::{CatBitset, MAX_CATEGORIES};
pub use criterion::SplitCriterion;
pub use node::{LeafStats, Node, NodeId, NodeKind};
pub use subspace::{FeatureRange, Subspace};
pub use tree::{PredictError, Tree};
