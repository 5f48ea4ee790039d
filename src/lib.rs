//! rsstree: regression tree growth for random forests.
//!
//! Grows k-ary (binary by default) regression trees by recursive partitioning
//! that minimizes the residual sum of squares, over mixed continuous and
//! categorical features. Trees are the per-tree building block of a random
//! forest: bagging and feature subsampling are driven by the caller, or by the
//! thin defaults in [`grow_forest`].
//!
//! # Key Types
//!
//! - [`FeatureSource`] - Read-only dataset capability the engine consumes
//! - [`Dataset`] / [`ArrayDataset`] - In-memory providers
//! - [`TreeGrower`] / [`TreeParams`] - Growth loop and its configuration
//! - [`Tree`] / [`SplitCriterion`] - Grown tree arena and split rules
//! - [`RunningStats`] / [`WeightedRunningStats`] - Online mean/variance
//!
//! # Example
//!
//! ```
//! use rsstree::{Dataset, FeatureColumn, TreeGrower, TreeParams};
//!
//! let dataset = Dataset::new(
//!     vec![FeatureColumn::numeric(vec![0.0, 1.0, 2.0, 3.0])],
//!     vec![0.0, 0.0, 10.0, 10.0],
//! )
//! .unwrap();
//!
//! let params = TreeParams { max_depth: 1, ..Default::default() };
//! let mut grower = TreeGrower::new(params, 42).unwrap();
//! let tree = grower.grow(&dataset).unwrap();
//!
//! assert_eq!(tree.n_leaves(), 2);
//! assert_eq!(tree.predict(&[0.5]).unwrap(), 0.0);
//! assert_eq!(tree.predict(&[2.5]).unwrap(), 10.0);
//! ```
//!
//! # Precision
//!
//! All numeric values use [`Float`], which is `f64` unless the crate is built
//! with the `f32` feature.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod persist;
pub mod repr;
pub mod testing;
pub mod training;

/// Floating point type used for features, responses, weights and statistics.
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// Floating point type used for features, responses, weights and statistics.
#[cfg(feature = "f32")]
pub type Float = f32;

/// Number of children of every internal node.
pub const BRANCHING: usize = 2;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{ArrayDataset, ConfigurationError, Dataset, FeatureColumn, FeatureKind, FeatureSource};
pub use repr::{CatBitset, MAX_CATEGORIES, Node, NodeId, NodeKind, PredictError, SplitCriterion, Subspace, Tree};
pub use training::{
    grow_forest, ForestParams, GrowError, ParamsError, RunningStats, TreeGrower, TreeParams,
    Verbosity, WeightedRunningStats,
};
