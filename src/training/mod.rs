//! Tree growth.
//!
//! This module provides the growth engine and its building blocks:
//!
//! - [`TreeGrower`]: breadth-first growth of one tree
//! - [`SplitFinder`]: best RSS split over candidate features
//! - [`SamplePartition`]: in-place sample index partitioning
//! - [`TreeBuilder`]: arena with reserved node ids
//! - [`RunningStats`] / [`WeightedRunningStats`]: online mean and variance
//! - [`FeatureSampler`] / [`bootstrap_indices`]: feature and sample bagging
//! - [`grow_forest`]: many independent trees in parallel
//! - [`TrainingLogger`]: leveled output with [`Verbosity`]
//!
//! ## Stopping rules
//!
//! A pending node becomes a leaf, without consuming randomness, when any of
//! these hold:
//!
//! - its depth reached `max_depth`
//! - it holds fewer than `min_samples_to_split` samples
//! - it holds fewer than `2 * min_samples_per_leaf` samples
//! - all its responses are identical
//! - reserving its children would exceed `max_nodes`
//!
//! It also becomes a leaf when no candidate feature has a usable cut.

mod builder;
mod forest;
mod grower;
mod logger;
mod params;
mod partition;
mod sampling;
pub mod split;
mod stats;

pub use builder::TreeBuilder;
pub use forest::grow_forest;
pub use grower::{GrowError, PendingNode, Transition, TreeGrower};
pub use logger::{TrainingLogger, Verbosity};
pub use params::{Bootstrap, ForestParams, ParamsError, TreeParams};
pub use partition::SamplePartition;
pub use sampling::{bootstrap_indices, FeatureSampler};
pub use split::{SplitFinder, SplitResult};
pub use stats::{RunningStats, WeightedRunningStats};
