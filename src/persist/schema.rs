//! Serialized tree layout.
//!
//! Schema types mirror the runtime arena but keep every field explicit, so
//! files stay readable and can be checked before a [`Tree`](crate::Tree) is
//! built from them.

use serde::{Deserialize, Serialize};

use crate::Float;

/// Current schema version.
pub const FORMAT_VERSION: u32 = 1;

/// Top-level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema {
    pub version: u32,
    /// Children per internal node.
    pub branching: usize,
    pub n_features: usize,
    /// Arena in id order; index 0 is the root.
    pub nodes: Vec<NodeSchema>,
}

/// One arena entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub parent: Option<u32>,
    pub is_leaf: bool,
    /// Sorted leaf responses; empty for internal nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<Float>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub split_fractions: Vec<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitSchema>,
}

/// Split rule of an internal node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitSchema {
    /// Child 0 takes `value <= threshold`.
    Numeric { feature: usize, threshold: Float },
    /// Child 0 takes the listed categories, ascending.
    Categorical { feature: usize, categories: Vec<u32> },
}
