//! Testing utilities for rsstree.
//!
//! Fixtures and assertion helpers shared by unit tests, integration tests and
//! benches:
//!
//! ```ignore
//! use rsstree::testing::{random_mixed_dataset, assert_tree_invariants};
//! ```

use rand::prelude::*;

use crate::data::{Dataset, FeatureColumn};
use crate::repr::{NodeKind, Tree};
use crate::{Float, BRANCHING};

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for loss and prediction comparisons.
#[cfg(not(feature = "f32"))]
pub const DEFAULT_TOLERANCE: Float = 1e-9;

/// Default tolerance for loss and prediction comparisons.
#[cfg(feature = "f32")]
pub const DEFAULT_TOLERANCE: Float = 1e-3;

// =============================================================================
// Fixed datasets
// =============================================================================

/// One continuous feature `[0, 1, 2, 3]` with responses `[0, 0, 10, 10]`.
pub fn step_dataset() -> Dataset {
    Dataset::new(
        vec![FeatureColumn::numeric(vec![0.0, 1.0, 2.0, 3.0])],
        vec![0.0, 0.0, 10.0, 10.0],
    )
    .expect("valid fixture")
}

/// One categorical feature with 4 categories. Category means are 1, 5 and 9
/// for categories 0, 1 and 2; category 3 is never observed.
pub fn category_means_dataset() -> Dataset {
    Dataset::new(
        vec![FeatureColumn::categorical(vec![0, 0, 0, 0, 1, 2], 4)],
        vec![1.0, 1.0, 1.0, 1.0, 5.0, 9.0],
    )
    .expect("valid fixture")
}

/// Two features that are constant over every sample, with varying responses.
pub fn constant_features_dataset() -> Dataset {
    Dataset::new(
        vec![
            FeatureColumn::numeric(vec![3.5; 5]),
            FeatureColumn::categorical(vec![2; 5], 4),
        ],
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
    )
    .expect("valid fixture")
}

// =============================================================================
// Random datasets
// =============================================================================

/// Random dataset with `n_continuous` continuous features followed by
/// `n_categorical` categorical ones.
///
/// Continuous values are rounded to one decimal in `[0, 10)`, so ties occur.
/// Responses depend on the first feature of each kind plus uniform noise.
pub fn random_mixed_dataset(
    n_samples: usize,
    n_continuous: usize,
    n_categorical: usize,
    n_categories: u32,
    seed: u64,
) -> Dataset {
    assert!(n_categories > 0);
    let mut rng = StdRng::seed_from_u64(seed);

    let continuous: Vec<Vec<Float>> = (0..n_continuous)
        .map(|_| {
            (0..n_samples)
                .map(|_| (rng.gen_range(0.0..10.0 as Float) * 10.0).floor() / 10.0)
                .collect()
        })
        .collect();
    let categorical: Vec<Vec<u32>> = (0..n_categorical)
        .map(|_| (0..n_samples).map(|_| rng.gen_range(0..n_categories)).collect())
        .collect();
    let category_effect: Vec<Float> = (0..n_categories).map(|_| rng.gen_range(-5.0..5.0)).collect();

    let targets = (0..n_samples)
        .map(|i| {
            let mut y: Float = rng.gen_range(-0.5..0.5);
            if let Some(x) = continuous.first() {
                let step: Float = if x[i] > 5.0 { 3.0 } else { -1.0 };
                y += step + 0.2 * x[i];
            }
            if let Some(c) = categorical.first() {
                y += category_effect[c[i] as usize];
            }
            y
        })
        .collect();

    let features = continuous
        .into_iter()
        .map(FeatureColumn::numeric)
        .chain(
            categorical
                .into_iter()
                .map(|values| FeatureColumn::categorical(values, n_categories)),
        )
        .collect();
    Dataset::new(features, targets).expect("valid random dataset")
}

/// Uniform weights in `[0.5, 2)`.
pub fn random_weights(n_samples: usize, seed: u64) -> Vec<Float> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_samples).map(|_| rng.gen_range(0.5..2.0)).collect()
}

// =============================================================================
// Reference computations
// =============================================================================

/// Weighted residual sum of squares around the weighted mean, two-pass.
pub fn weighted_rss(responses: &[Float], weights: &[Float]) -> Float {
    let total: Float = weights.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let mean = responses.iter().zip(weights).map(|(y, w)| y * w).sum::<Float>() / total;
    responses
        .iter()
        .zip(weights)
        .map(|(y, w)| w * (y - mean) * (y - mean))
        .sum()
}

/// Smallest loss over every two-sided grouping of the observed categories,
/// by enumeration. `+∞` with fewer than two observed categories.
///
/// Exponential in the number of observed categories; keep it small.
pub fn brute_force_categorical_loss(categories: &[u32], responses: &[Float], weights: &[Float]) -> Float {
    let mut observed: Vec<u32> = categories.to_vec();
    observed.sort_unstable();
    observed.dedup();
    if observed.len() < 2 {
        return Float::INFINITY;
    }
    assert!(observed.len() <= 16, "too many categories to enumerate");

    let mut best = Float::INFINITY;
    // Bit i set = observed[i] goes left. observed[0] stays right, which skips
    // mirrored groupings.
    for mask in 1u32..(1 << (observed.len() - 1)) {
        let goes_left = |cat: u32| {
            let pos = observed.binary_search(&cat).unwrap_or(0);
            pos > 0 && (mask >> (pos - 1)) & 1 == 1
        };
        let mut left = (Vec::new(), Vec::new());
        let mut right = (Vec::new(), Vec::new());
        for ((&c, &y), &w) in categories.iter().zip(responses).zip(weights) {
            let side = if goes_left(c) { &mut left } else { &mut right };
            side.0.push(y);
            side.1.push(w);
        }
        let loss = weighted_rss(&left.0, &left.1) + weighted_rss(&right.0, &right.1);
        best = best.min(loss);
    }
    best
}

// =============================================================================
// Assertions
// =============================================================================

/// Assert that two slices are approximately equal element-wise.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than `tolerance`.
pub fn assert_slice_approx_eq(actual: &[Float], expected: &[Float], tolerance: Float, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{context}[{i}]: {a} != {e} (diff={diff}, tolerance={tolerance})"
        );
    }
}

/// Assert the structural invariants of a grown tree.
///
/// - node 0 is the root and every other node's parent lists it as a child
/// - internal nodes have [`BRANCHING`] children with larger ids
/// - split fractions lie in `[0, 1]` and sum to 1
/// - leaf responses are sorted and together hold `n_samples` entries
pub fn assert_tree_invariants(tree: &Tree, n_samples: usize) {
    let nodes = tree.nodes();
    assert!(!nodes.is_empty(), "tree has no root");
    assert_eq!(nodes[0].parent, None, "root has a parent");

    let mut leaf_total = 0;
    for (id, node) in nodes.iter().enumerate() {
        if id > 0 {
            let parent = node.parent.unwrap_or_else(|| panic!("node {id} has no parent"));
            assert!(
                nodes[parent as usize].children().contains(&(id as u32)),
                "node {id} missing from parent {parent}"
            );
        }
        match &node.kind {
            NodeKind::Leaf { responses, .. } => {
                assert!(
                    responses.windows(2).all(|w| w[0] <= w[1]),
                    "leaf {id} responses not sorted"
                );
                leaf_total += responses.len();
            }
            NodeKind::Internal {
                children,
                split_fractions,
                ..
            } => {
                assert_eq!(children.len(), BRANCHING);
                for &child in children {
                    assert!(child as usize > id && (child as usize) < nodes.len());
                    assert_eq!(nodes[child as usize].parent, Some(id as u32));
                }
                assert!(split_fractions.iter().all(|f| (0.0..=1.0).contains(f)));
                let sum: Float = split_fractions.iter().sum();
                assert!((sum - 1.0).abs() < 1e-6, "node {id} fractions sum to {sum}");
            }
        }
    }
    assert_eq!(leaf_total, n_samples, "leaves do not cover every sample");
}
