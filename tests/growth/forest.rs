//! Forest driver over an `ndarray` source.

use ndarray::{Array1, Array2};
use rstest::rstest;

use rsstree::testing::assert_tree_invariants;
use rsstree::training::Bootstrap;
use rsstree::{grow_forest, ArrayDataset, FeatureKind, Float, ForestParams, TreeParams};

fn arrays(n_samples: usize) -> (Array2<Float>, Array1<Float>) {
    let features = Array2::from_shape_fn((n_samples, 3), |(i, j)| match j {
        0 => (i as Float * 0.37).sin(),
        1 => ((i * 7) % 13) as Float,
        _ => (i % 4) as Float,
    });
    let targets = Array1::from_shape_fn(n_samples, |i| {
        features[[i, 0]] * 4.0 + if i % 4 == 1 { 2.0 } else { 0.0 }
    });
    (features, targets)
}

fn source<'a>(features: &'a Array2<Float>, targets: &'a Array1<Float>) -> ArrayDataset<'a> {
    ArrayDataset::new(features.view(), targets.view())
        .unwrap()
        .with_feature_kind(2, FeatureKind::Categorical { n_categories: 4 })
        .unwrap()
}

#[rstest]
#[case(Bootstrap::None)]
#[case(Bootstrap::WithReplacement { fraction: 1.0 })]
#[case(Bootstrap::WithoutReplacement { fraction: 0.6 })]
fn deterministic_across_thread_counts(#[case] bootstrap: Bootstrap) {
    let (features, targets) = arrays(80);
    let ds = source(&features, &targets);
    let params = ForestParams {
        n_trees: 8,
        bootstrap,
        seed: 1234,
        tree: TreeParams {
            max_features_per_split: 2,
            ..Default::default()
        },
        ..Default::default()
    };

    let reference = grow_forest(&ds, &ForestParams { n_threads: 1, ..params.clone() }).unwrap();
    for n_threads in [0, 2, 4] {
        let forest = grow_forest(&ds, &ForestParams { n_threads, ..params.clone() }).unwrap();
        assert_eq!(forest, reference, "{n_threads} threads");
    }
}

#[test]
fn bootstrap_sizes_reach_the_leaves() {
    let (features, targets) = arrays(50);
    let ds = source(&features, &targets);
    let params = ForestParams {
        n_trees: 3,
        bootstrap: Bootstrap::WithoutReplacement { fraction: 0.5 },
        n_threads: 1,
        ..Default::default()
    };
    for tree in grow_forest(&ds, &params).unwrap() {
        assert_tree_invariants(&tree, 25);
    }
}

#[test]
fn different_seeds_differ() {
    let (features, targets) = arrays(60);
    let ds = source(&features, &targets);
    let a = grow_forest(&ds, &ForestParams { seed: 1, n_threads: 1, ..Default::default() }).unwrap();
    let b = grow_forest(&ds, &ForestParams { seed: 2, n_threads: 1, ..Default::default() }).unwrap();
    assert_ne!(a, b);
}
