//! Structural properties of grown trees on random data.

use proptest::prelude::*;

use rsstree::testing::{assert_tree_invariants, random_mixed_dataset, random_weights};
use rsstree::training::SplitFinder;
use rsstree::{Dataset, FeatureSource, Float, NodeId, NodeKind, Subspace, Tree, TreeGrower, TreeParams};

/// Number of training samples below each node.
fn subtree_counts(tree: &Tree) -> Vec<usize> {
    let mut counts = vec![0; tree.n_nodes()];
    // Children always have larger ids than their parent.
    for id in (0..tree.n_nodes()).rev() {
        counts[id] = match &tree.node(id as NodeId).kind {
            NodeKind::Leaf { responses, .. } => responses.len(),
            NodeKind::Internal { children, .. } => children.iter().map(|&c| counts[c as usize]).sum(),
        };
    }
    counts
}

fn params_strategy() -> impl Strategy<Value = TreeParams> {
    (1u32..8, 2usize..6, 1usize..4, 0usize..4).prop_map(|(max_depth, split, leaf, features)| TreeParams {
        max_depth,
        min_samples_to_split: split,
        min_samples_per_leaf: leaf,
        max_features_per_split: features,
        ..Default::default()
    })
}

fn grow(ds: &Dataset, params: TreeParams, seed: u64) -> Tree {
    TreeGrower::new(params, seed).unwrap().grow(ds).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn leaves_partition_the_samples(
        n_samples in 2usize..200,
        data_seed in any::<u64>(),
        seed in any::<u64>(),
        params in params_strategy(),
    ) {
        let ds = random_mixed_dataset(n_samples, 2, 2, 5, data_seed);
        let tree = grow(&ds, params.clone(), seed);
        assert_tree_invariants(&tree, n_samples);

        // Every sample lands in a leaf holding its response.
        for i in 0..n_samples {
            let leaf = tree.classify(&ds.row(i)).unwrap();
            let responses = tree.node(leaf).responses().unwrap();
            prop_assert!(responses.binary_search_by(|r| r.total_cmp(&ds.response(i))).is_ok());
        }

        // Leaves respect the per-leaf minimum.
        for leaf in tree.leaves().filter(|&id| id != tree.root()) {
            prop_assert!(tree.node(leaf).responses().unwrap().len() >= params.min_samples_per_leaf);
        }
    }

    #[test]
    fn split_fractions_are_exact_child_shares(
        n_samples in 2usize..150,
        data_seed in any::<u64>(),
        seed in any::<u64>(),
    ) {
        let ds = random_mixed_dataset(n_samples, 1, 1, 4, data_seed)
            .with_weights(random_weights(n_samples, data_seed))
            .unwrap();
        let tree = grow(&ds, TreeParams::default(), seed);
        let counts = subtree_counts(&tree);

        for (id, node) in tree.nodes().iter().enumerate() {
            if let NodeKind::Internal { children, split_fractions, .. } = &node.kind {
                for (&child, &fraction) in children.iter().zip(split_fractions) {
                    let expected = counts[child as usize] as Float / counts[id] as Float;
                    prop_assert_eq!(fraction, expected);
                    prop_assert!(counts[child as usize] > 0);
                }
            }
        }
    }

    #[test]
    fn leaf_subspaces_agree_with_classification(
        n_samples in 2usize..120,
        data_seed in any::<u64>(),
        seed in any::<u64>(),
    ) {
        let ds = random_mixed_dataset(n_samples, 2, 1, 3, data_seed);
        let tree = grow(&ds, TreeParams::default(), seed);
        let leaves = tree.leaf_subspaces(&Subspace::full(&ds));
        prop_assert_eq!(leaves.len(), tree.n_leaves());

        for i in 0..n_samples {
            let row = ds.row(i);
            let containing: Vec<NodeId> = leaves
                .iter()
                .filter(|(_, space)| space.contains(&row))
                .map(|(id, _)| *id)
                .collect();
            prop_assert_eq!(containing, vec![tree.classify(&row).unwrap()]);
        }
    }

    #[test]
    fn more_candidates_never_worsen_the_search(
        n_samples in 4usize..100,
        data_seed in any::<u64>(),
        subset in prop::collection::vec(any::<bool>(), 5),
    ) {
        let ds = random_mixed_dataset(n_samples, 3, 2, 6, data_seed);
        let indices: Vec<u32> = (0..n_samples as u32).collect();
        let all: Vec<usize> = (0..ds.n_features()).collect();
        let some: Vec<usize> = all.iter().copied().filter(|&f| subset[f]).collect();

        let mut finder = SplitFinder::new(1e-6, 1);
        let best_all = finder.best_loss(&ds, &indices, &all);
        let best_some = finder.best_loss(&ds, &indices, &some);
        prop_assert!(best_all <= best_some);

        let per_feature = all
            .iter()
            .map(|&f| finder.feature_loss(&ds, f, &indices))
            .fold(Float::INFINITY, Float::min);
        prop_assert_eq!(best_all, per_feature);
    }
}
