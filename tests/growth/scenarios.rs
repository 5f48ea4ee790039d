//! Small hand-checked growth scenarios.

use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use rsstree::testing::{category_means_dataset, constant_features_dataset, step_dataset};
use rsstree::training::{SplitFinder, Transition};
use rsstree::{FeatureSource, Float, NodeKind, SplitCriterion, TreeGrower, TreeParams};

#[test]
fn continuous_step_gives_perfect_stump() {
    let ds = step_dataset();
    let params = TreeParams {
        max_depth: 1,
        ..Default::default()
    };

    for seed in 0..20 {
        let mut grower = TreeGrower::new(params.clone(), seed).unwrap();
        let root = grower.root_pending(ds.n_samples());
        let Transition::Split { loss, criterion, .. } = grower.attempt_split(&root, &ds, &[0]) else {
            panic!("step data must split");
        };
        assert_abs_diff_eq!(loss, 0.0, epsilon = 1e-12);
        let SplitCriterion::Numeric { threshold, .. } = criterion else {
            panic!("numeric feature must give a numeric split");
        };
        assert!(threshold > 1.0 && threshold < 2.0, "threshold {threshold}");

        let tree = TreeGrower::new(params.clone(), seed).unwrap().grow(&ds).unwrap();
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.leaf_stats(1).unwrap().mean, 0.0);
        assert_eq!(tree.leaf_stats(2).unwrap().mean, 10.0);
    }
}

#[test]
fn categories_group_by_mean_and_unseen_goes_anywhere() {
    let ds = category_means_dataset();
    let params = TreeParams {
        max_depth: 1,
        ..Default::default()
    };

    let mut unseen_left = 0;
    for seed in 0..64 {
        let tree = TreeGrower::new(params.clone(), seed).unwrap().grow(&ds).unwrap();
        let NodeKind::Internal { criterion, .. } = &tree.node(0).kind else {
            panic!("root must split");
        };
        let SplitCriterion::Categorical { feature, admitted } = criterion else {
            panic!("categorical feature must give a categorical split");
        };
        assert_eq!(*feature, 0);
        assert!(admitted.contains(0));
        assert!(!admitted.contains(1));
        assert!(!admitted.contains(2));
        if admitted.contains(3) {
            unseen_left += 1;
        }

        // Loss does not depend on where the unseen category went.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let split = SplitFinder::new(1e-6, 1)
            .find_best(&ds, &[0, 1, 2, 3, 4, 5], &[0], &mut rng)
            .unwrap();
        assert_abs_diff_eq!(split.loss, 8.0, epsilon = 1e-9);
    }
    assert!(unseen_left > 0 && unseen_left < 64);
}

#[test]
fn constant_features_make_a_single_leaf() {
    let ds = constant_features_dataset();
    let mut finder = SplitFinder::new(1e-6, 1);
    assert_eq!(finder.best_loss(&ds, &[0, 1, 2, 3, 4], &[0, 1]), Float::INFINITY);

    let tree = TreeGrower::new(TreeParams::default(), 0).unwrap().grow(&ds).unwrap();
    assert_eq!(tree.n_nodes(), 1);
    assert_eq!(
        tree.node(0).responses(),
        Some(&[1.0, 2.0, 3.0, 4.0, 5.0][..])
    );
    assert_eq!(tree.predict(&[3.5, 2.0]).unwrap(), 3.0);
}

#[test]
fn growth_is_reproducible_per_seed() {
    let ds = rsstree::testing::random_mixed_dataset(120, 3, 2, 6, 11);
    let params = TreeParams {
        max_features_per_split: 2,
        ..Default::default()
    };
    let a = TreeGrower::new(params.clone(), 3).unwrap().grow(&ds).unwrap();
    let b = TreeGrower::new(params, 3).unwrap().grow(&ds).unwrap();
    assert_eq!(a, b);
}
