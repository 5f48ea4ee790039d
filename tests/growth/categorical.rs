//! Categorical and continuous searches against brute force.

use proptest::prelude::*;

use rsstree::testing::{brute_force_categorical_loss, weighted_rss, DEFAULT_TOLERANCE};
use rsstree::training::SplitFinder;
use rsstree::{Dataset, FeatureColumn, Float};

/// Equal up to rounding, relative to the node's total RSS.
fn close(a: Float, b: Float, scale: Float) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= DEFAULT_TOLERANCE * (1.0 + scale)
}

/// Samples as (category or value, response, weight).
fn samples(max_key: u32) -> impl Strategy<Value = Vec<(u32, Float, Float)>> {
    prop::collection::vec((0..max_key, -100.0..100.0 as Float, 0.5..3.0 as Float), 2..40)
}

/// Brute force over every cut between distinct sorted values.
fn brute_force_continuous_loss(values: &[Float], responses: &[Float], weights: &[Float]) -> Float {
    let mut distinct = values.to_vec();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    let mut best = Float::INFINITY;
    for cut in distinct.windows(2).map(|w| w[0]) {
        let (mut l, mut r) = ((vec![], vec![]), (vec![], vec![]));
        for ((&x, &y), &w) in values.iter().zip(responses).zip(weights) {
            let side = if x <= cut { &mut l } else { &mut r };
            side.0.push(y);
            side.1.push(w);
        }
        best = best.min(weighted_rss(&l.0, &l.1) + weighted_rss(&r.0, &r.1));
    }
    best
}

proptest! {
    #[test]
    fn categorical_search_matches_brute_force(n_categories in 2u32..=8, data in samples(8)) {
        let cats: Vec<u32> = data.iter().map(|s| s.0 % n_categories).collect();
        let y: Vec<Float> = data.iter().map(|s| s.1).collect();
        let w: Vec<Float> = data.iter().map(|s| s.2).collect();
        let ds = Dataset::new(vec![FeatureColumn::categorical(cats.clone(), n_categories)], y.clone())
            .unwrap()
            .with_weights(w.clone())
            .unwrap();
        let indices: Vec<u32> = (0..cats.len() as u32).collect();

        let greedy = SplitFinder::new(1e-6, 1).feature_loss(&ds, 0, &indices);
        let brute = brute_force_categorical_loss(&cats, &y, &w);
        prop_assert!(close(greedy, brute, weighted_rss(&y, &w)), "greedy {} vs brute force {}", greedy, brute);
    }

    #[test]
    fn continuous_search_matches_brute_force(data in samples(20)) {
        // Values on a 0.5 grid, far apart relative to the merge tolerance.
        let x: Vec<Float> = data.iter().map(|s| s.0 as Float * 0.5).collect();
        let y: Vec<Float> = data.iter().map(|s| s.1).collect();
        let w: Vec<Float> = data.iter().map(|s| s.2).collect();
        let ds = Dataset::new(vec![FeatureColumn::numeric(x.clone())], y.clone())
            .unwrap()
            .with_weights(w.clone())
            .unwrap();
        let indices: Vec<u32> = (0..x.len() as u32).collect();

        let swept = SplitFinder::new(1e-6, 1).feature_loss(&ds, 0, &indices);
        let brute = brute_force_continuous_loss(&x, &y, &w);
        prop_assert!(close(swept, brute, weighted_rss(&y, &w)), "sweep {} vs brute force {}", swept, brute);
    }
}
