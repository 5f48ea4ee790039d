//! Optimal category partition search on a categorical feature.
//!
//! For squared loss the best binary grouping of categories never crosses the
//! ordering of per-category mean responses, so instead of enumerating all
//! `2^C` subsets we:
//! 1. Accumulate weighted statistics per category observed in the node
//! 2. Sort observed categories by mean (stable, so ties keep index order)
//! 3. Scan the `C_obs - 1` boundaries of that order
//!
//! Categories without observations in the node do not affect the loss. They
//! are returned separately so the caller can assign them at random.

use crate::data::FeatureSource;
use crate::repr::CatBitset;
use crate::training::stats::WeightedRunningStats;
use crate::Float;

/// Best partition of a categorical feature, before unseen categories are
/// assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalCut {
    /// Weighted RSS of the two sides.
    pub loss: Float,
    /// Observed categories routed to child 0.
    pub admitted: CatBitset,
    /// Categories without observations in the node, ascending.
    pub unseen: Vec<u32>,
}

/// Reusable per-node buffers.
#[derive(Debug, Clone, Default)]
pub(crate) struct CategoricalScratch {
    per_category: Vec<WeightedRunningStats>,
    order: Vec<u32>,
    suffix: Vec<WeightedRunningStats>,
}

/// Search the best cut of categorical `feature` over the samples in `indices`.
///
/// Feature values must be valid category indices below `n_categories`.
/// Returns `None` with fewer than two observed categories or when every
/// boundary leaves fewer than `min_leaf` samples on a side.
pub(crate) fn best_cut<D: FeatureSource + ?Sized>(
    source: &D,
    feature: usize,
    n_categories: u32,
    indices: &[u32],
    min_leaf: usize,
    scratch: &mut CategoricalScratch,
) -> Option<CategoricalCut> {
    let CategoricalScratch {
        per_category,
        order,
        suffix,
    } = scratch;

    per_category.clear();
    per_category.resize(n_categories as usize, WeightedRunningStats::new());
    for &i in indices {
        let i = i as usize;
        let cat = source.feature(feature, i) as usize;
        per_category[cat].push(source.response(i), source.weight(i));
    }

    order.clear();
    order.extend((0..n_categories).filter(|&c| per_category[c as usize].count() > 0));
    if order.len() < 2 {
        return None;
    }
    order.sort_by(|&a, &b| {
        per_category[a as usize]
            .mean()
            .total_cmp(&per_category[b as usize].mean())
    });

    // suffix[i] holds the merged statistics of order[i..].
    suffix.clear();
    suffix.resize(order.len(), WeightedRunningStats::new());
    let mut acc = WeightedRunningStats::new();
    for (i, &cat) in order.iter().enumerate().rev() {
        acc.merge(&per_category[cat as usize]);
        suffix[i] = acc;
    }

    let mut left = WeightedRunningStats::new();
    let mut best: Option<(Float, usize)> = None;
    for boundary in 0..order.len() - 1 {
        left.merge(&per_category[order[boundary] as usize]);
        let right = &suffix[boundary + 1];

        if left.count() < min_leaf || right.count() < min_leaf {
            continue;
        }

        let loss = left.sum_squared_deviations() + right.sum_squared_deviations();
        if best.map_or(true, |(b, _)| loss < b) {
            best = Some((loss, boundary));
        }
    }

    let (loss, boundary) = best?;
    let admitted = order[..=boundary].iter().copied().collect();
    let unseen = (0..n_categories)
        .filter(|&c| per_category[c as usize].count() == 0)
        .collect();

    Some(CategoricalCut {
        loss,
        admitted,
        unseen,
    })
}
