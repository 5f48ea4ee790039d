//! Optimal threshold search on a continuous feature.

use crate::data::FeatureSource;
use crate::training::stats::WeightedRunningStats;
use crate::Float;

/// Best cut of a continuous feature, before its threshold is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousCut {
    /// Weighted RSS of the two sides.
    pub loss: Float,
    /// Largest feature value on the left side.
    pub lo: Float,
    /// Smallest feature value on the right side.
    pub hi: Float,
}

/// One gathered observation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Observation {
    value: Float,
    response: Float,
    weight: Float,
}

/// Sweep every candidate cut of `feature` over the samples in `indices`.
///
/// Sorted values within `tolerance` of a group's first value form one group
/// that is never cut. Cuts leaving fewer than `min_leaf` samples on a side are
/// skipped. Returns `None` when no cut is usable (e.g. the feature is constant
/// in this node).
pub(crate) fn best_cut<D: FeatureSource + ?Sized>(
    source: &D,
    feature: usize,
    indices: &[u32],
    tolerance: Float,
    min_leaf: usize,
    scratch: &mut Vec<Observation>,
) -> Option<ContinuousCut> {
    scratch.clear();
    scratch.extend(indices.iter().map(|&i| {
        let i = i as usize;
        Observation {
            value: source.feature(feature, i),
            response: source.response(i),
            weight: source.weight(i),
        }
    }));
    scratch.sort_by(|a, b| a.value.total_cmp(&b.value));

    let n = scratch.len();
    if n < 2 || scratch[n - 1].value - scratch[0].value <= tolerance {
        return None;
    }

    let mut left = WeightedRunningStats::new();
    let mut right = accumulate(scratch);

    let mut best: Option<ContinuousCut> = None;
    let mut i = 0;
    while i < n {
        let group_limit = scratch[i].value + tolerance;
        let mut j = i;
        let mut rebuild = false;
        while j < n && scratch[j].value <= group_limit {
            let obs = scratch[j];
            // Removing more than half of the remaining weight cancels most of
            // the significant digits of the running sums.
            rebuild |= 2.0 * obs.weight > right.sum_of_weights();
            right.pop(obs.response, obs.weight);
            left.push(obs.response, obs.weight);
            j += 1;
        }
        if rebuild {
            right = accumulate(&scratch[j..]);
        }

        if right.count() == 0 {
            break;
        }

        if left.count() >= min_leaf && right.count() >= min_leaf {
            let loss = left.sum_squared_deviations() + right.sum_squared_deviations();
            if best.map_or(true, |b| loss < b.loss) {
                best = Some(ContinuousCut {
                    loss,
                    lo: scratch[j - 1].value,
                    hi: scratch[j].value,
                });
            }
        }

        i = j;
    }

    best
}

fn accumulate(observations: &[Observation]) -> WeightedRunningStats {
    let mut stats = WeightedRunningStats::new();
    for obs in observations {
        stats.push(obs.response, obs.weight);
    }
    stats
}
