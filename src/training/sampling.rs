//! Feature and sample subsampling.
//!
//! - [`FeatureSampler`]: candidate features per node (feature bagging)
//! - [`bootstrap_indices`]: per-tree sample indices (bagging)
//!
//! Both draw from the caller's random stream, so a fixed seed reproduces the
//! same schedule.

use rand::Rng;

use crate::Float;

use super::params::Bootstrap;

// ============================================================================
// FeatureSampler
// ============================================================================

/// Draws candidate features for each node without replacement.
///
/// Results are sorted ascending, which fixes the order in which the split
/// finder evaluates (and breaks ties between) candidates.
#[derive(Debug, Clone)]
pub struct FeatureSampler {
    n_features: usize,
    per_split: usize,
    scratch: Vec<usize>,
}

impl FeatureSampler {
    /// Sampler drawing `per_split` of `n_features` features (clamped).
    pub fn new(n_features: usize, per_split: usize) -> Self {
        Self {
            n_features,
            per_split: per_split.min(n_features),
            scratch: (0..n_features).collect(),
        }
    }

    /// Returns true if fewer than all features are drawn.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.per_split < self.n_features
    }

    /// Draw the candidate features of one node into `out`.
    ///
    /// Consumes no randomness when every feature is a candidate.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R, out: &mut Vec<usize>) {
        out.clear();
        if !self.is_enabled() {
            out.extend(0..self.n_features);
            return;
        }

        // Partial Fisher-Yates over a reusable permutation.
        for i in 0..self.per_split {
            let j = rng.gen_range(i..self.n_features);
            self.scratch.swap(i, j);
        }
        out.extend_from_slice(&self.scratch[..self.per_split]);
        out.sort_unstable();
    }
}

// ============================================================================
// Bootstrap
// ============================================================================

/// Sample indices for one tree, sorted ascending.
///
/// With replacement an index can appear several times; each occurrence is
/// treated as a separate training sample.
pub fn bootstrap_indices<R: Rng + ?Sized>(n_samples: usize, bootstrap: Bootstrap, rng: &mut R) -> Vec<u32> {
    let mut indices: Vec<u32> = match bootstrap {
        Bootstrap::None => return (0..n_samples as u32).collect(),
        Bootstrap::WithReplacement { fraction } => {
            let k = sample_size(n_samples, fraction);
            (0..k).map(|_| rng.gen_range(0..n_samples) as u32).collect()
        }
        Bootstrap::WithoutReplacement { fraction } => {
            let k = sample_size(n_samples, fraction);
            rand::seq::index::sample(rng, n_samples, k)
                .into_iter()
                .map(|i| i as u32)
                .collect()
        }
    };
    indices.sort_unstable();
    indices
}

fn sample_size(n_samples: usize, fraction: Float) -> usize {
    if n_samples == 0 {
        return 0;
    }
    ((n_samples as Float * fraction).round() as usize).clamp(1, n_samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn all_features_without_randomness() {
        let mut sampler = FeatureSampler::new(4, 4);
        assert!(!sampler.is_enabled());

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let before = rng.clone();
        let mut out = Vec::new();
        sampler.sample(&mut rng, &mut out);
        assert_eq!(out, vec![0, 1, 2, 3]);
        assert_eq!(rng, before);
    }

    #[test]
    fn subset_is_sorted_and_distinct() {
        let mut sampler = FeatureSampler::new(10, 3);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut out = Vec::new();
        for _ in 0..50 {
            sampler.sample(&mut rng, &mut out);
            assert_eq!(out.len(), 3);
            assert!(out.windows(2).all(|w| w[0] < w[1]));
            assert!(out.iter().all(|&f| f < 10));
        }
    }

    #[test]
    fn same_seed_same_schedule() {
        let draw = |seed| {
            let mut sampler = FeatureSampler::new(8, 2);
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let mut out = Vec::new();
            (0..5)
                .map(|_| {
                    sampler.sample(&mut rng, &mut out);
                    out.clone()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
    }

    #[test]
    fn bootstrap_sizes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        assert_eq!(bootstrap_indices(5, Bootstrap::None, &mut rng), vec![0, 1, 2, 3, 4]);

        let with = bootstrap_indices(100, Bootstrap::WithReplacement { fraction: 1.0 }, &mut rng);
        assert_eq!(with.len(), 100);
        assert!(with.iter().all(|&i| i < 100));
        assert!(with.windows(2).all(|w| w[0] <= w[1]));

        let without = bootstrap_indices(100, Bootstrap::WithoutReplacement { fraction: 0.3 }, &mut rng);
        assert_eq!(without.len(), 30);
        assert!(without.windows(2).all(|w| w[0] < w[1]));
    }
}
