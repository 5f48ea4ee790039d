//! Online mean/variance accumulators.
//!
//! Both accumulators support `pop`, the exact algebraic inverse of a prior
//! `push`, so a split sweep can move observations between a left and a right
//! accumulator without rescanning. Updates follow Welford (unit weights) and
//! West (weighted); the raw sum-of-squares formula is never used.
//!
//! Variances are population variances (denominator = count or sum of weights).

use crate::Float;

// =============================================================================
// RunningStats
// =============================================================================

/// Unweighted running mean and population variance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: Float,
    m2: Float,
}

impl RunningStats {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation.
    #[inline]
    pub fn push(&mut self, x: Float) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as Float;
        self.m2 += delta * (x - self.mean);
    }

    /// Remove one observation previously added with [`push`](Self::push).
    ///
    /// # Panics
    ///
    /// Debug builds panic when popping from an empty accumulator.
    #[inline]
    pub fn pop(&mut self, x: Float) {
        debug_assert!(self.count > 0, "pop from empty RunningStats");
        if self.count <= 1 {
            *self = Self::default();
            return;
        }
        let old_mean = self.mean;
        self.count -= 1;
        self.mean -= (x - old_mean) / self.count as Float;
        self.m2 -= (x - old_mean) * (x - self.mean);
        if self.m2 < 0.0 {
            self.m2 = 0.0;
        }
    }

    /// Combine with another accumulator (Chan et al.).
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let n_a = self.count as Float;
        let n_b = other.count as Float;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;
        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
    }

    /// Number of observations.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean, NaN when empty.
    #[inline]
    pub fn mean(&self) -> Float {
        if self.count == 0 {
            Float::NAN
        } else {
            self.mean
        }
    }

    /// Population variance, NaN when empty.
    #[inline]
    pub fn variance(&self) -> Float {
        if self.count == 0 {
            Float::NAN
        } else {
            self.m2 / self.count as Float
        }
    }

    /// Residual sum of squares (`count * variance`), zero when empty.
    #[inline]
    pub fn sum_squared_deviations(&self) -> Float {
        self.m2
    }
}

// =============================================================================
// WeightedRunningStats
// =============================================================================

/// Weighted running mean and population variance.
///
/// With unit weights this reproduces [`RunningStats`] exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedRunningStats {
    count: usize,
    sum_weights: Float,
    mean: Float,
    m2: Float,
}

impl WeightedRunningStats {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation with weight `w` (`w > 0`).
    #[inline]
    pub fn push(&mut self, x: Float, w: Float) {
        self.count += 1;
        self.sum_weights += w;
        let delta = x - self.mean;
        self.mean += (w / self.sum_weights) * delta;
        self.m2 += w * delta * (x - self.mean);
    }

    /// Remove one observation previously added with the same weight.
    #[inline]
    pub fn pop(&mut self, x: Float, w: Float) {
        debug_assert!(self.count > 0, "pop from empty WeightedRunningStats");
        if self.count <= 1 {
            *self = Self::default();
            return;
        }
        let old_mean = self.mean;
        self.count -= 1;
        self.sum_weights -= w;
        self.mean -= (w / self.sum_weights) * (x - old_mean);
        self.m2 -= w * (x - old_mean) * (x - self.mean);
        if self.m2 < 0.0 {
            self.m2 = 0.0;
        }
    }

    /// Combine with another accumulator.
    pub fn merge(&mut self, other: &WeightedRunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let w_a = self.sum_weights;
        let w_b = other.sum_weights;
        let w = w_a + w_b;
        let delta = other.mean - self.mean;
        self.mean += delta * w_b / w;
        self.m2 += other.m2 + delta * delta * w_a * w_b / w;
        self.sum_weights = w;
        self.count += other.count;
    }

    /// Number of observations (ignoring weights).
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Total weight.
    #[inline]
    pub fn sum_of_weights(&self) -> Float {
        self.sum_weights
    }

    /// Weighted mean, NaN when empty.
    #[inline]
    pub fn mean(&self) -> Float {
        if self.count == 0 {
            Float::NAN
        } else {
            self.mean
        }
    }

    /// Weighted population variance, NaN when empty.
    #[inline]
    pub fn variance(&self) -> Float {
        if self.count == 0 {
            Float::NAN
        } else {
            self.m2 / self.sum_weights
        }
    }

    /// Weighted RSS (`sum_of_weights * variance`), zero when empty.
    ///
    /// This is the loss contribution of one side of a split.
    #[inline]
    pub fn sum_squared_deviations(&self) -> Float {
        self.m2
    }
}
