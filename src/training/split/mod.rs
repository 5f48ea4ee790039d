//! Split finding.
//!
//! For each tree node, the best split is found by:
//! 1. Searching every candidate feature for its loss-optimal cut
//!    ([`continuous`] sweep or [`categorical`] mean-ordered sweep)
//! 2. Keeping the cut with the smallest weighted RSS loss, strictly, so the
//!    first candidate in iteration order wins ties
//! 3. Drawing the winner's random parts: a threshold inside the gap of a
//!    numeric cut, or one fair coin flip per unseen category (ascending
//!    category index) of a categorical cut
//!
//! Randomness is consumed only in step 3, so a node that becomes a leaf
//! consumes none.
//!
//! # Loss
//!
//! ```text
//! loss = W_left * Var_left + W_right * Var_right
//! ```
//!
//! with `W` the sum of weights and `Var` the weighted population variance.
//! A feature without a usable cut has loss `+∞`.

pub mod categorical;
pub mod continuous;

use rand::Rng;

use crate::data::{FeatureKind, FeatureSource};
use crate::repr::SplitCriterion;
use crate::Float;

use self::categorical::{CategoricalCut, CategoricalScratch};
use self::continuous::{ContinuousCut, Observation};
use super::params::TreeParams;

/// Chosen split of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    /// Weighted RSS of the children. Always finite.
    pub loss: Float,
    pub criterion: SplitCriterion,
}

/// Best cut of one feature, before randomization.
#[derive(Debug, Clone, PartialEq)]
enum Candidate {
    Continuous { feature: usize, cut: ContinuousCut },
    Categorical { feature: usize, cut: CategoricalCut },
}

impl Candidate {
    #[inline]
    fn loss(&self) -> Float {
        match self {
            Candidate::Continuous { cut, .. } => cut.loss,
            Candidate::Categorical { cut, .. } => cut.loss,
        }
    }

    fn into_criterion<R: Rng + ?Sized>(self, rng: &mut R) -> SplitCriterion {
        match self {
            Candidate::Continuous { feature, cut } => SplitCriterion::Numeric {
                feature,
                threshold: draw_threshold(cut.lo, cut.hi, rng),
            },
            Candidate::Categorical { feature, cut } => {
                let mut admitted = cut.admitted;
                for &cat in &cut.unseen {
                    if rng.gen_bool(0.5) {
                        admitted.insert(cat);
                    }
                }
                SplitCriterion::Categorical { feature, admitted }
            }
        }
    }
}

/// Uniform draw from the open interval `(lo, hi)`, or `lo` if rounding
/// lands outside it.
fn draw_threshold<R: Rng + ?Sized>(lo: Float, hi: Float, rng: &mut R) -> Float {
    let u: Float = rng.gen();
    let t = lo + u * (hi - lo);
    if t > lo && t < hi {
        t
    } else {
        lo
    }
}

/// Split finder with reusable scratch buffers.
#[derive(Debug, Clone)]
pub struct SplitFinder {
    merge_tolerance: Float,
    min_samples_per_leaf: usize,
    observations: Vec<Observation>,
    categorical: CategoricalScratch,
}

impl SplitFinder {
    pub fn new(merge_tolerance: Float, min_samples_per_leaf: usize) -> Self {
        Self {
            merge_tolerance,
            min_samples_per_leaf: min_samples_per_leaf.max(1),
            observations: Vec::new(),
            categorical: CategoricalScratch::default(),
        }
    }

    pub fn from_params(params: &TreeParams) -> Self {
        Self::new(params.merge_tolerance, params.min_samples_per_leaf)
    }

    fn evaluate<D: FeatureSource + ?Sized>(
        &mut self,
        source: &D,
        feature: usize,
        indices: &[u32],
    ) -> Option<Candidate> {
        match source.feature_kind(feature) {
            FeatureKind::Continuous => continuous::best_cut(
                source,
                feature,
                indices,
                self.merge_tolerance,
                self.min_samples_per_leaf,
                &mut self.observations,
            )
            .map(|cut| Candidate::Continuous { feature, cut }),
            FeatureKind::Categorical { n_categories } => categorical::best_cut(
                source,
                feature,
                n_categories,
                indices,
                self.min_samples_per_leaf,
                &mut self.categorical,
            )
            .map(|cut| Candidate::Categorical { feature, cut }),
        }
    }

    fn best_candidate<D: FeatureSource + ?Sized>(
        &mut self,
        source: &D,
        indices: &[u32],
        candidates: &[usize],
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for &feature in candidates {
            if let Some(candidate) = self.evaluate(source, feature, indices) {
                if best.as_ref().map_or(true, |b| candidate.loss() < b.loss()) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Loss of the best cut of one feature, `+∞` if it has none.
    pub fn feature_loss<D: FeatureSource + ?Sized>(&mut self, source: &D, feature: usize, indices: &[u32]) -> Float {
        self.evaluate(source, feature, indices)
            .map_or(Float::INFINITY, |c| c.loss())
    }

    /// Best loss over `candidates`, `+∞` if no feature has a usable cut.
    ///
    /// Consumes no randomness.
    pub fn best_loss<D: FeatureSource + ?Sized>(&mut self, source: &D, indices: &[u32], candidates: &[usize]) -> Float {
        self.best_candidate(source, indices, candidates)
            .map_or(Float::INFINITY, |c| c.loss())
    }

    /// Find the best split of the samples in `indices` over `candidates`.
    ///
    /// Returns `None` (loss `+∞`) when no candidate feature has a usable cut;
    /// the caller then makes the node a leaf.
    pub fn find_best<D, R>(
        &mut self,
        source: &D,
        indices: &[u32],
        candidates: &[usize],
        rng: &mut R,
    ) -> Option<SplitResult>
    where
        D: FeatureSource + ?Sized,
        R: Rng + ?Sized,
    {
        let best = self.best_candidate(source, indices, candidates)?;
        let loss = best.loss();
        Some(SplitResult {
            loss,
            criterion: best.into_criterion(rng),
        })
    }
}
