//! Sample partitioning for tree growth.
//!
//! One contiguous buffer of sample indices is owned by the grower. Every
//! pending node owns a range within it, and splitting a node rearranges its
//! range in place into one contiguous sub-range per child.
//!
//! ```text
//! Initial (all samples owned by the root):
//!   indices: [0, 1, 2, 3, 4, 5, 6, 7]     root: 0..8
//!
//! After splitting the root (0, 2, 4, 6 go to child 0):
//!   indices: [0, 2, 4, 6, 1, 3, 5, 7]     child 0: 0..4, child 1: 4..8
//! ```

use std::ops::Range;

use crate::data::FeatureSource;
use crate::repr::SplitCriterion;
use crate::BRANCHING;

/// Buffer of sample indices partitioned in place during growth.
#[derive(Debug, Clone, Default)]
pub struct SamplePartition {
    indices: Vec<u32>,
}

impl SamplePartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new tree.
    ///
    /// `sampled` selects (possibly repeated) sample indices; `None` uses every
    /// sample once. Returns the root range.
    pub fn reset(&mut self, n_samples: usize, sampled: Option<&[u32]>) -> Range<usize> {
        self.indices.clear();
        match sampled {
            None => self.indices.extend(0..n_samples as u32),
            Some(sampled) => self.indices.extend_from_slice(sampled),
        }
        0..self.indices.len()
    }

    /// Sample indices in a range.
    #[inline]
    pub fn indices(&self, range: Range<usize>) -> &[u32] {
        &self.indices[range]
    }

    /// Whole buffer.
    #[inline]
    pub fn all(&self) -> &[u32] {
        &self.indices
    }

    /// Split a range by a criterion.
    ///
    /// Samples routed to child 0 are swapped to the front; relative order is
    /// not preserved. Returns one contiguous sub-range per child, together
    /// covering `range`.
    pub fn split<D: FeatureSource + ?Sized>(
        &mut self,
        range: Range<usize>,
        criterion: &SplitCriterion,
        source: &D,
    ) -> [Range<usize>; BRANCHING] {
        let feature = criterion.feature();
        let Range { start, end } = range;

        let mut left_end = start;
        for i in start..end {
            let sample = self.indices[i] as usize;
            if criterion.child_index(source.feature(feature, sample)) == 0 {
                self.indices.swap(i, left_end);
                left_end += 1;
            }
        }

        [start..left_end, left_end..end]
    }
}
