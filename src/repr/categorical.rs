//! Category sets for categorical splits.

/// Upper bound on the category count of any categorical feature.
///
/// Category indices are always below this, so a bitset never exceeds 2 MiB.
pub const MAX_CATEGORIES: u32 = 1 << 24;

/// Compact bitset of category indices (up to 64 categories inline).
///
/// Stores the admitted set of a categorical split and the admissible
/// categories of a subspace. Categories beyond 64 use heap-allocated overflow
/// storage.
#[derive(Clone, Debug, Default)]
pub struct CatBitset {
    /// Inline bits for categories 0..63.
    bits: u64,
    /// Heap storage for categories 64+.
    overflow: Option<Box<[u64]>>,
}

impl CatBitset {
    /// Create an empty bitset.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a bitset with a single category.
    #[inline]
    pub fn singleton(cat: u32) -> Self {
        let mut s = Self::empty();
        s.insert(cat);
        s
    }

    /// Set holding every category in `0..n_categories`.
    pub fn full(n_categories: u32) -> Self {
        (0..n_categories).collect()
    }

    /// Check if a category is in the set.
    #[inline]
    pub fn contains(&self, cat: u32) -> bool {
        if cat < 64 {
            (self.bits >> cat) & 1 != 0
        } else {
            let (idx, bit) = Self::overflow_pos(cat);
            self.overflow
                .as_ref()
                .and_then(|o| o.get(idx))
                .is_some_and(|&w| (w >> bit) & 1 != 0)
        }
    }

    /// Insert a category into the set.
    pub fn insert(&mut self, cat: u32) {
        if cat < 64 {
            self.bits |= 1u64 << cat;
        } else {
            let (idx, bit) = Self::overflow_pos(cat);
            let overflow = self
                .overflow
                .get_or_insert_with(|| vec![0u64; idx + 1].into_boxed_slice());

            if idx >= overflow.len() {
                let mut grown = vec![0u64; idx + 1];
                grown[..overflow.len()].copy_from_slice(overflow);
                *overflow = grown.into_boxed_slice();
            }

            overflow[idx] |= 1u64 << bit;
        }
    }

    /// Remove a category from the set.
    pub fn remove(&mut self, cat: u32) {
        if cat < 64 {
            self.bits &= !(1u64 << cat);
        } else {
            let (idx, bit) = Self::overflow_pos(cat);
            if let Some(word) = self.overflow.as_mut().and_then(|o| o.get_mut(idx)) {
                *word &= !(1u64 << bit);
            }
        }
    }

    /// Number of categories in the set.
    pub fn count(&self) -> u32 {
        let mut count = self.bits.count_ones();
        if let Some(ref overflow) = self.overflow {
            for word in overflow.iter() {
                count += word.count_ones();
            }
        }
        count
    }

    /// Check if the bitset is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0 && self.overflow.as_ref().map_or(true, |o| o.iter().all(|&w| w == 0))
    }

    /// Categories in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        let overflow = self.overflow.as_deref().unwrap_or(&[]);
        std::iter::once(self.bits)
            .chain(overflow.iter().copied())
            .enumerate()
            .flat_map(|(word_idx, word)| {
                (0..64u32)
                    .filter(move |bit| (word >> bit) & 1 != 0)
                    .map(move |bit| word_idx as u32 * 64 + bit)
            })
    }

    /// Categories present in both sets.
    pub fn intersection(&self, other: &CatBitset) -> CatBitset {
        self.iter().filter(|&c| other.contains(c)).collect()
    }

    /// Categories of `self` absent from `other`.
    pub fn difference(&self, other: &CatBitset) -> CatBitset {
        self.iter().filter(|&c| !other.contains(c)).collect()
    }

    #[inline]
    fn overflow_pos(cat: u32) -> (usize, u32) {
        (((cat - 64) / 64) as usize, (cat - 64) % 64)
    }
}

impl PartialEq for CatBitset {
    fn eq(&self, other: &Self) -> bool {
        // Trailing zero overflow words do not change membership.
        self.iter().eq(other.iter())
    }
}

impl Eq for CatBitset {}

impl FromIterator<u32> for CatBitset {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut s = Self::empty();
        for cat in iter {
            s.insert(cat);
        }
        s
    }
}
