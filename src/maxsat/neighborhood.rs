#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Hamming-distance-k neighborhood generation.
//!
//! A [`Neighborhood`] enumerates every set of `k` distinct flip positions out
//! of `num_vars`, i.e. all assignments at Hamming distance exactly `k` from a
//! base assignment. For `k = 1` that is one flip set per variable; for larger
//! `k` it is `C(n, k)` sets, which is why the variable-depth search caps `k`
//! at [`MAX_NEIGHBORHOOD`].
//!
//! Flip sets are stored once per depth and shuffled per scan; candidates are
//! materialized copy-on-write from the base assignment, which is never
//! mutated during a scan.

use crate::maxsat::assignment::Assignment;
use itertools::Itertools;
use smallvec::SmallVec;

/// Largest supported neighborhood depth. `C(n, k)` grows too fast past this.
pub const MAX_NEIGHBORHOOD: usize = 3;

/// A set of positions to flip, inline since `k <= MAX_NEIGHBORHOOD`.
pub type FlipSet = SmallVec<[u32; 4]>;

/// All flip sets of size `k` over `num_vars` positions.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    flip_sets: Vec<FlipSet>,
    k: usize,
}

impl Neighborhood {
    /// Enumerates every choice of `k` flip positions out of `num_vars`.
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0 or exceeds [`MAX_NEIGHBORHOOD`].
    #[must_use]
    pub fn new(num_vars: usize, k: usize) -> Self {
        assert!(
            (1..=MAX_NEIGHBORHOOD).contains(&k),
            "neighborhood depth {k} not in 1..={MAX_NEIGHBORHOOD}"
        );
        #[allow(clippy::cast_possible_truncation)]
        let flip_sets = (0..num_vars as u32)
            .combinations(k)
            .map(SmallVec::from_vec)
            .collect();
        Self { flip_sets, k }
    }

    /// The neighborhood depth `k`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.k
    }

    /// Number of flip sets, i.e. neighbors per scan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flip_sets.len()
    }

    /// Whether the neighborhood is empty (only for `num_vars < k`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flip_sets.is_empty()
    }

    /// Randomizes the scan order in place.
    pub fn shuffle(&mut self, rng: &mut fastrand::Rng) {
        rng.shuffle(&mut self.flip_sets);
    }

    /// Iterates over the flip sets in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &FlipSet> + '_ {
        self.flip_sets.iter()
    }

    /// Materializes every neighbor of `base` in the current scan order.
    #[must_use]
    pub fn neighbors_of(&self, base: &Assignment) -> Vec<Assignment> {
        self.flip_sets
            .iter()
            .map(|flips| base.with_flipped(flips))
            .collect()
    }
}
