#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Truth assignments over a fixed set of boolean variables.
//!
//! An [`Assignment`] is a fixed-length bit vector indexed by `variable - 1`
//! (DIMACS variables are 1-indexed). Assignments are mutated in place by the
//! search drivers and cloned when a neighbor must be materialized, so the
//! backing storage is a compact `BitVec` rather than a `Vec<bool>`.

use bit_vec::BitVec;
use std::ops::Index;

/// A complete truth assignment: position `i` holds the value of variable `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment(BitVec);

impl Assignment {
    /// Creates an all-false assignment over `n` variables.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self(BitVec::from_elem(n, false))
    }

    /// Draws a uniformly random assignment over `n` variables.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng, n: usize) -> Self {
        Self(BitVec::from_fn(n, |_| rng.bool()))
    }

    /// Builds an assignment from explicit per-variable values.
    #[must_use]
    pub fn from_bools(values: &[bool]) -> Self {
        Self(BitVec::from_fn(values.len(), |i| values[i]))
    }

    /// Number of variables covered by this assignment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the assignment covers zero variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of the 0-indexed position `i` (variable `i + 1`).
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn get(&self, i: usize) -> bool {
        self.0[i]
    }

    /// Sets position `i` to `value`.
    pub fn set(&mut self, i: usize, value: bool) {
        self.0.set(i, value);
    }

    /// Flips position `i` in place.
    pub fn flip(&mut self, i: usize) {
        let value = self.0[i];
        self.0.set(i, !value);
    }

    /// Returns a copy with every position in `positions` flipped.
    #[must_use]
    pub fn with_flipped(&self, positions: &[u32]) -> Self {
        let mut neighbor = self.clone();
        for &i in positions {
            neighbor.flip(i as usize);
        }
        neighbor
    }

    /// Truth value of a signed DIMACS literal under this assignment:
    /// a positive literal is true iff its variable is true, a negative
    /// literal is true iff its variable is false.
    ///
    /// # Panics
    ///
    /// Panics if the literal's magnitude exceeds the assignment length.
    #[must_use]
    pub fn literal_value(&self, literal: i32) -> bool {
        let value = self.0[literal.unsigned_abs() as usize - 1];
        if literal > 0 { value } else { !value }
    }

    /// Number of positions at which `self` and `other` differ.
    #[must_use]
    pub fn hamming_distance(&self, other: &Self) -> usize {
        debug_assert_eq!(self.len(), other.len());
        self.iter().zip(other.iter()).filter(|(a, b)| a != b).count()
    }

    /// Iterates over the per-variable values.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter()
    }

    /// Expands the assignment into a plain `Vec<bool>`.
    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        self.0.iter().collect()
    }
}

impl Index<usize> for Assignment {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        self.0.index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_round_trips() {
        let mut a = Assignment::new(4);
        assert!(!a.get(2));
        a.flip(2);
        assert!(a.get(2));
        a.flip(2);
        assert!(!a.get(2));
    }

    #[test]
    fn test_with_flipped_leaves_base_untouched() {
        let base = Assignment::from_bools(&[true, false, true]);
        let neighbor = base.with_flipped(&[0, 2]);
        assert_eq!(base.to_bools(), vec![true, false, true]);
        assert_eq!(neighbor.to_bools(), vec![false, false, false]);
        assert_eq!(base.hamming_distance(&neighbor), 2);
    }

    #[test]
    fn test_literal_value_polarity() {
        let a = Assignment::from_bools(&[true, false]);
        assert!(a.literal_value(1));
        assert!(!a.literal_value(-1));
        assert!(!a.literal_value(2));
        assert!(a.literal_value(-2));
    }

    #[test]
    fn test_random_is_reproducible_per_seed() {
        let mut rng1 = fastrand::Rng::with_seed(99);
        let mut rng2 = fastrand::Rng::with_seed(99);
        assert_eq!(
            Assignment::random(&mut rng1, 64),
            Assignment::random(&mut rng2, 64)
        );
    }

    #[test]
    fn test_hamming_distance_to_self_is_zero() {
        let mut rng = fastrand::Rng::with_seed(3);
        let a = Assignment::random(&mut rng, 20);
        assert_eq!(a.hamming_distance(&a), 0);
    }
}
