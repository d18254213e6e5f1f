//! Packed row-position sets.
//!
//! `IndexSet` is a fixed-capacity bitset over row positions `0..size`. It is
//! what filters produce and what views keep as their derived state. All
//! binary operations are in place and require both operands to share the
//! same capacity; a mismatch is always an error.

use crate::error::{Error, Result};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

const WORD_BITS: usize = 32;

#[inline]
fn word_count(size: usize) -> usize {
    (size + WORD_BITS - 1) / WORD_BITS
}

#[inline]
fn locate(index: usize) -> (usize, u32) {
    (index / WORD_BITS, 1u32 << (index % WORD_BITS))
}

/// A fixed-capacity, mutable set of row positions.
///
/// Bits past `size` in the last word are kept cleared, so equality, hashing
/// and population counts only ever see real positions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IndexSet {
    size: usize,
    words: Vec<u32>,
}

impl IndexSet {
    /// Creates a set of capacity `size` with no position set.
    pub fn all_unset(size: usize) -> Self {
        Self {
            size,
            words: vec![0; word_count(size)],
        }
    }

    /// Creates a set of capacity `size` with every position set.
    pub fn all_set(size: usize) -> Self {
        let mut set = Self {
            size,
            words: vec![!0; word_count(size)],
        };
        set.clear_tail();
        set
    }

    /// Creates a set from a boolean mask.
    ///
    /// A mask shorter than `size` leaves the remaining positions unset; extra
    /// entries past `size` are ignored.
    pub fn from_booleans(size: usize, booleans: &[bool]) -> Self {
        let mut set = Self::all_unset(size);
        for (i, _) in booleans.iter().take(size).enumerate().filter(|(_, b)| **b) {
            let (word, bit) = locate(i);
            set.words[word] |= bit;
        }
        set
    }

    /// Creates a set from explicit positions.
    ///
    /// Fails on the first position outside `0..size`.
    pub fn from_indices(size: usize, indices: &[usize]) -> Result<Self> {
        let mut set = Self::all_unset(size);
        for &i in indices {
            set.set(i)?;
        }
        Ok(set)
    }

    /// Creates a set containing every position for which `predicate` holds.
    pub fn select<F>(size: usize, mut predicate: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let mut set = Self::all_unset(size);
        for i in 0..size {
            if predicate(i) {
                let (word, bit) = locate(i);
                set.words[word] |= bit;
            }
        }
        set
    }

    /// Returns the capacity (not the number of set positions).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of set positions.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no position is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Returns true if every position is set.
    pub fn is_full(&self) -> bool {
        self.count() == self.size
    }

    /// Returns true if `index` is set. Positions past the capacity are never set.
    #[inline]
    pub fn is_set(&self, index: usize) -> bool {
        if index >= self.size {
            return false;
        }
        let (word, bit) = locate(index);
        self.words[word] & bit != 0
    }

    /// Sets a position.
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        let (word, bit) = locate(index);
        self.words[word] |= bit;
        Ok(())
    }

    /// Clears a position.
    pub fn unset(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        let (word, bit) = locate(index);
        self.words[word] &= !bit;
        Ok(())
    }

    /// In-place union (bitwise OR).
    pub fn union(&mut self, other: &IndexSet) -> Result<()> {
        self.combine(other, |a, b| a | b)
    }

    /// In-place intersection (bitwise AND).
    pub fn intersect(&mut self, other: &IndexSet) -> Result<()> {
        self.combine(other, |a, b| a & b)
    }

    /// In-place difference (AND-NOT).
    pub fn subtract(&mut self, other: &IndexSet) -> Result<()> {
        self.combine(other, |a, b| a & !b)
    }

    /// In-place symmetric difference (XOR).
    pub fn symmetric_subtract(&mut self, other: &IndexSet) -> Result<()> {
        self.combine(other, |a, b| a ^ b)
    }

    /// In-place complement within the capacity.
    pub fn invert(&mut self) {
        for w in self.words.iter_mut() {
            *w = !*w;
        }
        self.clear_tail();
    }

    /// Returns an iterator over set positions in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Returns the lowest set position.
    pub fn first(&self) -> Option<usize> {
        self.iter().next()
    }

    /// Returns the highest set position.
    pub fn last(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize))
    }

    /// Collects the set positions into a vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index >= self.size {
            Err(Error::index_out_of_range(index, self.size))
        } else {
            Ok(())
        }
    }

    fn combine<F>(&mut self, other: &IndexSet, op: F) -> Result<()>
    where
        F: Fn(u32, u32) -> u32,
    {
        if self.size != other.size {
            return Err(Error::size_mismatch(self.size, other.size));
        }
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a = op(*a, *b);
        }
        Ok(())
    }

    fn clear_tail(&mut self) {
        let rem = self.size % WORD_BITS;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u32 << rem) - 1;
            }
        }
    }
}

impl fmt::Debug for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexSet")
            .field("size", &self.size)
            .field("indices", &self.to_vec())
            .finish()
    }
}

/// Ascending iterator over the set positions of an `IndexSet`.
pub struct Iter<'a> {
    words: &'a [u32],
    word_index: usize,
    current: u32,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_index * WORD_BITS + bit);
            }
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
    }
}

impl<'a> IntoIterator for &'a IndexSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_set_and_unset() {
        let set = IndexSet::all_set(37);
        assert_eq!(set.size(), 37);
        assert_eq!(set.count(), 37);
        assert!(set.is_full());

        let empty = IndexSet::all_unset(37);
        assert_eq!(empty.count(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_zero_capacity() {
        let set = IndexSet::all_set(0);
        assert_eq!(set.count(), 0);
        assert_eq!(set.iter().count(), 0);
        assert_eq!(set.first(), None);
        assert_eq!(set.last(), None);
    }

    #[test]
    fn test_from_booleans_short_mask() {
        let set = IndexSet::from_booleans(5, &[true, false, true]);
        assert_eq!(set.to_vec(), vec![0, 2]);
        assert_eq!(set.size(), 5);
    }

    #[test]
    fn test_from_booleans_long_mask() {
        let set = IndexSet::from_booleans(2, &[true, true, true, true]);
        assert_eq!(set.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_from_indices() {
        let set = IndexSet::from_indices(10, &[7, 2, 2, 4]).unwrap();
        assert_eq!(set.to_vec(), vec![2, 4, 7]);
    }

    #[test]
    fn test_from_indices_out_of_range() {
        let err = IndexSet::from_indices(3, &[0, 3]).unwrap_err();
        assert_eq!(err, Error::index_out_of_range(3, 3));
    }

    #[test]
    fn test_set_unset() {
        let mut set = IndexSet::all_unset(40);
        set.set(33).unwrap();
        set.set(0).unwrap();
        assert!(set.is_set(33));
        assert!(!set.is_set(32));
        set.unset(33).unwrap();
        assert!(!set.is_set(33));
        assert!(set.set(40).is_err());
        assert!(!set.is_set(1000));
    }

    #[test]
    fn test_binary_ops() {
        let a = IndexSet::from_indices(8, &[0, 1, 2, 3]).unwrap();
        let b = IndexSet::from_indices(8, &[2, 3, 4, 5]).unwrap();

        let mut u = a.clone();
        u.union(&b).unwrap();
        assert_eq!(u.to_vec(), vec![0, 1, 2, 3, 4, 5]);

        let mut i = a.clone();
        i.intersect(&b).unwrap();
        assert_eq!(i.to_vec(), vec![2, 3]);

        let mut d = a.clone();
        d.subtract(&b).unwrap();
        assert_eq!(d.to_vec(), vec![0, 1]);

        let mut x = a.clone();
        x.symmetric_subtract(&b).unwrap();
        assert_eq!(x.to_vec(), vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_size_mismatch() {
        let mut a = IndexSet::all_set(4);
        let b = IndexSet::all_set(5);
        assert_eq!(a.union(&b).unwrap_err(), Error::size_mismatch(4, 5));
        assert_eq!(a.intersect(&b).unwrap_err(), Error::size_mismatch(4, 5));
        assert_eq!(a.subtract(&b).unwrap_err(), Error::size_mismatch(4, 5));
        assert_eq!(a.symmetric_subtract(&b).unwrap_err(), Error::size_mismatch(4, 5));
        // Failed ops leave the receiver untouched
        assert!(a.is_full());
    }

    #[test]
    fn test_invert_keeps_tail_clear() {
        let mut set = IndexSet::from_indices(33, &[0, 32]).unwrap();
        set.invert();
        assert_eq!(set.count(), 31);
        assert!(!set.is_set(0));
        assert!(!set.is_set(32));
        set.invert();
        assert_eq!(set.to_vec(), vec![0, 32]);
    }

    #[test]
    fn test_first_last() {
        let set = IndexSet::from_indices(100, &[5, 64, 99]).unwrap();
        assert_eq!(set.first(), Some(5));
        assert_eq!(set.last(), Some(99));
    }

    #[test]
    fn test_select() {
        let set = IndexSet::select(10, |i| i % 3 == 0);
        assert_eq!(set.to_vec(), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_iteration_crosses_words() {
        let positions = vec![0, 31, 32, 63, 64, 95];
        let set = IndexSet::from_indices(96, &positions).unwrap();
        let collected: Vec<_> = (&set).into_iter().collect();
        assert_eq!(collected, positions);
    }
}
