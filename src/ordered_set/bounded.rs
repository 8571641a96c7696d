use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use std::collections::hash_map::RandomState;

use super::OrderedSet;
use crate::error::{Error, Result};
use crate::ordered_map::OrderedMap;

impl<T> OrderedSet<T> {
    /// Makes a new, empty `OrderedSet` that holds at most `max_len` elements.
    ///
    /// Once full, every insertion of a new element evicts the oldest one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `max_len` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::{Error, OrderedSet};
    ///
    /// let mut set = OrderedSet::with_max_len(3)?;
    /// for n in 1..=4 {
    ///     set.insert(n);
    /// }
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
    ///
    /// assert_eq!(OrderedSet::<i32>::with_max_len(0).unwrap_err(), Error::ZeroCapacity);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn with_max_len(max_len: usize) -> Result<Self> {
        Self::with_max_len_and_hasher(max_len, RandomState::new())
    }
}

impl<T, S> OrderedSet<T, S> {
    /// Makes a new, empty bounded `OrderedSet` which hashes elements with
    /// `hash_builder`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `max_len` is zero.
    pub fn with_max_len_and_hasher(max_len: usize, hash_builder: S) -> Result<Self> {
        let max_len = NonZeroUsize::new(max_len).ok_or(Error::ZeroCapacity)?;
        Ok(OrderedSet {
            map: OrderedMap::with_capacity_and_hasher(max_len.get(), hash_builder),
            max_len: Some(max_len),
        })
    }

    /// Returns the capacity bound, or `None` for an unbounded set.
    #[must_use]
    pub fn max_len(&self) -> Option<usize> {
        self.max_len.map(NonZeroUsize::get)
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Builds a set from `iter`, optionally bounded by `max_len`.
    ///
    /// Elements are added in order, so a bounded set keeps the last
    /// `max_len` distinct elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `max_len` is `Some(0)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let set: OrderedSet<char> = OrderedSet::bounded_from_iter("abcde".chars(), Some(3)).unwrap();
    /// assert_eq!(set.iter().collect::<String>(), "cde");
    /// ```
    pub fn bounded_from_iter<I>(iter: I, max_len: Option<usize>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = match max_len {
            Some(max_len) => OrderedSet::with_max_len_and_hasher(max_len, S::default())?,
            None => OrderedSet::with_hasher(S::default()),
        };
        set.union_update(iter);
        Ok(set)
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Evicts the oldest element if the set is at its bound.
    pub(super) fn make_room(&mut self) {
        let Some(max_len) = self.max_len else {
            return;
        };
        if self.map.len() >= max_len.get() && self.map.pop_first().is_some() {
            #[cfg(feature = "tracing")]
            tracing::trace!(max_len = max_len.get(), "evicted oldest element");
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn re_adding_at_capacity_does_not_evict() {
        let mut set = OrderedSet::with_max_len(2).unwrap();
        set.insert('a');
        set.insert('b');
        assert!(!set.insert('a'));
        assert_eq!(set.iter().collect::<String>(), "ab");
    }

    #[test]
    fn unbounded_by_default() {
        let set: OrderedSet<u8> = OrderedSet::bounded_from_iter(0..=255, None).unwrap();
        assert_eq!(set.len(), 256);
        assert_eq!(set.max_len(), None);
    }

    #[test]
    fn zero_bound_is_rejected() {
        let result: Result<OrderedSet<u8>> = OrderedSet::bounded_from_iter([1], Some(0));
        assert_eq!(result.unwrap_err(), Error::ZeroCapacity);
    }
}
