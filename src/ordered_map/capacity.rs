use std::collections::hash_map::RandomState;

use super::OrderedMap;
use crate::raw::RawOrderedMap;

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries.
    ///
    /// This is an allocation hint only; it never bounds the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedMap;
    ///
    /// let map: OrderedMap<i32, i32> = OrderedMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// Creates an empty map with room for at least `capacity` entries, hashing
    /// keys with `hash_builder`.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        OrderedMap {
            raw: RawOrderedMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Returns how many entries the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

impl<K, V, S: Clone> OrderedMap<K, V, S> {
    /// Returns a new empty map sharing this map's hasher.
    pub(crate) fn empty_like(&self) -> Self {
        OrderedMap::with_capacity_and_hasher(self.len(), self.hasher().clone())
    }
}
