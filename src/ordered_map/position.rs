use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};

use super::OrderedMap;

impl<K, V, S> OrderedMap<K, V, S> {
    /// Returns the entry at position `index` in insertion order.
    ///
    /// The index is zero-based. Returns `None` if `index` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(min(index, len - index)): the chain is walked from the nearer end.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedMap;
    ///
    /// let map = OrderedMap::from([("c", 30), ("a", 10), ("b", 20)]);
    /// assert_eq!(map.get_index(1), Some((&"a", &10)));
    /// assert!(map.get_index(3).is_none());
    /// ```
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.raw.handle_at(index).map(|handle| {
            let node = self.raw.node(handle);
            (&node.key, &node.value)
        })
    }

    /// Returns the key and a mutable reference to the value at position
    /// `index` in insertion order.
    #[must_use]
    pub fn get_index_mut(&mut self, index: usize) -> Option<(&K, &mut V)> {
        let handle = self.raw.handle_at(index)?;
        let node = self.raw.node_mut(handle);
        Some((&node.key, &mut node.value))
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns the zero-based insertion-order position of `key`, or `None` if
    /// the key is not present.
    ///
    /// # Complexity
    ///
    /// O(1) average lookup plus O(position) to count predecessors.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedMap;
    ///
    /// let map = OrderedMap::from([("c", 30), ("a", 10)]);
    /// assert_eq!(map.index_of("a"), Some(1));
    /// assert_eq!(map.index_of("z"), None);
    /// ```
    #[must_use]
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.find(key).map(|handle| self.raw.position(handle))
    }
}
