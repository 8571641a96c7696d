//! A hash map that iterates in insertion order.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::ops::Index;
use std::collections::hash_map::RandomState;

use crate::deep_copy::{DeepCopy, Memo};
use crate::raw::{self, RawOrderedMap};

mod capacity;
mod position;

/// A hash map that remembers the order in which keys were first inserted.
///
/// Lookups, insertions and removals (including removal of the oldest or the
/// newest entry) take O(1) average time. Removing an entry leaves the order
/// of the remaining entries untouched; re-inserting a removed key puts it at
/// the end. Overwriting the value of a present key does not move it.
///
/// Iterators yield entries oldest first and are double-ended.
///
/// It is a logic error for a key to be modified in such a way that its hash
/// or equality changes while it is in the map. The resulting behavior is
/// unspecified but confined to the map.
///
/// # Examples
///
/// ```
/// use ordered_collections::OrderedMap;
///
/// let mut stock = OrderedMap::new();
/// stock.insert("pears", 3);
/// stock.insert("apples", 7);
/// stock.insert("figs", 1);
///
/// // Overwriting keeps the original position.
/// stock.insert("pears", 4);
///
/// let keys: Vec<_> = stock.keys().copied().collect();
/// assert_eq!(keys, ["pears", "apples", "figs"]);
/// assert_eq!(stock["pears"], 4);
///
/// // The oldest entry goes first.
/// assert_eq!(stock.pop_first(), Some(("pears", 4)));
/// ```
pub struct OrderedMap<K, V, S = RandomState> {
    raw: RawOrderedMap<K, V, S>,
}

/// An iterator over the entries of an [`OrderedMap`], in insertion order.
///
/// This `struct` is created by the [`iter`](OrderedMap::iter) method.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: raw::Iter<'a, K, V>,
}

/// A mutable iterator over the entries of an [`OrderedMap`], in insertion order.
///
/// This `struct` is created by the [`iter_mut`](OrderedMap::iter_mut) method.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    inner: raw::IterMut<'a, K, V>,
}

/// An iterator over the keys of an [`OrderedMap`], in insertion order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: raw::Iter<'a, K, V>,
}

/// An iterator over the values of an [`OrderedMap`], in insertion order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: raw::Iter<'a, K, V>,
}

/// A mutable iterator over the values of an [`OrderedMap`], in insertion order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: raw::IterMut<'a, K, V>,
}

/// An owning iterator over the entries of an [`OrderedMap`], in insertion order.
pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<(K, V)>,
}

/// An owning iterator over the keys of an [`OrderedMap`], in insertion order.
pub struct IntoKeys<K, V> {
    inner: std::vec::IntoIter<(K, V)>,
}

impl<K, V> OrderedMap<K, V> {
    /// Makes a new, empty `OrderedMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> OrderedMap<K, V, S> {
    /// Makes a new, empty `OrderedMap` which hashes keys with `hash_builder`.
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        OrderedMap {
            raw: RawOrderedMap::with_hasher(hash_builder),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns a reference to the map's hasher.
    #[must_use]
    pub const fn hasher(&self) -> &S {
        self.raw.hasher()
    }

    /// Removes every entry, keeping the allocated storage.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the oldest entry, if any.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.raw.head().map(|handle| {
            let node = self.raw.node(handle);
            (&node.key, &node.value)
        })
    }

    /// Returns the newest entry, if any.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.raw.tail().map(|handle| {
            let node = self.raw.node(handle);
            (&node.key, &node.value)
        })
    }

    /// Gets an iterator over the entries of the map, oldest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedMap;
    ///
    /// let map = OrderedMap::from([("b", 2), ("a", 1)]);
    /// let entries: Vec<_> = map.iter().collect();
    /// assert_eq!(entries, [(&"b", &2), (&"a", &1)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.raw.iter() }
    }

    /// Gets a mutable iterator over the entries of the map, oldest first.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.raw.iter_mut(),
        }
    }

    /// Gets an iterator over the keys of the map, oldest first.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.raw.iter() }
    }

    /// Gets an iterator over the values of the map, in key insertion order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.raw.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in key insertion order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.raw.iter_mut(),
        }
    }

    /// Creates a consuming iterator over the keys, oldest first.
    pub fn into_keys(mut self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, V, S> OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(1) average
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get_mut(key)
    }

    /// Returns the stored key and its value.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get_key_value(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was absent it is appended after the newest entry and `None`
    /// is returned. If it was present, the value is replaced in place (the key
    /// keeps its position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.insert("x", 1), None);
    /// map.insert("y", 2);
    /// assert_eq!(map.insert("x", 10), Some(1));
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["x", "y"]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value)
    }

    /// Returns a mutable reference to the value for `key`, appending the
    /// result of `make` first if the key is absent. `make` is called at most
    /// once.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedMap;
    ///
    /// let mut words: OrderedMap<&str, Vec<usize>> = OrderedMap::new();
    /// words.get_or_insert_with("to", Vec::new).push(0);
    /// words.get_or_insert_with("be", Vec::new).push(1);
    /// words.get_or_insert_with("to", Vec::new).push(4);
    /// assert_eq!(words["to"], [0, 4]);
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        self.raw.get_or_insert_with(key, make)
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.remove_entry(key)
    }

    /// Removes and returns the oldest entry.
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_front()
    }

    /// Removes and returns the newest entry.
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_back()
    }

    /// Retains only the entries for which `keep` returns `true`. The order of
    /// the retained entries is unchanged.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.raw.retain(keep);
    }
}

impl<K, V, S> Clone for OrderedMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        OrderedMap { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for OrderedMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S: Default> Default for OrderedMap<K, V, S> {
    fn default() -> Self {
        OrderedMap::with_hasher(S::default())
    }
}

/// Two maps are equal when they hold equal entries in the same order.
impl<K, V, S1, S2> PartialEq<OrderedMap<K, V, S2>> for OrderedMap<K, V, S1>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &OrderedMap<K, V, S2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for OrderedMap<K, V, S> {}

impl<K, V, S> FromIterator<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for OrderedMap<K, V, S>
where
    K: Hash + Eq + Copy,
    V: Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        for (&key, &value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Hash + Eq, V, const N: usize> From<[(K, V); N]> for OrderedMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Looks up a value by key.
///
/// # Panics
///
/// Panics if the key is not present in the map.
impl<K, Q, V, S> Index<&Q> for OrderedMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut OrderedMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for OrderedMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, oldest first.
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, S> serde::Serialize for OrderedMap<K, V, S>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedMapVisitor<K, V, S> {
    marker: core::marker::PhantomData<fn() -> OrderedMap<K, V, S>>,
}

#[cfg(feature = "serde")]
impl<K, V, S> OrderedMapVisitor<K, V, S> {
    const fn new() -> Self {
        Self {
            marker: core::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::de::Visitor<'de> for OrderedMapVisitor<K, V, S>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    V: serde::Deserialize<'de>,
    S: BuildHasher + Default,
{
    type Value = OrderedMap<K, V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = OrderedMap::with_capacity_and_hasher(access.size_hint().unwrap_or(0), S::default());
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::Deserialize<'de> for OrderedMap<K, V, S>
where
    K: serde::Deserialize<'de> + Hash + Eq,
    V: serde::Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor::new())
    }
}

/// Duplicates keys and values recursively; the copy shares this map's hasher.
impl<K, V, S> DeepCopy for OrderedMap<K, V, S>
where
    K: DeepCopy + Hash + Eq,
    V: DeepCopy,
    S: BuildHasher + Clone,
{
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        let mut copy = self.empty_like();
        for (key, value) in self {
            copy.insert(key.deep_copy_with(memo), value.deep_copy_with(memo));
        }
        copy
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn debug_lists_entries_in_order() {
        let map = OrderedMap::from([(2, 'b'), (1, 'a')]);
        assert_eq!(format!("{map:?}"), "{2: 'b', 1: 'a'}");
        assert_eq!(format!("{:?}", map.iter()), "[(2, 'b'), (1, 'a')]");
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = OrderedMap::from([(1, 'a'), (2, 'b')]);
        let b = OrderedMap::from([(2, 'b'), (1, 'a')]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
