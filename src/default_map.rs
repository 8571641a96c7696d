//! An ordered map that fills missing keys from a default factory.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;

use crate::deep_copy::{DeepCopy, Memo};
use crate::error::{Error, Result};
use crate::ordered_map::{self, OrderedMap};

/// An insertion-ordered map that can fill in missing keys from a factory.
///
/// [`get_or_default`](DefaultOrderedMap::get_or_default) is the creating
/// access: a missing key is stored at the end with a value made by the
/// default factory. Every other lookup, including [`Index`], leaves the map
/// unchanged.
///
/// The factory is any `Fn() -> V`. Without one, the map behaves like a plain
/// [`OrderedMap`] and creating access reports [`Error::KeyNotFound`].
///
/// # Examples
///
/// ```
/// use ordered_collections::DefaultOrderedMap;
///
/// let mut groups = DefaultOrderedMap::with_factory(Vec::new);
/// groups.get_or_default("odd")?.push(1);
/// groups.get_or_default("even")?.push(2);
/// groups.get_or_default("odd")?.push(3);
///
/// assert_eq!(groups["odd"], [1, 3]);
/// assert_eq!(groups.keys().copied().collect::<Vec<_>>(), ["odd", "even"]);
/// # Ok::<(), ordered_collections::Error>(())
/// ```
pub struct DefaultOrderedMap<K, V, F = fn() -> V, S = RandomState> {
    map: OrderedMap<K, V, S>,
    default_factory: Option<F>,
}

/// A [`DefaultOrderedMap`] counting occurrences, missing keys starting at zero.
///
/// # Examples
///
/// ```
/// use ordered_collections::OrderedCounter;
///
/// let mut counts = OrderedCounter::counter();
/// for word in "the cat saw the dog".split(' ') {
///     *counts.get_or_default(word)? += 1;
/// }
/// assert_eq!(counts["the"], 2);
/// assert_eq!(counts.keys().copied().collect::<Vec<_>>(), ["the", "cat", "saw", "dog"]);
/// # Ok::<(), ordered_collections::Error>(())
/// ```
pub type OrderedCounter<K> = DefaultOrderedMap<K, i64>;

impl<K, V> DefaultOrderedMap<K, V> {
    /// Makes a new, empty map without a default factory.
    #[must_use]
    pub fn new() -> Self {
        DefaultOrderedMap {
            map: OrderedMap::new(),
            default_factory: None,
        }
    }
}

impl<K> OrderedCounter<K> {
    /// Makes a new, empty counter.
    #[must_use]
    pub fn counter() -> Self {
        Self::with_factory(|| 0)
    }
}

impl<K, V, F> DefaultOrderedMap<K, V, F> {
    /// Makes a new, empty map which fills missing keys with `factory()`.
    #[must_use]
    pub fn with_factory(factory: F) -> Self {
        DefaultOrderedMap {
            map: OrderedMap::new(),
            default_factory: Some(factory),
        }
    }
}

impl<K: Hash + Eq, V, F> DefaultOrderedMap<K, V, F> {
    /// Rebuilds a map from the parts returned by
    /// [`into_parts`](DefaultOrderedMap::into_parts).
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::DefaultOrderedMap;
    ///
    /// let mut map = DefaultOrderedMap::with_factory(String::new);
    /// map.insert(1, "one".to_owned());
    /// let (factory, entries) = map.into_parts();
    ///
    /// let mut rebuilt = DefaultOrderedMap::from_parts(factory, entries);
    /// rebuilt.get_or_default(2)?.push_str("two");
    /// assert_eq!(rebuilt.values().collect::<Vec<_>>(), ["one", "two"]);
    /// # Ok::<(), ordered_collections::Error>(())
    /// ```
    pub fn from_parts<I>(default_factory: Option<F>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        DefaultOrderedMap {
            map: entries.into_iter().collect(),
            default_factory,
        }
    }
}

impl<K, V, F, S> DefaultOrderedMap<K, V, F, S> {
    /// Makes a new, empty map with an optional factory, hashing keys with
    /// `hash_builder`.
    #[must_use]
    pub fn with_factory_and_hasher(default_factory: Option<F>, hash_builder: S) -> Self {
        DefaultOrderedMap {
            map: OrderedMap::with_hasher(hash_builder),
            default_factory,
        }
    }

    /// Returns the default factory, if any.
    #[must_use]
    pub const fn default_factory(&self) -> Option<&F> {
        self.default_factory.as_ref()
    }

    /// Replaces the default factory, returning the previous one.
    pub fn set_default_factory(&mut self, default_factory: Option<F>) -> Option<F> {
        core::mem::replace(&mut self.default_factory, default_factory)
    }

    /// Returns the entries as a plain ordered map.
    #[must_use]
    pub const fn as_map(&self) -> &OrderedMap<K, V, S> {
        &self.map
    }

    /// Drops the factory and returns the entries.
    #[must_use]
    pub fn into_map(self) -> OrderedMap<K, V, S> {
        self.map
    }

    /// Splits the map into its factory and its entries, oldest first.
    #[must_use]
    pub fn into_parts(self) -> (Option<F>, Vec<(K, V)>) {
        (self.default_factory, self.map.into_iter().collect())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every entry. The factory is kept.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates over entries, oldest first.
    pub fn iter(&self) -> ordered_map::Iter<'_, K, V> {
        self.map.iter()
    }

    /// Iterates over entries with mutable values, oldest first.
    pub fn iter_mut(&mut self) -> ordered_map::IterMut<'_, K, V> {
        self.map.iter_mut()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> ordered_map::Keys<'_, K, V> {
        self.map.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> ordered_map::Values<'_, K, V> {
        self.map.values()
    }

    /// Iterates mutably over values in insertion order.
    pub fn values_mut(&mut self) -> ordered_map::ValuesMut<'_, K, V> {
        self.map.values_mut()
    }
}

impl<K, V, F, S> DefaultOrderedMap<K, V, F, S>
where
    K: Hash + Eq,
    F: Fn() -> V,
    S: BuildHasher,
{
    /// Returns the value for `key`, first storing `factory()` at the end if
    /// the key is missing.
    ///
    /// The factory runs exactly once per missing key and never for a
    /// present one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is missing and there is no
    /// default factory. The map is left unchanged.
    ///
    /// # Complexity
    ///
    /// O(1) average plus the cost of the factory.
    pub fn get_or_default(&mut self, key: K) -> Result<&mut V> {
        let Some(factory) = self.default_factory.as_ref() else {
            return self.map.get_mut(&key).ok_or(Error::KeyNotFound);
        };
        Ok(self.map.get_or_insert_with(key, || {
            #[cfg(feature = "tracing")]
            tracing::trace!("materialized default value for missing key");
            factory()
        }))
    }
}

impl<K, V, F, S> DefaultOrderedMap<K, V, F, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns the value for `key` without consulting the factory.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key)
    }

    /// Returns a mutable reference to the value for `key` without consulting
    /// the factory.
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_mut(key)
    }

    /// Returns `true` if `key` is present. Never creates an entry.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Inserts a key-value pair, returning the previous value. A present key
    /// keeps its position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Removes `key`, returning its value. Later entries keep their order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(key)
    }
}

/// The shallow copy: the same factory and clones of every entry.
impl<K, V, F, S> Clone for DefaultOrderedMap<K, V, F, S>
where
    K: Clone,
    V: Clone,
    F: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        DefaultOrderedMap {
            map: self.map.clone(),
            default_factory: self.default_factory.clone(),
        }
    }
}

/// The deep copy: the same factory and recursive copies of every entry.
impl<K, V, F, S> DeepCopy for DefaultOrderedMap<K, V, F, S>
where
    K: DeepCopy + Hash + Eq,
    V: DeepCopy,
    F: Clone,
    S: BuildHasher + Clone,
{
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        DefaultOrderedMap {
            map: self.map.deep_copy_with(memo),
            default_factory: self.default_factory.clone(),
        }
    }
}

/// Formats as `DefaultOrderedMap(<factory>, {k: v})`, or with `None` in place
/// of the factory when there is none.
impl<K: fmt::Debug, V: fmt::Debug, F, S> fmt::Debug for DefaultOrderedMap<K, V, F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factory = if self.default_factory.is_some() { "<factory>" } else { "None" };
        write!(f, "DefaultOrderedMap({factory}, {:?})", self.map)
    }
}

impl<K, V, F, S: Default> Default for DefaultOrderedMap<K, V, F, S> {
    fn default() -> Self {
        DefaultOrderedMap::with_factory_and_hasher(None, S::default())
    }
}

/// Compares entries in order; factories are not compared.
impl<K, V, F1, F2, S1, S2> PartialEq<DefaultOrderedMap<K, V, F2, S2>> for DefaultOrderedMap<K, V, F1, S1>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &DefaultOrderedMap<K, V, F2, S2>) -> bool {
        self.map == other.map
    }
}

impl<K: Eq, V: Eq, F, S> Eq for DefaultOrderedMap<K, V, F, S> {}

impl<K, V, F, S> FromIterator<(K, V)> for DefaultOrderedMap<K, V, F, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Collects entries into a map without a default factory.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DefaultOrderedMap {
            map: iter.into_iter().collect(),
            default_factory: None,
        }
    }
}

impl<K, V, F, S> Extend<(K, V)> for DefaultOrderedMap<K, V, F, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.map.extend(iter);
    }
}

/// Looks up a value without creating it.
///
/// # Panics
///
/// Panics if the key is not present in the map.
impl<K, Q, V, F, S> Index<&Q> for DefaultOrderedMap<K, V, F, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        &self.map[key]
    }
}

impl<'a, K, V, F, S> IntoIterator for &'a DefaultOrderedMap<K, V, F, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = ordered_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl<K, V, F, S> IntoIterator for DefaultOrderedMap<K, V, F, S> {
    type Item = (K, V);
    type IntoIter = ordered_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
pub use serde_impls::WithFactory;

#[cfg(feature = "serde")]
mod serde_impls {
    use core::hash::{BuildHasher, Hash};
    use core::marker::PhantomData;
    use std::collections::hash_map::RandomState;

    use serde::de::DeserializeSeed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::DefaultOrderedMap;
    use crate::ordered_map::OrderedMap;

    /// Serializes the entries as a map. The factory is not serialized.
    impl<K: Serialize, V: Serialize, F, S> Serialize for DefaultOrderedMap<K, V, F, S> {
        fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
            self.map.serialize(serializer)
        }
    }

    /// Deserializes a map without a default factory.
    impl<'de, K, V, F, S> Deserialize<'de> for DefaultOrderedMap<K, V, F, S>
    where
        K: Deserialize<'de> + Hash + Eq,
        V: Deserialize<'de>,
        S: BuildHasher + Default,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(DefaultOrderedMap {
                map: OrderedMap::deserialize(deserializer)?,
                default_factory: None,
            })
        }
    }

    /// Deserializes a [`DefaultOrderedMap`] and reattaches a factory to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::de::DeserializeSeed;
    /// use ordered_collections::{DefaultOrderedMap, WithFactory};
    ///
    /// let mut json = serde_json::Deserializer::from_str(r#"{"b": 2, "a": 1}"#);
    /// let seed: WithFactory<&str, i32, _> = WithFactory::new(|| 0);
    /// let mut map = seed.deserialize(&mut json).unwrap();
    /// *map.get_or_default("c").unwrap() += 3;
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [2, 1, 3]);
    /// ```
    pub struct WithFactory<K, V, F, S = RandomState> {
        factory: F,
        marker: PhantomData<fn() -> DefaultOrderedMap<K, V, F, S>>,
    }

    impl<K, V, F, S> WithFactory<K, V, F, S> {
        /// Creates a seed that attaches `factory` to the deserialized map.
        #[must_use]
        pub fn new(factory: F) -> Self {
            WithFactory {
                factory,
                marker: PhantomData,
            }
        }
    }

    impl<'de, K, V, F, S> DeserializeSeed<'de> for WithFactory<K, V, F, S>
    where
        K: Deserialize<'de> + Hash + Eq,
        V: Deserialize<'de>,
        S: BuildHasher + Default,
    {
        type Value = DefaultOrderedMap<K, V, F, S>;

        fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            Ok(DefaultOrderedMap {
                map: OrderedMap::deserialize(deserializer)?,
                default_factory: Some(self.factory),
            })
        }
    }
}
