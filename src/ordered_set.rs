//! A hash set that iterates in insertion order, with an optional bound.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;
use core::num::NonZeroUsize;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Sub, SubAssign};
use std::collections::HashSet;
use std::collections::hash_map::RandomState;

use smallvec::SmallVec;

use crate::deep_copy::{DeepCopy, Memo};
use crate::error::{Error, Result};
use crate::ordered_map::{IntoKeys, Keys, OrderedMap};

mod bounded;
mod select;
mod state;

pub use select::{Select, Selection, Slice};
pub use state::{EMPTY_STATE, SetState};

/// A hash set that iterates in insertion order, optionally bounded.
///
/// Adding an element that is already present changes nothing, including its
/// position. Removing an element and adding it again moves it to the end.
///
/// A set created with [`with_max_len`](OrderedSet::with_max_len) never holds
/// more than that many elements: adding a new element to a full set first
/// evicts the oldest one, the way a least-recently-inserted cache would.
///
/// Equality between two `OrderedSet`s is order-sensitive; equality against a
/// [`HashSet`] compares membership only.
///
/// Iterators borrow the set, so it cannot be mutated while an iteration is in
/// progress. The set is not synchronized; share it across threads only
/// behind external locking.
///
/// # Examples
///
/// ```
/// use ordered_collections::OrderedSet;
///
/// let letters: OrderedSet<char> = "abracadabra".chars().collect();
/// assert_eq!(letters.len(), 5);
/// assert_eq!(letters.iter().collect::<String>(), "abrcd");
/// assert_eq!(letters.iter().rev().collect::<String>(), "dcrba");
///
/// let mut recent = OrderedSet::with_max_len(2).unwrap();
/// recent.insert("a");
/// recent.insert("b");
/// recent.insert("c");
/// assert_eq!(recent.iter().copied().collect::<Vec<_>>(), ["b", "c"]);
/// ```
pub struct OrderedSet<T, S = RandomState> {
    map: OrderedMap<T, (), S>,
    max_len: Option<NonZeroUsize>,
}

/// An iterator over the elements of an [`OrderedSet`], in insertion order.
///
/// This `struct` is created by the [`iter`](OrderedSet::iter) method. Use
/// `.rev()` for reverse insertion order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: Keys<'a, T, ()>,
}

/// An owning iterator over the elements of an [`OrderedSet`], in insertion order.
pub struct IntoIter<T> {
    inner: IntoKeys<T, ()>,
}

impl<T> OrderedSet<T> {
    /// Makes a new, empty, unbounded `OrderedSet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = OrderedSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<T, S> OrderedSet<T, S> {
    /// Makes a new, empty, unbounded `OrderedSet` which hashes elements with
    /// `hash_builder`.
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        OrderedSet {
            map: OrderedMap::with_hasher(hash_builder),
            max_len: None,
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns a reference to the set's hasher.
    #[must_use]
    pub const fn hasher(&self) -> &S {
        self.map.hasher()
    }

    /// Removes every element. A capacity bound, if any, stays in force.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let mut set = OrderedSet::with_max_len(3).unwrap();
    /// set.insert(1);
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.max_len(), Some(3));
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the oldest element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first().map(|(value, ())| value)
    }

    /// Returns the newest element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last().map(|(value, ())| value)
    }

    /// Gets an iterator that visits the elements in insertion order.
    ///
    /// The iterator is lazy and double-ended; calling `iter()` again starts
    /// over from the oldest element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let set = OrderedSet::from([3, 1, 2, 1, 3]);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 1, 2]);
    /// assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), [2, 1, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.map.keys() }
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Returns `true` if the set contains the value.
    ///
    /// # Complexity
    ///
    /// O(1) average
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the stored element equal to `value`, if any.
    #[must_use]
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_key_value(value).map(|(stored, ())| stored)
    }

    /// Adds a value to the set.
    ///
    /// Returns `false`, leaving the set untouched, if an equal value was
    /// already present. Otherwise the value is appended after the newest
    /// element and `true` is returned; if the set is at its capacity bound
    /// the oldest element is evicted first.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// assert!(set.insert("x"));
    /// assert!(set.insert("y"));
    /// assert!(!set.insert("x"));
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["x", "y"]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn insert(&mut self, value: T) -> bool {
        if self.map.contains_key(&value) {
            return false;
        }
        self.make_room();
        self.map.insert(value, ());
        true
    }

    /// Removes a value if present. Returns whether it was present.
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn discard<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(value).is_some()
    }

    /// Removes a value that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the set does not contain `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::{Error, OrderedSet};
    ///
    /// let mut set = OrderedSet::from([1, 2]);
    /// assert_eq!(set.remove(&1), Ok(()));
    /// assert_eq!(set.remove(&1), Err(Error::KeyNotFound));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> Result<()>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove(value).ok_or(Error::KeyNotFound)
    }

    /// Removes and returns the stored element equal to `value`, if any.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove_entry(value).map(|(stored, ())| stored)
    }

    /// Removes and returns the oldest element.
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(value, ())| value)
    }

    /// Removes and returns the newest element.
    ///
    /// # Complexity
    ///
    /// O(1) average
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(value, ())| value)
    }

    /// Retains only the elements for which `keep` returns `true`, in their
    /// original order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.retain(|value, ()| keep(value));
    }

    /// Adds every element of `other`, in `other`'s order, as
    /// [`insert`](OrderedSet::insert) would.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let mut set = OrderedSet::from(['a', 'b']);
    /// set.union_update(['c', 'a', 'd']);
    /// assert_eq!(set.iter().collect::<String>(), "abcd");
    /// ```
    pub fn union_update<I>(&mut self, other: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        for value in other {
            self.insert(value);
        }
        self
    }

    /// Keeps only the elements also present in `other`, in their original
    /// order.
    pub fn intersection_update<S2>(&mut self, other: &OrderedSet<T, S2>) -> &mut Self
    where
        S2: BuildHasher,
    {
        self.map.retain(|value, ()| other.contains(value));
        self
    }

    /// Removes every element also present in `other`.
    pub fn difference_update<S2>(&mut self, other: &OrderedSet<T, S2>) -> &mut Self
    where
        S2: BuildHasher,
    {
        if other.len() < self.len() {
            for value in other {
                self.map.remove(value);
            }
        } else {
            self.map.retain(|value, ()| !other.contains(value));
        }
        self
    }

    /// Keeps the elements present in exactly one of `self` and `other`.
    ///
    /// Elements of `other` already in `self` are removed; the rest are then
    /// appended in `other`'s order. All removals happen before any addition.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let mut set = OrderedSet::from([1, 2, 3]);
    /// set.symmetric_difference_update(&OrderedSet::from([2, 3, 4]));
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 4]);
    /// ```
    pub fn symmetric_difference_update<S2>(&mut self, other: &OrderedSet<T, S2>) -> &mut Self
    where
        T: Clone,
        S2: BuildHasher,
    {
        let mut to_remove: SmallVec<[&T; 16]> = SmallVec::new();
        let mut to_add: SmallVec<[T; 16]> = SmallVec::new();
        for value in other {
            if self.contains(value) {
                to_remove.push(value);
            } else {
                to_add.push(value.clone());
            }
        }
        for value in to_remove {
            self.map.remove(value);
        }
        self.union_update(to_add)
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    #[must_use]
    pub fn is_disjoint<S2>(&self, other: &OrderedSet<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        if self.len() <= other.len() {
            self.iter().all(|value| !other.contains(value))
        } else {
            other.iter().all(|value| !self.contains(value))
        }
    }

    /// Returns `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset<S2>(&self, other: &OrderedSet<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        self.len() <= other.len() && self.iter().all(|value| other.contains(value))
    }

    /// Returns `true` if every element of `other` is in `self`.
    #[must_use]
    pub fn is_superset<S2>(&self, other: &OrderedSet<T, S2>) -> bool
    where
        S2: BuildHasher,
    {
        other.is_subset(self)
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Returns a copy of `self` followed by the elements of `other` not
    /// already present, in `other`'s order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let a: OrderedSet<char> = "abracadabra".chars().collect();
    /// let b: OrderedSet<char> = "simsalabim".chars().collect();
    /// assert_eq!(a.union(&b).iter().collect::<String>(), "abrcdsiml");
    /// ```
    #[must_use]
    pub fn union<S2>(&self, other: &OrderedSet<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.clone();
        result.union_update(other.iter().cloned());
        result
    }

    /// Returns the elements of `self` also in `other`, in `self`'s order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let a: OrderedSet<char> = "abracadabra".chars().collect();
    /// let b: OrderedSet<char> = "simsalabim".chars().collect();
    /// assert_eq!(a.intersection(&b).iter().collect::<String>(), "ab");
    /// ```
    #[must_use]
    pub fn intersection<S2>(&self, other: &OrderedSet<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.clone();
        result.intersection_update(other);
        result
    }

    /// Returns the elements in exactly one of the sets: the survivors of
    /// `self` in their order, then those only in `other` in `other`'s order.
    #[must_use]
    pub fn symmetric_difference<S2>(&self, other: &OrderedSet<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.clone();
        result.symmetric_difference_update(other);
        result
    }

    /// Returns the elements of `self` not in `other`, in `self`'s order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::OrderedSet;
    ///
    /// let a: OrderedSet<char> = "abracadabra".chars().collect();
    /// let b: OrderedSet<char> = "simsalabim".chars().collect();
    /// assert_eq!(a.difference(&b).iter().collect::<String>(), "rcd");
    /// ```
    #[must_use]
    pub fn difference<S2>(&self, other: &OrderedSet<T, S2>) -> Self
    where
        S2: BuildHasher,
    {
        let mut result = self.clone();
        result.difference_update(other);
        result
    }
}

/// Copies the elements, their order and the capacity bound.
impl<T: Clone, S: Clone> Clone for OrderedSet<T, S> {
    fn clone(&self) -> Self {
        OrderedSet {
            map: self.map.clone(),
            max_len: self.max_len,
        }
    }
}

/// Formats as `OrderedSet([a, b, c])`, or `OrderedSet()` when empty.
impl<T: fmt::Debug, S> fmt::Debug for OrderedSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OrderedSet(")?;
        if !self.is_empty() {
            f.debug_list().entries(self.iter()).finish()?;
        }
        f.write_str(")")
    }
}

impl<T, S: Default> Default for OrderedSet<T, S> {
    fn default() -> Self {
        OrderedSet::with_hasher(S::default())
    }
}

/// Order-sensitive: equal sets hold equal elements in the same order.
impl<T, S1, S2> PartialEq<OrderedSet<T, S2>> for OrderedSet<T, S1>
where
    T: PartialEq,
{
    fn eq(&self, other: &OrderedSet<T, S2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, S> Eq for OrderedSet<T, S> {}

/// Order-insensitive: compares membership only.
impl<T, S1, S2> PartialEq<HashSet<T, S2>> for OrderedSet<T, S1>
where
    T: Hash + Eq,
    S2: BuildHasher,
{
    fn eq(&self, other: &HashSet<T, S2>) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

/// Order-insensitive: compares membership only.
impl<T, S1, S2> PartialEq<OrderedSet<T, S1>> for HashSet<T, S2>
where
    T: Hash + Eq,
    S2: BuildHasher,
{
    fn eq(&self, other: &OrderedSet<T, S1>) -> bool {
        other == self
    }
}

impl<T: Hash, S> Hash for OrderedSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T, S> FromIterator<T> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.union_update(iter);
    }
}

impl<'a, T, S> Extend<&'a T> for OrderedSet<T, S>
where
    T: 'a + Hash + Eq + Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.union_update(iter.into_iter().copied());
    }
}

impl<T: Hash + Eq, const N: usize> From<[T; N]> for OrderedSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, S> Sub<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    /// Returns `self.difference(rhs)`.
    fn sub(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        self.difference(rhs)
    }
}

impl<T, S> BitXor<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    /// Returns `self.symmetric_difference(rhs)`.
    fn bitxor(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        self.symmetric_difference(rhs)
    }
}

impl<T, S> BitAnd<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    /// Returns `self.intersection(rhs)`.
    fn bitand(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        self.intersection(rhs)
    }
}

impl<T, S> BitOr<&OrderedSet<T, S>> for &OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    type Output = OrderedSet<T, S>;

    /// Returns `self.union(rhs)`.
    fn bitor(self, rhs: &OrderedSet<T, S>) -> OrderedSet<T, S> {
        self.union(rhs)
    }
}

impl<T, S> SubAssign<&OrderedSet<T, S>> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn sub_assign(&mut self, rhs: &OrderedSet<T, S>) {
        self.difference_update(rhs);
    }
}

impl<T, S> BitXorAssign<&OrderedSet<T, S>> for OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn bitxor_assign(&mut self, rhs: &OrderedSet<T, S>) {
        self.symmetric_difference_update(rhs);
    }
}

impl<T, S> BitAndAssign<&OrderedSet<T, S>> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn bitand_assign(&mut self, rhs: &OrderedSet<T, S>) {
        self.intersection_update(rhs);
    }
}

impl<T, S> BitOrAssign<&OrderedSet<T, S>> for OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn bitor_assign(&mut self, rhs: &OrderedSet<T, S>) {
        self.union_update(rhs.iter().cloned());
    }
}

impl<T, S> IntoIterator for OrderedSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the elements, oldest first.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_keys(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a OrderedSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.inner.clone().collect::<Vec<_>>()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Duplicates the elements recursively and keeps the capacity bound.
impl<T, S> DeepCopy for OrderedSet<T, S>
where
    T: DeepCopy + Hash + Eq,
    S: BuildHasher + Clone,
{
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        OrderedSet {
            map: self.map.deep_copy_with(memo),
            max_len: self.max_len,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn debug_matches_constructor_shape() {
        let empty: OrderedSet<char> = OrderedSet::new();
        assert_eq!(format!("{empty:?}"), "OrderedSet()");

        let set: OrderedSet<char> = "abc".chars().collect();
        assert_eq!(format!("{set:?}"), "OrderedSet(['a', 'b', 'c'])");
    }

    #[test]
    fn symmetric_difference_update_removes_before_adding() {
        let mut set = OrderedSet::with_max_len(3).unwrap();
        set.union_update([1, 2, 3]);
        // Removing 3 first leaves room for 4 without evicting 1.
        set.symmetric_difference_update(&OrderedSet::from([3, 4]));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 4]);
    }

    #[test]
    fn iter_last_is_newest() {
        let set = OrderedSet::from([5, 7, 6]);
        assert_eq!(set.iter().last(), Some(&6));
        assert_eq!(format!("{:?}", set.iter()), "Iter([5, 7, 6])");
    }
}
