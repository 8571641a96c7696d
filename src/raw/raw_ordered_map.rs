use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;

use hashbrown::HashTable;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

/// The insertion-ordered hash map backing `OrderedMap`.
///
/// Entries live in an arena and are chained oldest to newest. The hash table
/// stores only arena handles; hashes are recomputed from the keys.
#[derive(Clone)]
pub(crate) struct RawOrderedMap<K, V, S> {
    /// Arena storing all entries.
    nodes: Arena<Node<K, V>>,
    /// Hash index over the live handles in `nodes`.
    table: HashTable<Handle>,
    hash_builder: S,
    /// Oldest entry.
    head: Option<Handle>,
    /// Newest entry.
    tail: Option<Handle>,
}

#[inline]
fn make_hash<Q, S>(hash_builder: &S, key: &Q) -> u64
where
    Q: ?Sized + Hash,
    S: BuildHasher,
{
    hash_builder.hash_one(key)
}

impl<K, V, S> RawOrderedMap<K, V, S> {
    /// Creates an empty map using `hash_builder` for hashing keys.
    pub(crate) fn with_hasher(hash_builder: S) -> Self {
        Self {
            nodes: Arena::new(),
            table: HashTable::new(),
            hash_builder,
            head: None,
            tail: None,
        }
    }

    /// Creates an empty map with room for `capacity` entries.
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            table: HashTable::with_capacity(capacity),
            hash_builder,
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().min(self.table.capacity())
    }

    pub(crate) const fn hasher(&self) -> &S {
        &self.hash_builder
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.table.clear();
        self.head = None;
        self.tail = None;
    }

    pub(crate) const fn head(&self) -> Option<Handle> {
        self.head
    }

    pub(crate) const fn tail(&self) -> Option<Handle> {
        self.tail
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Returns the handle at `index` in insertion order, walking from
    /// whichever end of the chain is nearer.
    pub(crate) fn handle_at(&self, index: usize) -> Option<Handle> {
        let len = self.len();
        if index >= len {
            return None;
        }

        if index < len / 2 {
            let mut cursor = self.head?;
            for _ in 0..index {
                cursor = self.nodes.get(cursor).next?;
            }
            Some(cursor)
        } else {
            let mut cursor = self.tail?;
            for _ in 0..(len - 1 - index) {
                cursor = self.nodes.get(cursor).prev?;
            }
            Some(cursor)
        }
    }

    /// Returns the insertion-order position of a live handle.
    pub(crate) fn position(&self, handle: Handle) -> usize {
        let mut position = 0;
        let mut cursor = self.nodes.get(handle).prev;
        while let Some(prev) = cursor {
            position += 1;
            cursor = self.nodes.get(prev).prev;
        }
        position
    }

    /// Drains every entry, oldest first, leaving the map empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let node = self.nodes.remove(handle);
            cursor = node.next;
            result.push(node.into_pair());
        }
        self.clear();
        result
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.len(),
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            front: self.head,
            back: self.tail,
            remaining: self.len(),
            slots: self.nodes.as_mut_ptr(),
            marker: PhantomData,
        }
    }

    /// Detaches `handle` from the chain and releases its slot. The caller is
    /// responsible for the hash table.
    fn unlink(&mut self, handle: Handle) -> Node<K, V> {
        let node = self.nodes.remove(handle);
        match node.prev {
            Some(prev) => self.nodes.get_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes.get_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        node
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> RawOrderedMap<K, V, S> {
    /// Looks up the handle holding `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hash_builder, key);
        self.table.find(hash, |&handle| key.eq(self.nodes.get(handle).key.borrow())).copied()
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).map(|handle| &self.nodes.get(handle).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.find(key)?;
        Some(&mut self.nodes.get_mut(handle).value)
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(key).map(|handle| {
            let node = self.nodes.get(handle);
            (&node.key, &node.value)
        })
    }

    /// Inserts a key-value pair. A new key is appended after the newest entry;
    /// an existing key keeps its position and gets its value replaced.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.find(&key) {
            Some(handle) => Some(mem::replace(&mut self.nodes.get_mut(handle).value, value)),
            None => {
                self.push_back(key, value);
                None
            }
        }
    }

    /// Returns the value for `key`, first appending `make()` if it is absent.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let handle = match self.find(&key) {
            Some(handle) => handle,
            None => self.push_back(key, make()),
        };
        &mut self.nodes.get_mut(handle).value
    }

    /// Appends an entry whose key is known to be absent.
    fn push_back(&mut self, key: K, value: V) -> Handle {
        let hash = make_hash(&self.hash_builder, &key);
        let handle = self.nodes.insert(Node::new(key, value, self.tail));
        match self.tail {
            Some(tail) => self.nodes.get_mut(tail).next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);

        let Self {
            nodes,
            table,
            hash_builder,
            ..
        } = self;
        table.insert_unique(hash, handle, |&h| make_hash(hash_builder, &nodes.get(h).key));
        handle
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = make_hash(&self.hash_builder, key);
        let nodes = &self.nodes;
        let entry = self.table.find_entry(hash, |&handle| key.eq(nodes.get(handle).key.borrow())).ok()?;
        let (handle, _) = entry.remove();
        Some(self.unlink(handle).into_pair())
    }

    /// Removes the entry at a live handle.
    fn remove_handle(&mut self, handle: Handle) -> (K, V) {
        let hash = make_hash(&self.hash_builder, &self.nodes.get(handle).key);
        if let Ok(entry) = self.table.find_entry(hash, |&h| h == handle) {
            entry.remove();
        }
        self.unlink(handle).into_pair()
    }

    pub(crate) fn pop_front(&mut self) -> Option<(K, V)> {
        let head = self.head?;
        Some(self.remove_handle(head))
    }

    pub(crate) fn pop_back(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        Some(self.remove_handle(tail))
    }

    /// Keeps the entries for which `keep` returns `true`, preserving order.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let node = self.nodes.get_mut(handle);
            cursor = node.next;
            if !keep(&node.key, &mut node.value) {
                self.remove_handle(handle);
            }
        }
    }
}

/// Shared iterator over the chain.
pub(crate) struct Iter<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.front?);
        self.front = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.back?);
        self.back = node.prev;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Mutable iterator over the chain.
pub(crate) struct IterMut<'a, K, V> {
    slots: *mut Option<Node<K, V>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    marker: PhantomData<&'a mut Node<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: the map is mutably borrowed for `'a`, and `remaining` stops
        // the two cursors before they cross, so every handle is yielded once.
        let node = unsafe { Arena::get_mut_unchecked(self.slots, self.front?) };
        self.front = node.next;
        self.remaining -= 1;
        Some((&node.key, &mut node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: see `next`.
        let node = unsafe { Arena::get_mut_unchecked(self.slots, self.back?) };
        self.back = node.prev;
        self.remaining -= 1;
        Some((&node.key, &mut node.value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::hash_map::RandomState;

    use super::*;
    use proptest::prelude::*;

    fn raw() -> RawOrderedMap<i32, i32, RandomState> {
        RawOrderedMap::with_hasher(RandomState::new())
    }

    fn keys(map: &RawOrderedMap<i32, i32, RandomState>) -> Vec<i32> {
        map.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn chain_follows_insertion_order() {
        let mut map = raw();
        for key in [5, 3, 9, 3, 1] {
            map.insert(key, key * 10);
        }
        assert_eq!(keys(&map), [5, 3, 9, 1]);
        assert_eq!(map.iter().rev().map(|(k, _)| *k).collect::<Vec<_>>(), [1, 9, 3, 5]);
    }

    #[test]
    fn unlink_repairs_both_ends() {
        let mut map = raw();
        for key in 0..4 {
            map.insert(key, key);
        }
        assert_eq!(map.pop_front(), Some((0, 0)));
        assert_eq!(map.pop_back(), Some((3, 3)));
        assert_eq!(map.remove_entry(&1), Some((1, 1)));
        assert_eq!(map.head(), map.tail());
        assert_eq!(keys(&map), [2]);
        assert_eq!(map.pop_back(), Some((2, 2)));
        assert!(map.is_empty());
        assert_eq!(map.head(), None);
        assert_eq!(map.tail(), None);
    }

    #[test]
    fn handle_at_walks_from_either_end() {
        let mut map = raw();
        for key in 0..9 {
            map.insert(key, -key);
        }
        for index in 0..9 {
            let handle = map.handle_at(index).unwrap();
            assert_eq!(map.node(handle).key, i32::try_from(index).unwrap());
            assert_eq!(map.position(handle), index);
        }
        assert_eq!(map.handle_at(9), None);
    }

    #[test]
    fn iter_mut_meets_in_the_middle() {
        let mut map = raw();
        for key in 0..5 {
            map.insert(key, 0);
        }
        let mut iter = map.iter_mut();
        while let Some((key, value)) = iter.next() {
            *value = *key;
            if let Some((key, value)) = iter.next_back() {
                *value = -*key;
            }
        }
        let values: Vec<_> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, [0, 1, 2, -3, -4]);
    }

    proptest! {
        #[test]
        fn matches_vec_model(ops in prop::collection::vec((0u8..4, 0i32..32), 0..512)) {
            let mut map = raw();
            let mut model: Vec<(i32, i32)> = Vec::new();

            for (op, key) in ops {
                match op {
                    0 | 1 => {
                        let old = map.insert(key, i32::from(op));
                        let position = model.iter().position(|(k, _)| *k == key);
                        match position {
                            Some(i) => prop_assert_eq!(old, Some(mem::replace(&mut model[i].1, i32::from(op)))),
                            None => {
                                prop_assert_eq!(old, None);
                                model.push((key, i32::from(op)));
                            }
                        }
                    }
                    2 => {
                        let removed = map.remove_entry(&key);
                        let position = model.iter().position(|(k, _)| *k == key);
                        prop_assert_eq!(removed, position.map(|i| model.remove(i)));
                    }
                    _ => {
                        let popped = map.pop_front();
                        let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                        prop_assert_eq!(popped, expected);
                    }
                }

                let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(&pairs, &model);
                prop_assert_eq!(map.len(), model.len());
            }

            prop_assert_eq!(map.drain_to_vec(), model);
            prop_assert!(map.is_empty());
        }
    }
}
