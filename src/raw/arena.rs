use super::handle::Handle;

/// Slot storage with handle reuse.
///
/// Handles stay valid until the slot is released, independent of what
/// happens to other slots, which is what lets the linked entries refer to
/// one another by handle.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub(crate) fn insert(&mut self, element: T) -> Handle {
        if let Some(handle) = self.vacant.pop() {
            self.slots[handle.index()] = Some(element);
            return handle;
        }

        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::insert()` - arena is full ({} slots)",
            Handle::MAX + 1
        );
        self.slots.push(Some(element));
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.index()].as_ref().expect("`Arena::get()` - vacant slot")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.index()].as_mut().expect("`Arena::get_mut()` - vacant slot")
    }

    /// Base pointer for [`Arena::get_mut_unchecked`].
    pub(crate) fn as_mut_ptr(&mut self) -> *mut Option<T> {
        self.slots.as_mut_ptr()
    }

    /// Returns a mutable reference to an element through a base slot pointer.
    ///
    /// # Safety
    /// - `base` must come from [`Arena::as_mut_ptr`] on an arena that has not
    ///   been touched since.
    /// - `handle` must be occupied, and no other reference to its element may
    ///   exist for `'a`.
    #[inline]
    pub(crate) unsafe fn get_mut_unchecked<'a>(base: *mut Option<T>, handle: Handle) -> &'a mut T {
        // SAFETY: guaranteed by the caller; only the addressed slot is touched.
        unsafe {
            (*base.add(handle.index()))
                .as_mut()
                .expect("`Arena::get_mut_unchecked()` - vacant slot")
        }
    }

    /// Releases the slot and hands back its element.
    pub(crate) fn remove(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.index()].take().expect("`Arena::remove()` - vacant slot");
        self.vacant.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn released_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.remove(a), "a");
        let c = arena.insert("c");

        assert_eq!(c, a);
        assert_eq!(*arena.get(b), "b");
        assert_eq!(*arena.get(c), "c");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "`Arena::get()` - vacant slot")]
    fn get_after_remove_panics() {
        let mut arena = Arena::new();
        let handle = arena.insert(1u8);
        arena.remove(handle);
        let _ = arena.get(handle);
    }

    #[test]
    fn with_capacity_reserves() {
        let arena: Arena<u64> = Arena::with_capacity(10);
        assert!(arena.capacity() >= 10);
        assert_eq!(arena.len(), 0);
    }

    proptest! {
        #[test]
        fn arena_tracks_live_handles(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Insert(value) => {
                        live.push((arena.insert(value), value));
                    }
                    Operation::Overwrite(which, value) if !live.is_empty() => {
                        let index = which % live.len();
                        *arena.get_mut(live[index].0) = value;
                        live[index].1 = value;
                    }
                    Operation::Remove(which) if !live.is_empty() => {
                        let index = which % live.len();
                        let (handle, expected) = live.swap_remove(index);
                        prop_assert_eq!(arena.remove(handle), expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        live.clear();
                    }
                    _ => {}
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, value) in &live {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(u32),
        Overwrite(usize, u32),
        Remove(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Insert),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::Overwrite(which, value)),
            8 => any::<usize>().prop_map(Operation::Remove),
            1 => Just(Operation::Clear),
        ]
    }
}
