//! Recursive duplication that preserves sharing.
//!
//! [`Clone`] on an `Rc` shares the allocation. [`DeepCopy`] duplicates it
//! instead, once per deep copy: two `Rc`s to one value in the original become
//! two `Rc`s to one new value in the copy. A [`Memo`] records the copies made
//! so far, keyed by the original allocation's address.

use core::fmt;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Copies made so far during one deep copy.
#[derive(Default)]
pub struct Memo {
    copies: HashMap<usize, Box<dyn Any>>,
}

impl Memo {
    /// Creates an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the copy already made of `original`, if any.
    #[must_use]
    pub fn get<T: 'static>(&self, original: &Rc<T>) -> Option<Rc<T>> {
        self.copies
            .get(&address(original))?
            .downcast_ref::<Rc<T>>()
            .cloned()
    }

    /// Records `copy` as the copy of `original`.
    pub fn insert<T: 'static>(&mut self, original: &Rc<T>, copy: Rc<T>) {
        self.copies.insert(address(original), Box::new(copy));
    }

    /// Returns the number of recorded copies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    /// Returns `true` if nothing has been copied yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }
}

impl fmt::Debug for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("copies", &self.copies.len()).finish()
    }
}

fn address<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc).cast::<()>().addr()
}

/// A duplicate that shares nothing with the original except what the
/// original shared with itself.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use ordered_collections::DeepCopy;
///
/// let shared = Rc::new(String::from("x"));
/// let pair = (Rc::clone(&shared), Rc::clone(&shared));
///
/// let copy = pair.deep_copy();
/// assert!(Rc::ptr_eq(&copy.0, &copy.1));
/// assert!(!Rc::ptr_eq(&copy.0, &shared));
/// ```
pub trait DeepCopy: Sized {
    /// Duplicates `self`, consulting and updating `memo` for shared values.
    #[must_use]
    fn deep_copy_with(&self, memo: &mut Memo) -> Self;

    /// Duplicates `self` with a fresh memo.
    #[must_use]
    fn deep_copy(&self) -> Self {
        self.deep_copy_with(&mut Memo::new())
    }

    /// Duplicates the value behind `this` into a new allocation and records it
    /// in `memo`.
    ///
    /// Called at most once per allocation per deep copy. Types that can form
    /// cycles override this to record the new allocation before recursing.
    #[must_use]
    fn deep_copy_rc(this: &Rc<Self>, memo: &mut Memo) -> Rc<Self>
    where
        Self: 'static,
    {
        let copy = Rc::new((**this).deep_copy_with(memo));
        memo.insert(this, Rc::clone(&copy));
        copy
    }
}

macro_rules! deep_copy_by_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DeepCopy for $ty {
                fn deep_copy_with(&self, _memo: &mut Memo) -> Self {
                    Clone::clone(self)
                }
            }
        )*
    };
}

deep_copy_by_clone!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &'static str,
);

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        self.as_ref().map(|value| value.deep_copy_with(memo))
    }
}

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        self.iter().map(|value| value.deep_copy_with(memo)).collect()
    }
}

impl<T: DeepCopy> DeepCopy for Box<T> {
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        Box::new((**self).deep_copy_with(memo))
    }
}

impl<A: DeepCopy, B: DeepCopy> DeepCopy for (A, B) {
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        (self.0.deep_copy_with(memo), self.1.deep_copy_with(memo))
    }
}

impl<A: DeepCopy, B: DeepCopy, C: DeepCopy> DeepCopy for (A, B, C) {
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        (
            self.0.deep_copy_with(memo),
            self.1.deep_copy_with(memo),
            self.2.deep_copy_with(memo),
        )
    }
}

impl<T: DeepCopy + 'static> DeepCopy for Rc<T> {
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        match memo.get(self) {
            Some(copy) => copy,
            None => T::deep_copy_rc(self, memo),
        }
    }
}

/// `RefCell`s can close a cycle of `Rc`s, so the new allocation is recorded
/// holding `T::default()` before the contents are copied.
///
/// # Panics
///
/// Panics if the original is mutably borrowed during the copy.
impl<T: DeepCopy + Default + 'static> DeepCopy for RefCell<T> {
    fn deep_copy_with(&self, memo: &mut Memo) -> Self {
        RefCell::new(self.borrow().deep_copy_with(memo))
    }

    fn deep_copy_rc(this: &Rc<Self>, memo: &mut Memo) -> Rc<Self> {
        let copy = Rc::new(RefCell::new(T::default()));
        memo.insert(this, Rc::clone(&copy));
        let contents = this.borrow().deep_copy_with(memo);
        *copy.borrow_mut() = contents;
        copy
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Link {
        label: u32,
        next: Option<Rc<RefCell<Link>>>,
    }

    impl DeepCopy for Link {
        fn deep_copy_with(&self, memo: &mut Memo) -> Self {
            Link {
                label: self.label,
                next: self.next.deep_copy_with(memo),
            }
        }
    }

    #[test]
    fn cycles_are_copied_once() {
        let a = Rc::new(RefCell::new(Link { label: 1, next: None }));
        let b = Rc::new(RefCell::new(Link {
            label: 2,
            next: Some(Rc::clone(&a)),
        }));
        a.borrow_mut().next = Some(Rc::clone(&b));

        let mut memo = Memo::new();
        let a_copy = a.deep_copy_with(&mut memo);
        assert_eq!(memo.len(), 2);
        assert!(!Rc::ptr_eq(&a_copy, &a));

        let b_copy = a_copy.borrow().next.clone().unwrap();
        assert_eq!(b_copy.borrow().label, 2);
        let back = b_copy.borrow().next.clone().unwrap();
        assert!(Rc::ptr_eq(&back, &a_copy));

        // Break both cycles so the test does not leak.
        a.borrow_mut().next = None;
        a_copy.borrow_mut().next = None;
    }

    #[test]
    fn plain_values_are_duplicated() {
        let original = vec![Some(Box::new(3)), None];
        let copy = original.deep_copy();
        assert_eq!(copy, original);
        assert!(Memo::new().is_empty());
    }
}
