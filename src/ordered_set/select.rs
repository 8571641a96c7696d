use core::hash::{BuildHasher, Hash};
use core::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::borrow::Cow;

use super::OrderedSet;
use crate::error::{Error, Result};

/// Start, stop and step bounds for positional slicing.
///
/// Bounds follow the usual slicing conventions: negative bounds count from
/// the end, out-of-range bounds are clamped, an omitted step means `1` and a
/// negative step walks backwards from the end.
///
/// # Examples
///
/// ```
/// use ordered_collections::Slice;
///
/// assert_eq!(Slice::new(Some(1), Some(3), None).indices(5), Ok(vec![1, 2]));
/// assert_eq!(Slice::new(None, None, Some(-2)).indices(5), Ok(vec![4, 2, 0]));
/// assert_eq!(Slice::new(Some(-2), None, None).indices(5), Ok(vec![3, 4]));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Slice {
    /// First position; negative counts from the end.
    pub start: Option<isize>,
    /// Exclusive end position; negative counts from the end.
    pub stop: Option<isize>,
    /// Stride between positions; defaults to 1 and must not be 0.
    pub step: Option<isize>,
}

impl Slice {
    /// The slice with every bound omitted, selecting everything.
    pub const FULL: Slice = Slice::new(None, None, None);

    /// Builds a slice from optional bounds.
    #[must_use]
    pub const fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Slice { start, stop, step }
    }

    /// Returns `true` if every bound is omitted.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && self.step.is_none()
    }

    /// Resolves the slice against a sequence of length `len`, returning the
    /// selected positions in visiting order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroStep`] if the step is zero.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::ZeroStep);
        }
        let len = isize::try_from(len).unwrap_or(isize::MAX);
        let clamp = |bound: isize| -> isize {
            if bound < 0 {
                let bound = bound + len;
                if bound >= 0 {
                    bound
                } else if step < 0 {
                    -1
                } else {
                    0
                }
            } else if bound >= len {
                if step < 0 { len - 1 } else { len }
            } else {
                bound
            }
        };
        let (start, stop) = if step > 0 {
            (self.start.map_or(0, clamp), self.stop.map_or(len, clamp))
        } else {
            (self.start.map_or(len - 1, clamp), self.stop.map_or(-1, clamp))
        };

        let mut positions = Vec::new();
        let mut position = start;
        while (step > 0 && position < stop) || (step < 0 && position > stop) {
            positions.push(position.unsigned_abs());
            match position.checked_add(step) {
                Some(next) => position = next,
                None => break,
            }
        }
        Ok(positions)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::FULL
    }
}

impl From<Range<isize>> for Slice {
    fn from(range: Range<isize>) -> Self {
        Slice::new(Some(range.start), Some(range.end), None)
    }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(range: RangeFrom<isize>) -> Self {
        Slice::new(Some(range.start), None, None)
    }
}

impl From<RangeTo<isize>> for Slice {
    fn from(range: RangeTo<isize>) -> Self {
        Slice::new(None, Some(range.end), None)
    }
}

/// A positional selector for [`OrderedSet::select`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Select {
    /// A single position; negative positions count from the end.
    At(isize),
    /// A slice of positions.
    Slice(Slice),
    /// Several positions, each resolved like [`Select::At`].
    Many(Vec<isize>),
}

impl From<isize> for Select {
    fn from(index: isize) -> Self {
        Select::At(index)
    }
}

/// Positions past `isize::MAX` saturate and are reported as out of range.
impl From<usize> for Select {
    fn from(index: usize) -> Self {
        Select::At(isize::try_from(index).unwrap_or(isize::MAX))
    }
}

impl From<Slice> for Select {
    fn from(slice: Slice) -> Self {
        Select::Slice(slice)
    }
}

impl From<RangeFull> for Select {
    fn from(range: RangeFull) -> Self {
        Select::Slice(range.into())
    }
}

impl From<Range<isize>> for Select {
    fn from(range: Range<isize>) -> Self {
        Select::Slice(range.into())
    }
}

impl From<RangeFrom<isize>> for Select {
    fn from(range: RangeFrom<isize>) -> Self {
        Select::Slice(range.into())
    }
}

impl From<RangeTo<isize>> for Select {
    fn from(range: RangeTo<isize>) -> Self {
        Select::Slice(range.into())
    }
}

impl From<Vec<isize>> for Select {
    fn from(indices: Vec<isize>) -> Self {
        Select::Many(indices)
    }
}

impl From<&[isize]> for Select {
    fn from(indices: &[isize]) -> Self {
        Select::Many(indices.to_vec())
    }
}

impl<const N: usize> From<[isize; N]> for Select {
    fn from(indices: [isize; N]) -> Self {
        Select::Many(indices.to_vec())
    }
}

/// The result of [`OrderedSet::select`].
///
/// A full slice borrows the original set; every other multi-position
/// selection is a new set.
#[derive(Debug)]
pub enum Selection<'a, T, S>
where
    T: Clone,
    S: Clone,
{
    /// A single position was selected.
    Element(&'a T),
    /// A slice or several positions were selected.
    Set(Cow<'a, OrderedSet<T, S>>),
}

impl<'a, T: Clone, S: Clone> Selection<'a, T, S> {
    /// Returns the selected element, if a single position was selected.
    #[must_use]
    pub fn element(self) -> Option<&'a T> {
        match self {
            Selection::Element(element) => Some(element),
            Selection::Set(_) => None,
        }
    }

    /// Returns the selected set, if a slice or several positions were
    /// selected.
    #[must_use]
    pub fn into_set(self) -> Option<Cow<'a, OrderedSet<T, S>>> {
        match self {
            Selection::Element(_) => None,
            Selection::Set(set) => Some(set),
        }
    }
}

impl<T, S> OrderedSet<T, S> {
    /// Returns the element at zero-based `index` in insertion order, or `None`
    /// if `index` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(min(index, len - index))
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.map.get_index(index).map(|(value, ())| value)
    }

    /// Returns the element at `index`, counting from the end when negative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` does not name an element.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::{Error, OrderedSet};
    ///
    /// let set = OrderedSet::from(['a', 'b', 'c']);
    /// assert_eq!(set.at(0), Ok(&'a'));
    /// assert_eq!(set.at(-1), Ok(&'c'));
    /// assert_eq!(set.at(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn at(&self, index: isize) -> Result<&T> {
        let position = resolve(index, self.len())?;
        self.get_index(position)
            .ok_or(Error::IndexOutOfRange { index, len: self.len() })
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Returns the zero-based insertion-order position of `value`.
    #[must_use]
    pub fn index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        T: core::borrow::Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.index_of(value)
    }
}

impl<T, S> OrderedSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Returns the elements named by `slice`, in visiting order.
    ///
    /// The full slice returns the set itself, borrowed; any other slice
    /// returns a new set with the same capacity bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroStep`] if the step is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::borrow::Cow;
    /// use ordered_collections::{OrderedSet, Slice};
    ///
    /// let set: OrderedSet<char> = "abcde".chars().collect();
    /// let middle = set.slice(Slice::new(Some(1), Some(3), None)).unwrap();
    /// assert_eq!(middle.iter().collect::<String>(), "bc");
    ///
    /// assert!(matches!(set.slice(Slice::FULL), Ok(Cow::Borrowed(_))));
    /// ```
    pub fn slice(&self, slice: Slice) -> Result<Cow<'_, Self>> {
        if slice.is_full() {
            return Ok(Cow::Borrowed(self));
        }
        let positions = slice.indices(self.len())?;
        Ok(Cow::Owned(self.collect_positions(positions)))
    }

    /// Returns the elements at each of `indices`, in the order given.
    ///
    /// Repeated positions collapse to one element. Every index is checked
    /// before anything is collected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] for the first index that does not
    /// name an element.
    pub fn select_many(&self, indices: &[isize]) -> Result<Self> {
        let len = self.len();
        let positions = indices
            .iter()
            .map(|&index| resolve(index, len))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.collect_positions(positions))
    }

    /// Selects by position, slice or several positions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] or [`Error::ZeroStep`] as
    /// [`at`](OrderedSet::at), [`slice`](OrderedSet::slice) and
    /// [`select_many`](OrderedSet::select_many) do.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::{OrderedSet, Select};
    ///
    /// let set: OrderedSet<char> = "abcd".chars().collect();
    /// assert_eq!(set.select(Select::At(-1)).unwrap().element(), Some(&'d'));
    ///
    /// let picked = set.select(Select::Many(vec![1, 2])).unwrap().into_set().unwrap();
    /// assert_eq!(picked.iter().collect::<String>(), "bc");
    /// ```
    pub fn select(&self, selector: impl Into<Select>) -> Result<Selection<'_, T, S>> {
        match selector.into() {
            Select::At(index) => self.at(index).map(Selection::Element),
            Select::Slice(slice) => self.slice(slice).map(Selection::Set),
            Select::Many(indices) => self
                .select_many(&indices)
                .map(|set| Selection::Set(Cow::Owned(set))),
        }
    }

    fn collect_positions(&self, positions: Vec<usize>) -> Self {
        let elements: Vec<&T> = self.iter().collect();
        let mut result = OrderedSet {
            map: self.map.empty_like(),
            max_len: self.max_len,
        };
        for position in positions {
            result.insert(elements[position].clone());
        }
        result
    }
}

/// Maps a possibly negative index onto `0..len`.
fn resolve(index: isize, len: usize) -> Result<usize> {
    let signed_len = isize::try_from(len).unwrap_or(isize::MAX);
    let resolved = if index < 0 { index + signed_len } else { index };
    if (0..signed_len).contains(&resolved) {
        Ok(resolved.unsigned_abs())
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}
