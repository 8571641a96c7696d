use core::hash::{BuildHasher, Hash};

use super::OrderedSet;

/// Placeholder exported for an empty set.
///
/// Some serialization frameworks treat an empty state as no state at all and
/// skip restoring it, so an empty set exports this marker instead.
pub const EMPTY_STATE: &str = "__empty__";

/// The exportable state of an [`OrderedSet`].
///
/// With the `serde` feature, `Empty` serializes as [`EMPTY_STATE`] and
/// `Items` as a sequence. Reading either form back needs a self-describing
/// format such as JSON, because the deserializer must decide between a string
/// and a sequence. Formats that do not record types, like `bincode` or
/// `postcard`, cannot deserialize a `SetState` or an [`OrderedSet`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SetState<T> {
    /// The set was empty.
    Empty,
    /// The elements, in insertion order.
    Items(Vec<T>),
}

impl<T> SetState<T> {
    /// Returns the exported elements; empty for the placeholder.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            SetState::Empty => Vec::new(),
            SetState::Items(items) => items,
        }
    }
}

impl<T: Clone, S> OrderedSet<T, S> {
    /// Exports the elements in insertion order, or [`SetState::Empty`] for an
    /// empty set.
    ///
    /// The capacity bound is not part of the state.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::{OrderedSet, SetState};
    ///
    /// let set = OrderedSet::from([2, 1]);
    /// assert_eq!(set.export_state(), SetState::Items(vec![2, 1]));
    /// assert_eq!(OrderedSet::<i32>::new().export_state(), SetState::Empty);
    /// ```
    #[must_use]
    pub fn export_state(&self) -> SetState<T> {
        if self.is_empty() {
            SetState::Empty
        } else {
            SetState::Items(self.iter().cloned().collect())
        }
    }
}

impl<T: Hash + Eq> OrderedSet<T> {
    /// Rebuilds an unbounded set from exported state.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_collections::{OrderedSet, SetState};
    ///
    /// let set = OrderedSet::from_state(SetState::Items(vec!['b', 'a', 'b']));
    /// assert_eq!(set.iter().collect::<String>(), "ba");
    /// assert!(OrderedSet::<char>::from_state(SetState::Empty).is_empty());
    /// ```
    #[must_use]
    pub fn from_state(state: SetState<T>) -> Self {
        state.into()
    }
}

impl<T, S> From<SetState<T>> for OrderedSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from(state: SetState<T>) -> Self {
        let set: Self = state.into_items().into_iter().collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(len = set.len(), "restored ordered set from state");
        set
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
mod serde_impls {
    use core::fmt;
    use core::hash::{BuildHasher, Hash};
    use core::marker::PhantomData;

    use serde::de::{self, SeqAccess, Unexpected, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{EMPTY_STATE, SetState};
    use crate::ordered_set::OrderedSet;

    impl<T: Serialize> Serialize for SetState<T> {
        fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
            match self {
                SetState::Empty => serializer.serialize_str(EMPTY_STATE),
                SetState::Items(items) => serializer.collect_seq(items),
            }
        }
    }

    impl<T: Serialize, S> Serialize for OrderedSet<T, S> {
        fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
            if self.is_empty() {
                serializer.serialize_str(EMPTY_STATE)
            } else {
                serializer.collect_seq(self.iter())
            }
        }
    }

    struct SetStateVisitor<T> {
        marker: PhantomData<fn() -> SetState<T>>,
    }

    impl<'de, T: Deserialize<'de>> Visitor<'de> for SetStateVisitor<T> {
        type Value = SetState<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a sequence or the string {EMPTY_STATE:?}")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            if value == EMPTY_STATE {
                Ok(SetState::Empty)
            } else {
                Err(E::invalid_value(Unexpected::Str(value), &self))
            }
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(item) = access.next_element()? {
                items.push(item);
            }
            Ok(SetState::Items(items))
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for SetState<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(SetStateVisitor { marker: PhantomData })
        }
    }

    impl<'de, T, S> Deserialize<'de> for OrderedSet<T, S>
    where
        T: Deserialize<'de> + Hash + Eq,
        S: BuildHasher + Default,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            SetState::deserialize(deserializer).map(OrderedSet::from)
        }
    }
}
