//! Insertion-ordered collections for Rust.
//!
//! This crate provides three containers that remember the order in which
//! their keys were first inserted:
//!
//! - [`OrderedSet`] - a hash set iterating in insertion order, with an optional
//!   capacity bound that evicts the oldest element, set algebra, and
//!   positional selection by index, slice or several indices
//! - [`DefaultOrderedMap`] - an ordered map that fills missing keys from a
//!   default factory on creating access
//! - [`OrderedMap`] - the ordered hash map both are built on
//!
//! # Example
//!
//! ```
//! use ordered_collections::{DefaultOrderedMap, OrderedSet, Select};
//!
//! // Remember the three most recently seen visitors.
//! let mut recent = OrderedSet::with_max_len(3)?;
//! for visitor in ["ann", "bo", "cy", "ann", "di"] {
//!     recent.insert(visitor);
//! }
//! assert_eq!(recent.iter().copied().collect::<Vec<_>>(), ["bo", "cy", "di"]);
//! assert_eq!(recent.select(Select::At(-1))?.element(), Some(&"di"));
//!
//! // Group words by length, keeping first-seen order.
//! let mut by_len = DefaultOrderedMap::with_factory(Vec::new);
//! for word in ["fig", "plum", "kiwi", "pea"] {
//!     by_len.get_or_default(word.len())?.push(word);
//! }
//! assert_eq!(by_len[&3_usize], ["fig", "pea"]);
//! assert_eq!(by_len.keys().copied().collect::<Vec<_>>(), [3, 4]);
//! # Ok::<(), ordered_collections::Error>(())
//! ```
//!
//! # Features
//!
//! - **`tracing`** (default) - emits `trace!` events on capacity eviction and
//!   default-value creation, and a `debug!` event on state import
//! - **`serde`** - `Serialize`/`Deserialize` for every container
//!
//! # Implementation
//!
//! Entries live in an arena of doubly-linked nodes addressed by compact
//! handles. A `hashbrown` table maps keys to handles, so lookup, insertion,
//! removal and removal of the oldest entry all take O(1) average time.

// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Unsafe code is needed for the mutable iterator over arena slots.
// #![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod error;
mod raw;

pub mod deep_copy;
pub mod default_map;
pub mod ordered_map;
pub mod ordered_set;

pub use deep_copy::{DeepCopy, Memo};
#[cfg(feature = "serde")]
pub use default_map::WithFactory;
pub use default_map::{DefaultOrderedMap, OrderedCounter};
pub use error::{Error, Result};
pub use ordered_map::OrderedMap;
pub use ordered_set::{EMPTY_STATE, OrderedSet, Select, Selection, SetState, Slice};
