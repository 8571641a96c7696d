use thiserror::Error;

/// Result alias for fallible container operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract violations reported by the containers.
///
/// No operation mutates a container before failing with one of these.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The element or key is not present.
    #[error("key not found")]
    KeyNotFound,

    /// A positional selector fell outside the container.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The index as given, before resolving negative values.
        index: isize,
        /// The length of the container.
        len: usize,
    },

    /// A slice was given a step of zero.
    #[error("slice step cannot be zero")]
    ZeroStep,

    /// A capacity bound of zero was requested.
    #[error("capacity bound must be positive")]
    ZeroCapacity,
}
