//! Error types for draft operations.

use thiserror::Error;

/// Errors that can occur while mutating a draft.
///
/// Every fallible operation checks its arguments before touching the entry
/// table, so an `Err` always leaves the draft exactly as it was before the
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// An index was outside the bounds of a sequence draft.
    #[error("index {index} out of bounds for draft sequence of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The sequence length at the time of the call.
        len: usize,
    },

    /// A sub-range did not fit inside a sequence draft.
    #[error("range {start}..{end} out of bounds for draft sequence of length {len}")]
    RangeOutOfBounds {
        /// Inclusive start of the requested range.
        start: usize,
        /// Exclusive end of the requested range.
        end: usize,
        /// The sequence length at the time of the call.
        len: usize,
    },
}

impl DraftError {
    /// Create an `IndexOutOfBounds` error.
    #[inline]
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create a `RangeOutOfBounds` error.
    #[inline]
    pub fn range_out_of_bounds(start: usize, end: usize, len: usize) -> Self {
        Self::RangeOutOfBounds { start, end, len }
    }
}

/// Result type alias for draft operations.
pub type DraftResult<T> = Result<T, DraftError>;
