//! Error types for the Changeset engine
//!
//! All fallible operations in this crate return [`Result`], backed by
//! [`ChangesetError`]. Recoverable wire-format anomalies (invalid `?`
//! tokens, unrecognized bytes in the operation stream) are decoder-level
//! diagnostics, not errors; see `changeset::ops`.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ChangesetError>;

/// Errors raised while decoding or applying a Changeset
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangesetError {
    /// The encoded string does not start with a valid Changeset header
    #[error("malformed changeset header")]
    MalformedHeader,

    /// The text buffer's length is incompatible with the header's old length
    #[error("text length {actual} is incompatible with changeset old length {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// An insert operation ran past the end of the char bank
    #[error("char bank exhausted: needed {needed} chars at offset {offset}, bank holds {available}")]
    CharBankExhausted {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A buffer operation was given an index or span outside the buffer
    #[error("buffer access out of range: index {index}, buffer length {len}")]
    OutOfRange { index: usize, len: usize },
}
