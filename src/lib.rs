//! PadSync Core - Changeset engine for collaborative text editing
//!
//! This is the Rust core of PadSync. It implements the compact Changeset
//! wire format used to ship incremental edits to a shared document:
//! - Header codec (pack/unpack of the `Z:` header line)
//! - Lazy operation decoder over the retain/insert/delete stream
//! - Interpreter that replays a Changeset against a caller-owned text buffer
//! - Base-36 integer encoding used throughout the format
//!
//! The attribute pool and the text buffer itself live outside this crate;
//! attributes are threaded through as opaque reference strings, and the
//! buffer is reached only through the [`TextBuffer`] trait.
//!
//! # Examples
//!
//! ```rust
//! use padsync_core::Changeset;
//!
//! let cs = Changeset::unpack("Z:3>2|=1+2$xy").expect("valid header");
//! assert_eq!(cs.old_len, 3);
//! assert_eq!(cs.new_len, 5);
//! assert_eq!(cs.char_bank, "xy");
//! ```

pub mod changeset;
pub mod error;
pub mod radix;

// Re-exports for convenience
pub use changeset::{apply_to_text, Changeset, Op, OpCode, OpIterator, TextBuffer};
pub use error::{ChangesetError, Result};

/// Opaque attribute-reference string (`*<base36 index>` tokens)
pub type AttribString = String;
