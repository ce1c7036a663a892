//! Changeset wire format
//!
//! A Changeset is the compact, ASCII encoding of one edit to a shared
//! document: a header carrying the old length and the signed length delta,
//! an operation stream of retain/insert/delete tokens, and a char bank
//! holding the literal text consumed by inserts.
//!
//! # Pipeline
//!
//! - **Header codec** ([`Changeset::unpack`] / [`Changeset::pack`])
//! - **Operation decoder** ([`OpIterator`]): lazy scan of the op stream
//! - **Interpreter** ([`apply_to_text`]): replays decoded ops against a
//!   [`TextBuffer`]

pub mod apply;
pub mod header;
pub mod ops;

pub use apply::{apply_to_text, TextBuffer};
pub use header::Changeset;
pub use ops::{Op, OpCode, OpIterator};
