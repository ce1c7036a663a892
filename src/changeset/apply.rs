//! Interpreter: replay a decoded Changeset against a text buffer
//!
//! The buffer is a caller-owned collaborator reached only through the
//! [`TextBuffer`] trait; the interpreter assumes nothing about its
//! representation beyond the three mutation operations and `len`. All
//! indices are character offsets into the buffer's state at call time, and
//! every mutation takes effect before the next operation is processed.
//!
//! Apply is not transactional: a failure mid-stream leaves the mutations
//! made so far in place.

use crate::changeset::header::Changeset;
use crate::changeset::ops::{OpCode, OpIterator};
use crate::error::{ChangesetError, Result};

/// Mutable text collaborator the interpreter drives
///
/// Implementations report overruns as
/// [`ChangesetError::OutOfRange`](crate::ChangesetError::OutOfRange); the
/// interpreter propagates buffer errors unchanged.
pub trait TextBuffer {
    /// Current character count
    fn len(&self) -> usize;

    /// Returns `true` when the buffer holds no characters
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `text` at `index`, tagged with the opaque `attribs` string
    fn insert(&mut self, index: usize, text: &str, attribs: &str) -> Result<()>;

    /// Remove `count` characters starting at `index`
    fn remove(&mut self, index: usize, count: usize) -> Result<()>;

    /// Apply `attribs` to the `count`-character span starting at `index`
    fn set_attributes(&mut self, index: usize, attribs: &str, count: usize) -> Result<()>;
}

/// Unpack an encoded Changeset and apply it to `buf`
///
/// Fails with [`ChangesetError::MalformedHeader`](crate::ChangesetError::MalformedHeader)
/// when the string is not a Changeset; otherwise behaves as
/// [`Changeset::apply`].
pub fn apply_to_text<B: TextBuffer>(encoded: &str, buf: &mut B) -> Result<()> {
    let changeset = Changeset::unpack(encoded).ok_or(ChangesetError::MalformedHeader)?;
    changeset.apply(buf)
}

impl Changeset {
    /// Replay this Changeset's operations against `buf`
    ///
    /// The buffer's length plus one (the virtual trailing newline) must
    /// equal `old_len` or `old_len + 1`; otherwise the apply is refused
    /// before any mutation. Inserts consume the char bank left to right;
    /// attributed inserts apply their attributes a second time over the
    /// inserted span, matching the buffer's own insertion default.
    pub fn apply<B: TextBuffer>(&self, buf: &mut B) -> Result<()> {
        let text_len = buf.len();
        if text_len + 1 != self.old_len && text_len != self.old_len {
            return Err(ChangesetError::LengthMismatch {
                expected: self.old_len,
                actual: text_len,
            });
        }

        // Bank offsets are character positions, not bytes
        let bank: Vec<char> = self.char_bank.chars().collect();
        let mut bank_idx: usize = 0;
        let mut text_idx = 0;

        for op in OpIterator::new(&self.ops) {
            match op.code {
                OpCode::Insert => {
                    // Lengths come straight off the wire; the cursor sum can
                    // overflow before the bounds check catches it
                    let end = bank_idx
                        .checked_add(op.chars)
                        .filter(|end| *end <= bank.len())
                        .ok_or(ChangesetError::CharBankExhausted {
                            offset: bank_idx,
                            needed: op.chars,
                            available: bank.len(),
                        })?;
                    let text: String = bank[bank_idx..end].iter().collect();
                    buf.insert(text_idx, &text, &op.attribs)?;
                    if !op.attribs.is_empty() {
                        buf.set_attributes(text_idx, &op.attribs, op.chars)?;
                    }
                    bank_idx = end;
                    text_idx = advance(text_idx, op.chars, buf.len())?;
                }
                OpCode::Delete => {
                    // The buffer contracts; the next surviving character
                    // slides to text_idx
                    buf.remove(text_idx, op.chars)?;
                }
                OpCode::Keep => {
                    if !op.attribs.is_empty() {
                        buf.set_attributes(text_idx, &op.attribs, op.chars)?;
                    }
                    text_idx = advance(text_idx, op.chars, buf.len())?;
                }
            }
        }

        Ok(())
    }
}

/// Advance the text cursor, rejecting wire lengths that overflow it
///
/// An overflowing cursor would target an index past `usize::MAX`, so the
/// error reports the saturated index.
fn advance(text_idx: usize, chars: usize, buf_len: usize) -> Result<usize> {
    text_idx
        .checked_add(chars)
        .ok_or(ChangesetError::OutOfRange {
            index: usize::MAX,
            len: buf_len,
        })
}
