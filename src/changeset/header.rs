//! Header codec: pack/unpack of the encoded Changeset string
//!
//! Wire layout:
//!
//! ```text
//! Z:  <oldLen:base36>  >|<  <magnitude:base36>  |  <ops>  $  <charBank>
//! ```
//!
//! The header stores the old length and a sign-and-magnitude delta rather
//! than both lengths; `new_len = old_len + signed delta`. The `Z:` marker
//! is optional on input and always written on output. The `|` after the
//! magnitude separates the header from the operation stream, and the first
//! `$` separates the operation stream from the char bank.

use serde::{Deserialize, Serialize};

use crate::radix;

/// A decoded Changeset: header fields plus the undecoded operation stream
/// and char bank
///
/// Both lengths count the virtual trailing newline, so they are one greater
/// than the character count of the text they describe. A record is built
/// fresh by every [`Changeset::unpack`] call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// Length of the text this Changeset applies to
    pub old_len: usize,

    /// Length of the text after application
    pub new_len: usize,

    /// Undecoded operation stream (see `ops::OpIterator`)
    pub ops: String,

    /// Literal text consumed left-to-right by insert operations
    pub char_bank: String,
}

impl Changeset {
    /// Create a Changeset record from its parts
    pub fn new(old_len: usize, new_len: usize, ops: String, char_bank: String) -> Self {
        Self {
            old_len,
            new_len,
            ops,
            char_bank,
        }
    }

    /// Decode an encoded Changeset string
    ///
    /// Returns `None` when the string does not start with a valid header:
    /// an optional `Z:` marker, a base-36 old length, a `>` or `<` sign,
    /// and a base-36 magnitude. A magnitude that would drive the new
    /// length negative is also rejected. Callers must check for `None`
    /// before using the record.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use padsync_core::Changeset;
    ///
    /// let cs = Changeset::unpack("Z:5<2|-2$").expect("valid header");
    /// assert_eq!(cs.old_len, 5);
    /// assert_eq!(cs.new_len, 3);
    /// assert!(Changeset::unpack("not a changeset").is_none());
    /// ```
    pub fn unpack(encoded: &str) -> Option<Self> {
        let bytes = encoded.as_bytes();
        let mut pos = 0;

        if bytes.starts_with(b"Z:") {
            pos = 2;
        }

        let (old_len, next) = scan_number(encoded, pos)?;
        pos = next;

        let sign = *bytes.get(pos)?;
        if sign != b'>' && sign != b'<' {
            return None;
        }
        pos += 1;

        let (magnitude, next) = scan_number(encoded, pos)?;
        pos = next;

        let new_len = if sign == b'>' {
            old_len.checked_add(magnitude)?
        } else {
            // A delta below zero length is not a valid Changeset
            old_len.checked_sub(magnitude)?
        };

        // Separator written by `pack` between the header and the op stream
        if bytes.get(pos) == Some(&b'|') {
            pos += 1;
        }

        let remainder = &encoded[pos..];
        let (ops, char_bank) = match remainder.find('$') {
            Some(dollar) => (&remainder[..dollar], &remainder[dollar + 1..]),
            None => (remainder, ""),
        };

        Some(Self {
            old_len,
            new_len,
            ops: ops.to_string(),
            char_bank: char_bank.to_string(),
        })
    }

    /// Encode this record into the canonical Changeset string
    ///
    /// The sign marker matches the unpack grammar: `>` for a non-negative
    /// length delta, `<` for a negative one, so `unpack(pack(cs))`
    /// reproduces `cs` whenever `ops` contains no literal `$`.
    pub fn pack(&self) -> String {
        self.pack_with_sign(if self.new_len >= self.old_len {
            '>'
        } else {
            '<'
        })
    }

    /// Encode this record the way the reference implementation does
    ///
    /// The reference encoder writes `<` as the sign marker for every
    /// delta, positive or negative. Unpacking such a string negates a
    /// non-negative delta, so round-tripping only holds for shrinking
    /// edits. Kept for consumers that expect the reference bytes; use
    /// [`Changeset::pack`] for a self-consistent encoding.
    pub fn pack_legacy(&self) -> String {
        self.pack_with_sign('<')
    }

    fn pack_with_sign(&self, sign: char) -> String {
        let magnitude = self.old_len.abs_diff(self.new_len) as u64;
        format!(
            "Z:{}{}{}|{}${}",
            radix::encode(self.old_len as u64),
            sign,
            radix::encode(magnitude),
            self.ops,
            self.char_bank
        )
    }

    /// Signed length delta encoded by the header
    pub fn delta(&self) -> i64 {
        self.new_len as i64 - self.old_len as i64
    }
}

/// Scan a base-36 number starting at byte offset `start`
///
/// Returns the parsed value and the offset one past its last digit, or
/// `None` when no digit is present or the value overflows `usize`.
fn scan_number(s: &str, start: usize) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut end = start;
    while end < bytes.len() && radix::is_digit(bytes[end]) {
        end += 1;
    }
    if end == start {
        return None;
    }
    let value = radix::decode(&s[start..end])?;
    Some((usize::try_from(value).ok()?, end))
}
