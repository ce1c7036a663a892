//! Operation decoder: lazy scan of the Changeset operation stream
//!
//! The stream is a run of ASCII tokens, one per operation:
//!
//! ```text
//! (*<attrib index:base36>)*  (|<lines:base36>)?  [+-=]  <chars:base36>
//! ```
//!
//! [`OpIterator`] scans it left to right and yields one [`Op`] per grammar
//! match. A literal `?` is the format's error marker: it is reported and
//! skipped, never yielded. Any other byte that starts no match is skipped
//! silently; the format is permissive, and the decoder keeps that behavior
//! rather than rejecting unknown bytes.
//!
//! Decoding is pull-based and bounded by the input length. An exhausted
//! iterator is spent; re-scanning takes a fresh `OpIterator`.

use serde::{Deserialize, Serialize};

use crate::radix;

/// Operation code: what an [`Op`] does to the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpCode {
    /// `+`: insert characters from the char bank
    Insert,
    /// `-`: delete characters from the text
    Delete,
    /// `=`: keep characters, optionally re-attributing them
    Keep,
}

impl OpCode {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(OpCode::Insert),
            b'-' => Some(OpCode::Delete),
            b'=' => Some(OpCode::Keep),
            _ => None,
        }
    }

    /// The wire character for this code
    pub fn as_char(&self) -> char {
        match self {
            OpCode::Insert => '+',
            OpCode::Delete => '-',
            OpCode::Keep => '=',
        }
    }
}

/// One decoded operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Op {
    /// Attribute-reference tokens, verbatim (e.g. `"*0*2b"`); opaque to
    /// this crate and passed through to the text buffer
    pub attribs: String,

    /// Newline count this operation spans; informational only
    pub lines: u64,

    /// What the operation does
    pub code: OpCode,

    /// Number of characters affected
    pub chars: usize,
}

/// Lazy decoder over an operation-stream substring
///
/// Implements `Iterator<Item = Op>`, producing records in document order.
///
/// # Examples
///
/// ```rust
/// use padsync_core::{OpCode, OpIterator};
///
/// let mut ops = OpIterator::new("*0+1*1=2-1");
/// let first = ops.next().unwrap();
/// assert_eq!(first.attribs, "*0");
/// assert_eq!(first.code, OpCode::Insert);
/// assert_eq!(first.chars, 1);
/// assert_eq!(ops.count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct OpIterator<'a> {
    ops: &'a str,
    pos: usize,
    invalid_tokens: usize,
}

impl<'a> OpIterator<'a> {
    /// Decode `ops` from the beginning
    pub fn new(ops: &'a str) -> Self {
        Self::with_offset(ops, 0)
    }

    /// Decode `ops` starting at byte offset `start`
    pub fn with_offset(ops: &'a str, start: usize) -> Self {
        Self {
            ops,
            pos: start,
            invalid_tokens: 0,
        }
    }

    /// Number of `?` error markers skipped so far
    pub fn invalid_tokens(&self) -> usize {
        self.invalid_tokens
    }
}

impl Iterator for OpIterator<'_> {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        let bytes = self.ops.as_bytes();
        while self.pos < bytes.len() {
            if let Some((op, end)) = match_op(self.ops, self.pos) {
                self.pos = end;
                return Some(op);
            }
            if bytes[self.pos] == b'?' {
                tracing::warn!(offset = self.pos, "error opcode in operation stream");
                self.invalid_tokens += 1;
                self.pos += 1;
                continue;
            }
            // Neither an operation nor the error marker: skip the byte
            self.pos += 1;
        }
        None
    }
}

/// Try to match one operation at byte offset `start`
///
/// Returns the decoded record and the offset one past its last byte.
/// Digit and code character classes are disjoint, so a single greedy
/// left-to-right pass decides the match.
fn match_op(s: &str, start: usize) -> Option<(Op, usize)> {
    let bytes = s.as_bytes();
    let mut pos = start;

    // Zero or more `*<index>` attribute tokens, captured verbatim
    while pos < bytes.len() && bytes[pos] == b'*' {
        let digits = scan_digits(bytes, pos + 1);
        if digits == pos + 1 {
            // `*` with no index is not an attribute token
            return None;
        }
        pos = digits;
    }
    let attribs = &s[start..pos];

    // Optional `|<lines>` group
    let mut lines = 0;
    if pos < bytes.len() && bytes[pos] == b'|' {
        let digits = scan_digits(bytes, pos + 1);
        if digits == pos + 1 {
            return None;
        }
        lines = radix::decode(&s[pos + 1..digits])?;
        pos = digits;
    }

    let code = OpCode::from_byte(*bytes.get(pos)?)?;
    pos += 1;

    let digits = scan_digits(bytes, pos);
    if digits == pos {
        return None;
    }
    let chars = usize::try_from(radix::decode(&s[pos..digits])?).ok()?;

    Some((
        Op {
            attribs: attribs.to_string(),
            lines,
            code,
            chars,
        },
        digits,
    ))
}

/// Offset one past the last base-36 digit at or after `start`
fn scan_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && radix::is_digit(bytes[end]) {
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(ops: &str) -> Vec<Op> {
        OpIterator::new(ops).collect()
    }

    #[test]
    fn test_decode_mixed_stream() {
        let ops = collect("*0+1*1=2-1");
        assert_eq!(
            ops,
            vec![
                Op {
                    attribs: "*0".to_string(),
                    lines: 0,
                    code: OpCode::Insert,
                    chars: 1,
                },
                Op {
                    attribs: "*1".to_string(),
                    lines: 0,
                    code: OpCode::Keep,
                    chars: 2,
                },
                Op {
                    attribs: String::new(),
                    lines: 0,
                    code: OpCode::Delete,
                    chars: 1,
                },
            ]
        );
    }

    #[test]
    fn test_decode_multiple_attribs_and_lines() {
        let ops = collect("*0*2b|2+3");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].attribs, "*0*2b");
        assert_eq!(ops[0].lines, 2);
        assert_eq!(ops[0].code, OpCode::Insert);
        assert_eq!(ops[0].chars, 3);
    }

    #[test]
    fn test_decode_base36_lengths() {
        let ops = collect("=1z");
        assert_eq!(ops[0].chars, 71);
    }

    #[test]
    fn test_empty_stream() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn test_error_marker_is_skipped_and_counted() {
        let mut it = OpIterator::new("+1?=2");
        assert_eq!(it.next().unwrap().code, OpCode::Insert);
        assert_eq!(it.next().unwrap().code, OpCode::Keep);
        assert_eq!(it.next(), None);
        assert_eq!(it.invalid_tokens(), 1);
    }

    #[test]
    fn test_error_markers_between_every_token() {
        let mut it = OpIterator::new("?*0+1??-2?");
        let ops: Vec<Op> = it.by_ref().collect();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].code, OpCode::Insert);
        assert_eq!(ops[1].code, OpCode::Delete);
        assert_eq!(it.invalid_tokens(), 4);
    }

    #[test]
    fn test_unrecognized_bytes_are_skipped_silently() {
        // Not part of the grammar, not an error marker: ignored
        let ops = collect("+1 @#=2");
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].code, OpCode::Insert);
        assert_eq!(ops[1].code, OpCode::Keep);
    }

    #[test]
    fn test_stray_separator_is_skipped() {
        // A `|` not followed by digits starts no match
        let ops = collect("|=1+2");
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].lines, 0);
        assert_eq!(ops[0].code, OpCode::Keep);
        assert_eq!(ops[1].code, OpCode::Insert);
    }

    #[test]
    fn test_leading_lines_group() {
        let ops = collect("|1+1");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].lines, 1);
        assert_eq!(ops[0].code, OpCode::Insert);
    }

    #[test]
    fn test_star_without_index_is_not_an_attribute() {
        let ops = collect("*+1");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].attribs, "");
        assert_eq!(ops[0].code, OpCode::Insert);
    }

    #[test]
    fn test_legacy_sign_bytes_are_not_opcodes() {
        // The reference regex accepted `<`/`>` as codes and dropped them at
        // apply time; here they are plain unrecognized bytes
        let ops = collect(">2=1");
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].code, OpCode::Keep);
    }

    #[test]
    fn test_offset_start() {
        let ops: Vec<Op> = OpIterator::with_offset("+1=2", 2).collect();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].code, OpCode::Keep);
    }

    #[test]
    fn test_exhausted_iterator_stays_empty() {
        let mut it = OpIterator::new("=1");
        assert!(it.next().is_some());
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }
}
