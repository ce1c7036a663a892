//! Base-N integer encoding used by the Changeset wire format
//!
//! Every number in the format (lengths, deltas, newline counts, attribute
//! indices) is written in base 36 with the numerals `0-9` then `a-z`. The
//! alphabet is configurable for callers that need a different radix; the
//! base is the alphabet's length.
//!
//! Encoding is defined for unsigned integers only. The wire format carries
//! sign out of band (the `>`/`<` marker in the header), so callers negate
//! first and track the sign themselves.

/// Default numeral alphabet: digits then lowercase letters (base 36)
pub const BASE36_NUMERALS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode `num` in base 36
///
/// Shortest form, most significant digit first, no leading zeros.
/// Zero encodes as `"0"`.
pub fn encode(num: u64) -> String {
    encode_with(num, BASE36_NUMERALS)
}

/// Encode `num` using a custom numeral alphabet
///
/// The base is `numerals.len()`. Zero encodes as the alphabet's first
/// numeral.
///
/// # Panics
///
/// Panics if the alphabet has fewer than two numerals.
pub fn encode_with(num: u64, numerals: &[u8]) -> String {
    assert!(numerals.len() >= 2, "numeral alphabet needs at least base 2");

    let base = numerals.len() as u64;
    if num == 0 {
        return (numerals[0] as char).to_string();
    }

    let mut digits = Vec::new();
    let mut rest = num;
    while rest > 0 {
        digits.push(numerals[(rest % base) as usize]);
        rest /= base;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Decode a base-36 string (`[0-9a-z]+`) back to an integer
///
/// Returns `None` for the empty string, for characters outside the
/// alphabet, or on overflow.
pub fn decode(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }

    let mut value: u64 = 0;
    for c in s.chars() {
        let digit = match c {
            '0'..='9' => c as u64 - '0' as u64,
            'a'..='z' => c as u64 - 'a' as u64 + 10,
            _ => return None,
        };
        value = value.checked_mul(36)?.checked_add(digit)?;
    }
    Some(value)
}

/// Returns `true` if `c` is a base-36 numeral in this format's alphabet
pub(crate) fn is_digit(c: u8) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase()
}
