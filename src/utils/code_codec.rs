//! Base62 short code encoding and decoding.
//!
//! Short codes are the positional Base62 representation of a link identity,
//! using the alphabet `0-9A-Za-z` in that index order. Because every identity
//! is issued exactly once, the codes are collision-free without any lookup.

use thiserror::Error;

/// Base62 alphabet. The index of a symbol is its digit value.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = 62;

/// Largest value a code may decode to. Identities are non-negative `i64`s.
const MAX_IDENTITY: u64 = i64::MAX as u64;

/// Top-level route segments that a generated code must never equal.
///
/// A code matching one of these would be shadowed by the router.
pub const RESERVED_CODES: &[&str] = &["urls", "health"];

/// Errors produced when a string is not a decodable short code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("short code must not be empty")]
    Empty,

    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("short code has a leading zero")]
    NonCanonical,

    #[error("short code exceeds the identity range")]
    Overflow,
}

/// Encodes an identity as a Base62 short code.
///
/// `0` encodes to `"0"`; there is no fixed-width padding.
///
/// # Examples
///
/// ```
/// use clickr::utils::code_codec::encode;
///
/// assert_eq!(encode(1), "1");
/// assert_eq!(encode(62), "10");
/// assert_eq!(encode(125), "21");
/// ```
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    // u64::MAX needs 11 Base62 digits.
    let mut buf = [0u8; 11];
    let mut pos = buf.len();

    while n > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Decodes a Base62 short code back into its identity.
///
/// Only canonical codes are accepted: no leading `'0'` unless the code is
/// exactly `"0"`, and the value must fit the identity range. This keeps
/// `encode(decode(c)) == c` for every accepted `c`.
///
/// # Errors
///
/// Returns a [`CodecError`] for empty input, characters outside the alphabet,
/// leading zeros, or values above `i64::MAX`.
pub fn decode(code: &str) -> Result<u64, CodecError> {
    if code.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut result: u64 = 0;

    for (position, character) in code.chars().enumerate() {
        let digit = symbol_index(character).ok_or(CodecError::InvalidCharacter {
            character,
            position,
        })?;

        result = result
            .checked_mul(BASE)
            .and_then(|r| r.checked_add(digit))
            .filter(|r| *r <= MAX_IDENTITY)
            .ok_or(CodecError::Overflow)?;
    }

    if code.len() > 1 && code.as_bytes()[0] == ALPHABET[0] {
        return Err(CodecError::NonCanonical);
    }

    Ok(result)
}

/// Returns true if the string is non-empty and made only of alphabet symbols.
///
/// Cheap pre-lookup filter: a code failing this check can never have been issued.
pub fn is_valid_syntax(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Returns true if the code collides with a top-level route segment.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

fn symbol_index(c: char) -> Option<u64> {
    let digit = match c {
        '0'..='9' => c as u8 - b'0',
        'A'..='Z' => c as u8 - b'A' + 10,
        'a'..='z' => c as u8 - b'a' + 36,
        _ => return None,
    };
    Some(digit as u64)
}
