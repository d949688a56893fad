//! # Hex Encoding
//!
//! Lowercase hex encoding and tolerant decoding (optional `0x` prefix,
//! either case) shared by every type that renders as a hex string.

use crate::error::HexError;

/// Encode bytes as lowercase hex without a prefix.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Encode bytes as lowercase hex with a `0x` prefix.
pub fn encode_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", encode(bytes))
}

/// Strip an optional `0x`/`0X` prefix.
pub fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string with an optional `0x` prefix.
pub fn decode(s: &str) -> Result<Vec<u8>, HexError> {
    let digits = strip_prefix(s.trim());
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength(digits.len()));
    }
    let mut out = Vec::with_capacity(digits.len() / 2);
    let chars: Vec<char> = digits.chars().collect();
    for (i, pair) in chars.chunks(2).enumerate() {
        let hi = nibble(pair[0], 2 * i)?;
        let lo = nibble(pair[1], 2 * i + 1)?;
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

fn nibble(c: char, position: usize) -> Result<u8, HexError> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or(HexError::InvalidCharacter {
            character: c,
            position,
        })
}
