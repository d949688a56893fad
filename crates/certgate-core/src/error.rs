//! # Error Types: Core Error Hierarchy
//!
//! Errors raised while parsing or constructing the foundational types.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Parsing never panics: malformed input from an untrusted caller is
//!   always surfaced as a typed error.
//! - Field errors carry the offending input so the rejection is
//!   diagnosable without re-running the call.

use thiserror::Error;

/// Error while decoding a hex string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// The string has an odd number of hex digits after the optional prefix.
    #[error("hex string has odd length {0}")]
    OddLength(usize),

    /// A character outside `[0-9a-fA-F]` was found.
    #[error("invalid hex character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Its position after the optional `0x` prefix.
        position: usize,
    },

    /// The decoded value has the wrong number of bytes.
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength {
        /// Required byte length.
        expected: usize,
        /// Decoded byte length.
        actual: usize,
    },
}

/// Error while constructing a [`FieldElement`](crate::FieldElement).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Hex decoding failed.
    #[error("invalid field element hex: {0}")]
    Hex(#[from] HexError),

    /// The encoding is wider than 32 bytes.
    #[error("field element encoding is {0} bytes, at most 32 are allowed")]
    TooWide(usize),

    /// The integer is not reduced modulo the field prime.
    #[error("value {0} is not a canonical field element (>= modulus)")]
    NonCanonical(String),

    /// The decimal representation is malformed or overflows 256 bits.
    #[error("invalid decimal field element: {0}")]
    InvalidDecimal(String),

    /// The input was empty.
    #[error("empty field element encoding")]
    Empty,
}

/// Error while constructing an identifier newtype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Identifiers must carry at least one byte.
    #[error("{kind} identifier must not be empty")]
    Empty {
        /// Which identifier kind was rejected.
        kind: &'static str,
    },

    /// Hex decoding failed.
    #[error("invalid identifier hex: {0}")]
    Hex(#[from] HexError),
}
