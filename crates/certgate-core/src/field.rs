//! # Field Elements
//!
//! `FieldElement` is the universal value type of certgate: state roots,
//! tree keys and values, hash outputs, signature challenges and responses,
//! and curve coordinates are all integers modulo the BN254 scalar prime
//!
//! ```text
//! r = 21888242871839275222246405745257275088548364400416034343698204186575808495617
//! ```
//!
//! ## Security Invariant
//!
//! Every constructor that accepts external input is strict: encodings wider
//! than 32 bytes or integers `>= r` are rejected with a [`FieldError`]
//! instead of being silently reduced. Silent reduction would let two
//! distinct wire encodings name the same leaf or root. The explicit
//! `*_mod_order` constructors exist for hash outputs, where reduction is
//! the intended behaviour.

use std::fmt;
use std::str::FromStr;

use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, One, PrimeField, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;
use crate::hex;

/// Number of bytes in a canonical field element encoding.
pub const FIELD_BYTES: usize = 32;

/// Number of addressable key bits (the width of the byte encoding).
pub const FIELD_BITS: usize = FIELD_BYTES * 8;

/// An element of the BN254 scalar field.
///
/// Serialises as a `0x`-prefixed, zero-padded, 64-digit lowercase hex
/// string. Parsing accepts that form (any width up to 64 digits) or a
/// plain decimal integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self(Fr::one())
    }

    /// Embed a small integer.
    pub fn from_u64(value: u64) -> Self {
        Self(Fr::from(value))
    }

    /// Wrap an arkworks field element.
    pub fn from_fr(fr: Fr) -> Self {
        Self(fr)
    }

    /// Borrow the arkworks representation.
    pub fn as_fr(&self) -> &Fr {
        &self.0
    }

    /// Returns `true` for the zero element.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a big-endian encoding of at most 32 bytes, rejecting values
    /// that are not reduced modulo the field prime.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, FieldError> {
        if bytes.len() > FIELD_BYTES {
            return Err(FieldError::TooWide(bytes.len()));
        }
        let mut padded = [0u8; FIELD_BYTES];
        padded[FIELD_BYTES - bytes.len()..].copy_from_slice(bytes);

        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let end = FIELD_BYTES - 8 * i;
            let mut word = [0u8; 8];
            word.copy_from_slice(&padded[end - 8..end]);
            *limb = u64::from_be_bytes(word);
        }
        Fr::from_bigint(BigInt(limbs))
            .map(Self)
            .ok_or_else(|| FieldError::NonCanonical(hex::encode_prefixed(&padded)))
    }

    /// Interpret big-endian bytes of any length as an integer and reduce it
    /// modulo the field prime.
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Interpret little-endian bytes of any length as an integer and reduce
    /// it modulo the field prime.
    pub fn from_le_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_le_bytes_mod_order(bytes))
    }

    /// Canonical 32-byte big-endian encoding.
    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        let raw = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; FIELD_BYTES];
        let start = FIELD_BYTES.saturating_sub(raw.len());
        out[start..].copy_from_slice(&raw[raw.len().saturating_sub(FIELD_BYTES)..]);
        out
    }

    /// Canonical 32-byte little-endian encoding.
    pub fn to_le_bytes(&self) -> [u8; FIELD_BYTES] {
        let mut out = self.to_be_bytes();
        out.reverse();
        out
    }

    /// Parse a hex string (optional `0x` prefix, up to 64 digits).
    ///
    /// Odd-length input is left-padded with a zero nibble so that `0x1`
    /// and `0x01` name the same element.
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        let digits = hex::strip_prefix(s.trim());
        if digits.is_empty() {
            return Err(FieldError::Empty);
        }
        let bytes = if digits.len() % 2 == 1 {
            hex::decode(&format!("0{digits}"))?
        } else {
            hex::decode(digits)?
        };
        Self::from_be_bytes(&bytes)
    }

    /// Parse an unsigned decimal integer.
    pub fn from_decimal(s: &str) -> Result<Self, FieldError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FieldError::Empty);
        }
        let mut limbs = [0u64; 4];
        for c in s.chars() {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| FieldError::InvalidDecimal(format!("unexpected character {c:?}")))?;
            let mut carry = u128::from(digit);
            for limb in limbs.iter_mut() {
                let wide = u128::from(*limb) * 10 + carry;
                *limb = wide as u64;
                carry = wide >> 64;
            }
            if carry != 0 {
                return Err(FieldError::InvalidDecimal(
                    "value does not fit in 256 bits".to_string(),
                ));
            }
        }
        Fr::from_bigint(BigInt(limbs))
            .map(Self)
            .ok_or_else(|| FieldError::NonCanonical(s.to_string()))
    }

    /// Render as `0x` followed by 64 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(&self.to_be_bytes())
    }

    /// Bit `index` of the canonical integer, least-significant bit first.
    ///
    /// Indices at or beyond [`FIELD_BITS`] read as zero.
    pub fn bit(&self, index: usize) -> bool {
        if index >= FIELD_BITS {
            return false;
        }
        let bytes = self.to_le_bytes();
        (bytes[index / 8] >> (index % 8)) & 1 == 1
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<Fr> for FieldElement {
    fn from(fr: Fr) -> Self {
        Self(fr)
    }
}

impl From<FieldElement> for Fr {
    fn from(fe: FieldElement) -> Self {
        fe.0
    }
}

impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            Self::from_hex(trimmed)
        } else {
            Self::from_decimal(trimmed)
        }
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
