//! # Payload Digests
//!
//! Accepted payloads are committed to the per-subject logs by digest only.
//! `PayloadDigest` is the SHA-256 of the raw payload bytes.
//!
//! ## Security Invariant
//!
//! The only hashing constructor is [`PayloadDigest::of()`], so every digest
//! in a log is guaranteed to be a SHA-256 over exactly the bytes that were
//! signed. [`PayloadDigest::from_hex()`] exists for reading persisted logs.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::HexError;
use crate::hex;

/// SHA-256 digest of an accepted payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayloadDigest([u8; 32]);

impl PayloadDigest {
    /// Hash a payload.
    pub fn of(payload: &[u8]) -> Self {
        let hash = Sha256::digest(payload);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Parse a persisted digest (64 hex digits, optional `0x`).
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        let raw = hex::decode(s)?;
        if raw.len() != 32 {
            return Err(HexError::WrongLength {
                expected: 32,
                actual: raw.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&raw);
        Ok(Self(bytes))
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(&self.0)
    }
}

impl fmt::Display for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for PayloadDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PayloadDigest({})", self.to_hex())
    }
}

impl Serialize for PayloadDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PayloadDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
