//! # Identifier Newtypes
//!
//! Newtype wrappers for the two identifier namespaces in certgate:
//! subjects (the things state is anchored under, e.g. a course or a
//! credential contract) and actors (callers submitting transactions).
//!
//! ## Security Invariant
//!
//! Type-level distinction between subjects and actors prevents passing a
//! caller identity where an anchoring namespace is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentifierError;
use crate::hex;

/// An opaque subject identifier: an arbitrary non-empty byte string.
///
/// Serialises as `0x`-prefixed lowercase hex. Two subjects are equal iff
/// their bytes are equal; no normalisation (padding, case folding) is
/// applied, so `0x01` and `0x0001` are different subjects.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(Vec<u8>);

impl SubjectId {
    /// Construct from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, IdentifierError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(IdentifierError::Empty { kind: "subject" });
        }
        Ok(Self(bytes))
    }

    /// Construct from a human-readable label (its UTF-8 bytes).
    pub fn from_label(label: &str) -> Result<Self, IdentifierError> {
        Self::from_bytes(label.as_bytes().to_vec())
    }

    /// Parse a hex string with an optional `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        Self::from_bytes(hex::decode(s)?)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Render as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(&self.0)
    }
}

impl FromStr for SubjectId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectId({})", self.to_hex())
    }
}

impl Serialize for SubjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identity of a transaction sender.
///
/// Writer authorization is decided by comparing actors, so the inner
/// string is compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Construct an actor identifier. Empty identifiers are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentifierError::Empty { kind: "actor" });
        }
        Ok(Self(id))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}
