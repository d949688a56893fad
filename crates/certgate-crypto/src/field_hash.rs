//! # Field Hash Strategy
//!
//! The tree verifier consumes a collision-resistant compression function
//! over the BN254 scalar field through the [`FieldHash`] trait. Any
//! deterministic `hash2`/`hash3` pair can be injected; proofs only verify
//! against roots produced with the same strategy.
//!
//! ## Default Strategy
//!
//! [`Sha256FieldHash`] is domain-separated SHA-256 over the canonical
//! 32-byte big-endian encodings of the inputs, reduced into the field:
//!
//! - `hash2(a, b) = SHA256(0x02 || a || b) mod r`
//! - `hash3(a, b, c) = SHA256(0x03 || a || b || c) mod r`
//!
//! The arity prefix keeps a two-input digest from ever colliding with a
//! three-input digest over the same bytes.

use std::sync::Arc;

use certgate_core::FieldElement;
use sha2::{Digest, Sha256};

/// Arity prefix for two-input digests.
const HASH2_PREFIX: u8 = 0x02;

/// Arity prefix for three-input digests.
const HASH3_PREFIX: u8 = 0x03;

/// A deterministic map from two or three field elements to one.
pub trait FieldHash: Send + Sync {
    /// Compress two elements (interior tree nodes).
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> FieldElement;

    /// Compress three elements (terminal tree leaves).
    fn hash3(&self, a: &FieldElement, b: &FieldElement, c: &FieldElement) -> FieldElement;
}

impl<H: FieldHash + ?Sized> FieldHash for &H {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        (**self).hash2(a, b)
    }

    fn hash3(&self, a: &FieldElement, b: &FieldElement, c: &FieldElement) -> FieldElement {
        (**self).hash3(a, b, c)
    }
}

impl<H: FieldHash + ?Sized> FieldHash for Arc<H> {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        (**self).hash2(a, b)
    }

    fn hash3(&self, a: &FieldElement, b: &FieldElement, c: &FieldElement) -> FieldElement {
        (**self).hash3(a, b, c)
    }
}

impl<H: FieldHash + ?Sized> FieldHash for Box<H> {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        (**self).hash2(a, b)
    }

    fn hash3(&self, a: &FieldElement, b: &FieldElement, c: &FieldElement) -> FieldElement {
        (**self).hash3(a, b, c)
    }
}

/// Domain-separated SHA-256 reduced modulo the field prime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256FieldHash;

impl Sha256FieldHash {
    fn digest(prefix: u8, inputs: &[&FieldElement]) -> FieldElement {
        let mut hasher = Sha256::new();
        hasher.update([prefix]);
        for input in inputs {
            hasher.update(input.to_be_bytes());
        }
        FieldElement::from_be_bytes_mod_order(&hasher.finalize())
    }
}

impl FieldHash for Sha256FieldHash {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        Self::digest(HASH2_PREFIX, &[a, b])
    }

    fn hash3(&self, a: &FieldElement, b: &FieldElement, c: &FieldElement) -> FieldElement {
        Self::digest(HASH3_PREFIX, &[a, b, c])
    }
}
