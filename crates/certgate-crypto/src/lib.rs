//! # certgate-crypto: Verification Engine
//!
//! The two verifiers every gated mutation depends on:
//!
//! - **Sparse Merkle tree** inclusion over an injected [`FieldHash`]
//!   strategy ([`SmtVerifier`]).
//! - **Ring signatures** over the Baby Jubjub subgroup ([`RingVerifier`]).
//!
//! Both are pure: no I/O, no interior state, no panics on untrusted input.
//! A proof or signature that is well-formed but wrong yields `Ok(false)`;
//! only structurally malformed input is an error.
//!
//! ## Crate Policy
//!
//! - Depends only on `certgate-core` internally.
//! - Proof and signature *producers* live in [`testing`], compiled for
//!   this crate's tests and behind the `testing` feature for downstream
//!   test suites. They are not part of the verification surface.

pub mod error;
pub mod field_hash;
pub mod ring;
pub mod smt;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{RingError, SmtError};
pub use field_hash::{FieldHash, Sha256FieldHash};
pub use ring::{ring_digest, RingPublicKey, RingSignature, RingVerifier};
pub use smt::{leaf_hash, node_hash, SmtVerifier, LEAF_MARKER, MAX_PROOF_DEPTH};
