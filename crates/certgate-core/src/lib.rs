#![deny(missing_docs)]

//! # certgate-core: Foundational Types
//!
//! The leaf crate of the certgate workspace. It defines the value types
//! every other crate exchanges: field elements, identifiers and payload
//! digests.
//!
//! ## Key Design Principles
//!
//! 1. **One field type.** Roots, keys, values, hash outputs, signature
//!    scalars and curve coordinates are all [`FieldElement`]s over the
//!    BN254 scalar field. Strict constructors reject non-canonical input.
//!
//! 2. **Newtype identifiers.** [`SubjectId`] names an anchoring namespace,
//!    [`ActorId`] names a transaction sender. They cannot be confused.
//!
//! 3. **Digest-only commitments.** Logs store [`PayloadDigest`]s produced
//!    by SHA-256 over the exact signed payload bytes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `certgate-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - Every public item is documented.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod field;
pub mod hex;
pub mod identity;

pub use digest::PayloadDigest;
pub use error::{FieldError, HexError, IdentifierError};
pub use field::{FieldElement, FIELD_BITS, FIELD_BYTES};
pub use identity::{ActorId, SubjectId};

/// Ledger block height.
pub type BlockNumber = u64;
