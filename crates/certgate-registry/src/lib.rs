//! # certgate-registry: Claim-Gated Registries
//!
//! Side effects that fire only when a caller proves a fact about an
//! anchored subject and signs the payload anonymously:
//!
//! - **Gate** (`gate.rs`): [`ClaimGate`] fetches the subject's current
//!   root, verifies inclusion of the claimed leaf, then verifies the ring
//!   signature over the payload.
//! - **Feedback** (`feedback.rs`): [`FeedbackRegistry`], a per-subject
//!   append-only log of accepted payload digests.
//! - **Credentials** (`credential.rs`): [`CredentialIssuer`] mints through
//!   a [`Minter`] collaborator; [`InMemoryMinter`] is the bundled one.
//! - **Ledger** (`ledger.rs`): [`Ledger`] wires an anchor and both
//!   registries to one hash strategy and one block clock.
//!
//! ## Crate Policy
//!
//! - Registries commit exactly once per accepted submission and never on
//!   a rejected one.
//! - Failure kinds are distinct [`ClaimError`] variants; callers can tell
//!   an absent root from a failed proof from a bad signature.

pub mod claim;
pub mod credential;
pub mod error;
pub mod feedback;
pub mod gate;
pub mod ledger;

pub use claim::{Claim, ClaimSubmission};
pub use credential::{
    CredentialIssuer, InMemoryMinter, MintedToken, Minter, MinterSnapshot, TokenId,
};
pub use error::{ClaimError, LedgerError, MintError, MinterSnapshotError};
pub use feedback::{FeedbackRegistry, FeedbackSnapshot};
pub use gate::ClaimGate;
pub use ledger::{Ledger, LedgerConfig, LedgerSnapshot};
