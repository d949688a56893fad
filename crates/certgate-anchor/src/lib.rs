//! # certgate-anchor: State Anchoring
//!
//! Anchors successive tree roots per subject and answers "what is the
//! current root" and "what were the last N roots":
//!
//! - **Store** (`store.rs`): [`StateAnchor`], the bounded per-subject FIFO
//!   of `(root, block)` entries, and the [`RootSource`] view claim gates
//!   read through.
//! - **Clock** (`clock.rs`): injected [`BlockClock`]; [`ManualClock`] for
//!   ledgers and tests that mine blocks explicitly.
//! - **Authority** (`authority.rs`): injected [`WriterAuthority`]
//!   predicate; [`SingleWriter`] for a single designated owner.
//!
//! ## Crate Policy
//!
//! - Depends only on `certgate-core` internally.
//! - Synchronous and single-threaded: mutation goes through `&mut self`;
//!   callers that share an anchor wrap it in their own lock.

pub mod authority;
pub mod clock;
pub mod config;
pub mod error;
pub mod store;

pub use authority::{SingleWriter, WriterAuthority};
pub use clock::{BlockClock, ManualClock};
pub use config::{AnchorConfig, DEFAULT_CAPACITY};
pub use error::AnchorError;
pub use store::{AnchorSnapshot, RootSource, StateAnchor, StateEntry};
