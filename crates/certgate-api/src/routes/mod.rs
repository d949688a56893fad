//! # API Route Modules
//!
//! - `anchors`: privileged root anchoring and anchored-state queries.
//! - `feedback`: claim-gated feedback submission and log reads.
//! - `credentials`: claim-gated credential issuance and token reads.

pub mod anchors;
pub mod credentials;
pub mod feedback;

#[cfg(test)]
pub(crate) mod fixtures;
