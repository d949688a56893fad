//! # Credential Issuance
//!
//! A gated mint: once a submission passes the [`ClaimGate`], the issuer
//! asks its [`Minter`] for a token bound to the subject, the payload
//! digest and the optional metadata URI.
//!
//! The token subsystem itself is a collaborator behind the [`Minter`]
//! trait. [`InMemoryMinter`] assigns per-subject sequential ids from zero
//! and keeps every token's binding for lookup.

use std::collections::{BTreeMap, HashMap};

use certgate_anchor::RootSource;
use certgate_core::{PayloadDigest, SubjectId};
use certgate_crypto::FieldHash;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::claim::ClaimSubmission;
use crate::error::{ClaimError, MintError, MinterSnapshotError};
use crate::gate::ClaimGate;

/// Token identifier, unique within a subject.
pub type TokenId = u64;

/// The minting collaborator.
pub trait Minter: Send + Sync {
    /// Mint a token for `subject` bound to `digest` and `metadata_uri`.
    ///
    /// Must not record anything when it returns `Err`.
    fn mint(
        &mut self,
        subject: &SubjectId,
        digest: &PayloadDigest,
        metadata_uri: Option<&str>,
    ) -> Result<TokenId, MintError>;
}

/// A token recorded by [`InMemoryMinter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedToken {
    /// Identifier within the subject.
    pub token_id: TokenId,
    /// Digest of the payload the token was issued for.
    pub payload_digest: PayloadDigest,
    /// Metadata URI supplied at issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_uri: Option<String>,
}

/// Serialisable image of an [`InMemoryMinter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinterSnapshot {
    /// Per-subject supply cap, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_cap: Option<u64>,
    /// Tokens keyed by subject, in mint order.
    pub tokens: BTreeMap<SubjectId, Vec<MintedToken>>,
}

/// Minter keeping its tokens in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMinter {
    supply_cap: Option<u64>,
    tokens: HashMap<SubjectId, Vec<MintedToken>>,
}

impl InMemoryMinter {
    /// An uncapped minter.
    pub fn new() -> Self {
        Self::default()
    }

    /// A minter that refuses to issue more than `cap` tokens per subject.
    pub fn with_supply_cap(cap: u64) -> Self {
        Self {
            supply_cap: Some(cap),
            tokens: HashMap::new(),
        }
    }

    /// Rebuild from a snapshot. Token ids must be `0..n` per subject and
    /// no subject may hold more than the recorded supply cap.
    pub fn restore(snapshot: MinterSnapshot) -> Result<Self, MinterSnapshotError> {
        for (subject, tokens) in &snapshot.tokens {
            if tokens
                .iter()
                .enumerate()
                .any(|(i, token)| token.token_id != i as TokenId)
            {
                return Err(MinterSnapshotError::NonSequentialTokenIds {
                    subject: subject.clone(),
                });
            }
            let minted = tokens.len() as u64;
            if let Some(cap) = snapshot.supply_cap.filter(|cap| minted > *cap) {
                return Err(MinterSnapshotError::SupplyCapExceeded {
                    subject: subject.clone(),
                    minted,
                    cap,
                });
            }
        }
        Ok(Self {
            supply_cap: snapshot.supply_cap,
            tokens: snapshot.tokens.into_iter().collect(),
        })
    }

    /// Capture every token.
    pub fn snapshot(&self) -> MinterSnapshot {
        MinterSnapshot {
            supply_cap: self.supply_cap,
            tokens: self
                .tokens
                .iter()
                .map(|(subject, tokens)| (subject.clone(), tokens.clone()))
                .collect(),
        }
    }

    /// Token `token_id` of `subject`.
    pub fn token(&self, subject: &SubjectId, token_id: TokenId) -> Option<&MintedToken> {
        let index = usize::try_from(token_id).ok()?;
        self.tokens.get(subject)?.get(index)
    }

    /// Number of tokens minted for `subject`.
    pub fn minted(&self, subject: &SubjectId) -> u64 {
        self.tokens.get(subject).map_or(0, |t| t.len() as u64)
    }
}

impl Minter for InMemoryMinter {
    fn mint(
        &mut self,
        subject: &SubjectId,
        digest: &PayloadDigest,
        metadata_uri: Option<&str>,
    ) -> Result<TokenId, MintError> {
        let next = self.minted(subject);
        if let Some(cap) = self.supply_cap {
            if next >= cap {
                return Err(MintError::SupplyExhausted {
                    subject: subject.clone(),
                    cap,
                });
            }
        }
        self.tokens
            .entry(subject.clone())
            .or_default()
            .push(MintedToken {
                token_id: next,
                payload_digest: *digest,
                metadata_uri: metadata_uri.map(str::to_owned),
            });
        Ok(next)
    }
}

/// Gated credential issuer.
#[derive(Debug, Clone)]
pub struct CredentialIssuer<H, M> {
    gate: ClaimGate<H>,
    minter: M,
}

impl<H: FieldHash, M: Minter> CredentialIssuer<H, M> {
    /// Create an issuer gated over `hasher` that mints through `minter`.
    pub fn new(hasher: H, minter: M) -> Self {
        Self {
            gate: ClaimGate::new(hasher),
            minter,
        }
    }

    /// Verify `submission` against `anchor` and mint a token for it.
    pub fn issue<R: RootSource + ?Sized>(
        &mut self,
        anchor: &R,
        submission: &ClaimSubmission,
    ) -> Result<TokenId, ClaimError> {
        let digest = self.gate.verify(anchor, submission)?;
        let token_id = self.minter.mint(
            &submission.subject,
            &digest,
            submission.metadata_uri.as_deref(),
        )?;
        info!(subject = %submission.subject, token_id, digest = %digest, "credential minted");
        Ok(token_id)
    }

    /// The minting collaborator.
    pub fn minter(&self) -> &M {
        &self.minter
    }
}
