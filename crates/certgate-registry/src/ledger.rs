//! # Ledger
//!
//! One value wiring a [`StateAnchor`], a [`FeedbackRegistry`] and a
//! [`CredentialIssuer`] over one hash strategy and one block clock. This
//! is what the HTTP service and the CLI operate on.
//!
//! ## Transaction Model
//!
//! Every mutating call is one transaction mined in its own block: the
//! clock advances by one before the call runs. A rejected call is not
//! mined, so the clock is rolled back along with everything else and the
//! ledger is left exactly as it was.

use std::path::Path;

use certgate_anchor::{
    AnchorConfig, AnchorSnapshot, BlockClock, ManualClock, SingleWriter, StateAnchor, StateEntry,
    DEFAULT_CAPACITY,
};
use certgate_core::{ActorId, BlockNumber, FieldElement, PayloadDigest, SubjectId};
use certgate_crypto::{FieldHash, Sha256FieldHash};
use serde::{Deserialize, Serialize};

use crate::claim::ClaimSubmission;
use crate::credential::{CredentialIssuer, InMemoryMinter, MintedToken, MinterSnapshot, TokenId};
use crate::error::LedgerError;
use crate::feedback::{FeedbackRegistry, FeedbackSnapshot};

/// Ledger construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Per-subject anchor queue capacity.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// The only actor allowed to anchor state.
    pub writer: ActorId,
    /// Block number the clock starts at.
    #[serde(default)]
    pub genesis_block: BlockNumber,
    /// Per-subject credential supply cap. Unlimited when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_cap: Option<u64>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl LedgerConfig {
    /// Defaults with `writer` as the privileged writer.
    pub fn new(writer: ActorId) -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            writer,
            genesis_block: 0,
            supply_cap: None,
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, LedgerError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, LedgerError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.writer.as_str().is_empty() {
            return Err(LedgerError::InvalidConfig("writer must not be empty".into()));
        }
        if self.genesis_block == BlockNumber::MAX {
            return Err(LedgerError::InvalidConfig(
                "genesis_block leaves no room for a first block".into(),
            ));
        }
        AnchorConfig::new(self.capacity)
            .map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}

/// Serialisable image of a whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Configuration the ledger runs under.
    pub config: LedgerConfig,
    /// Last mined block.
    pub block: BlockNumber,
    /// Anchored roots.
    pub anchor: AnchorSnapshot,
    /// Feedback logs.
    pub feedback: FeedbackSnapshot,
    /// Minted credentials.
    pub credentials: MinterSnapshot,
}

/// The wired-up system.
#[derive(Debug)]
pub struct Ledger<H = Sha256FieldHash> {
    config: LedgerConfig,
    clock: ManualClock,
    anchor: StateAnchor<ManualClock, SingleWriter>,
    feedback: FeedbackRegistry<H>,
    issuer: CredentialIssuer<H, InMemoryMinter>,
}

impl Ledger<Sha256FieldHash> {
    /// A fresh ledger over the default hash strategy.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        Self::with_hasher(config, Sha256FieldHash)
    }

    /// Restore a snapshot over the default hash strategy.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        Self::restore_with_hasher(snapshot, Sha256FieldHash)
    }

    /// Restore from snapshot JSON over the default hash strategy.
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        Self::restore(serde_json::from_str(json)?)
    }
}

impl<H: FieldHash + Clone> Ledger<H> {
    /// A fresh ledger over `hasher`.
    pub fn with_hasher(config: LedgerConfig, hasher: H) -> Result<Self, LedgerError> {
        config.validate()?;
        let minter = match config.supply_cap {
            Some(cap) => InMemoryMinter::with_supply_cap(cap),
            None => InMemoryMinter::new(),
        };
        let clock = ManualClock::new(config.genesis_block);
        let anchor = StateAnchor::new(
            AnchorConfig::new(config.capacity)?,
            clock.clone(),
            SingleWriter::new(config.writer.clone()),
        )?;
        Ok(Self {
            feedback: FeedbackRegistry::new(hasher.clone()),
            issuer: CredentialIssuer::new(hasher, minter),
            config,
            clock,
            anchor,
        })
    }

    /// Rebuild a ledger from `snapshot` over `hasher`.
    pub fn restore_with_hasher(snapshot: LedgerSnapshot, hasher: H) -> Result<Self, LedgerError> {
        snapshot.config.validate()?;
        if snapshot.block == BlockNumber::MAX {
            return Err(LedgerError::InvalidSnapshot(
                "ledger block leaves no room for another transaction".into(),
            ));
        }
        if snapshot.anchor.capacity != snapshot.config.capacity {
            return Err(LedgerError::InvalidSnapshot(format!(
                "anchor capacity {} does not match configured capacity {}",
                snapshot.anchor.capacity, snapshot.config.capacity
            )));
        }
        let newest = snapshot
            .anchor
            .queues
            .values()
            .filter_map(|queue| queue.last())
            .map(|entry| entry.anchored_at_block)
            .max()
            .unwrap_or(snapshot.config.genesis_block);
        if newest > snapshot.block {
            return Err(LedgerError::InvalidSnapshot(format!(
                "entry anchored at block {newest} is newer than ledger block {}",
                snapshot.block
            )));
        }

        let clock = ManualClock::new(snapshot.block);
        let anchor = StateAnchor::restore(
            snapshot.anchor,
            clock.clone(),
            SingleWriter::new(snapshot.config.writer.clone()),
        )?;
        let minter = InMemoryMinter::restore(snapshot.credentials)?;
        Ok(Self {
            feedback: FeedbackRegistry::restore(hasher.clone(), snapshot.feedback),
            issuer: CredentialIssuer::new(hasher, minter),
            config: snapshot.config,
            clock,
            anchor,
        })
    }

    /// Capture the whole ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            config: self.config.clone(),
            block: self.clock.current_block(),
            anchor: self.anchor.snapshot(),
            feedback: self.feedback.snapshot(),
            credentials: self.issuer.minter().snapshot(),
        }
    }

    /// Snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Run `op` as one transaction in the next block.
    fn transact<T, E>(&mut self, op: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let parent = self.clock.current_block();
        self.clock.advance();
        let result = op(self);
        if result.is_err() {
            self.clock.set(parent);
        }
        result
    }

    // -----------------------------------------------------------------------
    // Anchoring
    // -----------------------------------------------------------------------

    /// Anchor a batch of roots. Returns the block they were anchored in.
    pub fn append_state(
        &mut self,
        caller: &ActorId,
        subjects: &[SubjectId],
        roots: &[FieldElement],
    ) -> Result<BlockNumber, LedgerError> {
        self.transact(|ledger| {
            ledger.anchor.append_state(caller, subjects, roots)?;
            Ok(ledger.clock.current_block())
        })
    }

    /// Current root of `subject`.
    pub fn last_root(&self, subject: &SubjectId) -> Result<FieldElement, LedgerError> {
        Ok(self.anchor.last_root(subject)?)
    }

    /// Block the current root of `subject` was anchored in.
    pub fn last_block(&self, subject: &SubjectId) -> Result<BlockNumber, LedgerError> {
        Ok(self.anchor.last_block(subject)?)
    }

    /// Retained roots of `subject`, oldest first.
    pub fn history(&self, subject: &SubjectId) -> Vec<StateEntry> {
        self.anchor.history(subject)
    }

    /// Block `root` was anchored in for `subject`, if still retained.
    pub fn anchored_at(&self, subject: &SubjectId, root: &FieldElement) -> Option<BlockNumber> {
        self.anchor.anchored_at(subject, root)
    }

    // -----------------------------------------------------------------------
    // Gated mutations
    // -----------------------------------------------------------------------

    /// Record feedback. Returns its index in the subject's log.
    pub fn add_feedback(&mut self, submission: &ClaimSubmission) -> Result<usize, LedgerError> {
        self.transact(|ledger| Ok(ledger.feedback.add_feedback(&ledger.anchor, submission)?))
    }

    /// Issue a credential. Returns the minted token id.
    pub fn issue_credential(
        &mut self,
        submission: &ClaimSubmission,
    ) -> Result<TokenId, LedgerError> {
        self.transact(|ledger| Ok(ledger.issuer.issue(&ledger.anchor, submission)?))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Feedback digest at `index`.
    pub fn feedback_at(&self, subject: &SubjectId, index: usize) -> Option<PayloadDigest> {
        self.feedback.feedback_at(subject, index)
    }

    /// Number of feedback entries for `subject`.
    pub fn feedback_count(&self, subject: &SubjectId) -> usize {
        self.feedback.feedback_count(subject)
    }

    /// A window of the feedback log.
    pub fn feedbacks(&self, subject: &SubjectId, offset: usize, limit: usize) -> Vec<PayloadDigest> {
        self.feedback.feedbacks(subject, offset, limit)
    }

    /// A minted credential.
    pub fn credential(&self, subject: &SubjectId, token_id: TokenId) -> Option<&MintedToken> {
        self.issuer.minter().token(subject, token_id)
    }

    /// Last mined block.
    pub fn current_block(&self) -> BlockNumber {
        self.clock.current_block()
    }

    /// Subjects with anchored state.
    pub fn subjects(&self) -> Vec<SubjectId> {
        self.anchor.subjects()
    }

    /// The running configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}
