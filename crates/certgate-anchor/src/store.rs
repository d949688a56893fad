//! # State Anchor
//!
//! Per-subject bounded FIFO of `(root, block)` entries. The newest entry
//! of a subject's queue is that subject's current tree root; older
//! entries stay queryable until `capacity` newer ones push them out.
//!
//! ## Security Invariant
//!
//! - Only the injected [`WriterAuthority`] may append. Authorization is
//!   checked before anything else, so an unauthorized caller learns
//!   nothing about batch validity.
//! - A batch is validated completely (authority, array lengths, clock
//!   ordering of every touched queue) before the first push. A rejected
//!   batch leaves every queue untouched.
//! - Each queue holds at most `capacity` entries ordered by
//!   non-decreasing block number.

use std::collections::{BTreeMap, HashMap, VecDeque};

use certgate_core::{ActorId, BlockNumber, FieldElement, SubjectId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::authority::WriterAuthority;
use crate::clock::BlockClock;
use crate::config::AnchorConfig;
use crate::error::AnchorError;

/// One anchored root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    /// The anchored tree root.
    pub root: FieldElement,
    /// Block in which it was anchored.
    pub anchored_at_block: BlockNumber,
}

/// Read access to the current root of a subject.
///
/// This is the only view of the anchor a claim gate needs.
pub trait RootSource {
    /// The most recently anchored root for `subject`.
    fn last_root(&self, subject: &SubjectId) -> Result<FieldElement, AnchorError>;
}

/// Serialisable image of every queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSnapshot {
    /// Capacity the queues were written under.
    pub capacity: usize,
    /// Queues keyed by subject, each oldest-first.
    pub queues: BTreeMap<SubjectId, Vec<StateEntry>>,
}

/// The anchor store.
#[derive(Debug)]
pub struct StateAnchor<C, A> {
    config: AnchorConfig,
    clock: C,
    authority: A,
    queues: HashMap<SubjectId, VecDeque<StateEntry>>,
}

impl<C: BlockClock, A: WriterAuthority> StateAnchor<C, A> {
    /// Create an empty anchor.
    pub fn new(config: AnchorConfig, clock: C, authority: A) -> Result<Self, AnchorError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            authority,
            queues: HashMap::new(),
        })
    }

    /// Rebuild an anchor from a snapshot, checking every queue invariant.
    pub fn restore(
        snapshot: AnchorSnapshot,
        clock: C,
        authority: A,
    ) -> Result<Self, AnchorError> {
        let config = AnchorConfig::new(snapshot.capacity)?;
        let mut queues = HashMap::with_capacity(snapshot.queues.len());
        for (subject, entries) in snapshot.queues {
            if entries.is_empty() {
                return Err(AnchorError::InvalidSnapshot(format!(
                    "subject {subject} has an empty queue"
                )));
            }
            if entries.len() > config.capacity {
                return Err(AnchorError::InvalidSnapshot(format!(
                    "subject {subject} holds {} entries, capacity is {}",
                    entries.len(),
                    config.capacity
                )));
            }
            if entries
                .windows(2)
                .any(|w| w[0].anchored_at_block > w[1].anchored_at_block)
            {
                return Err(AnchorError::InvalidSnapshot(format!(
                    "subject {subject} entries are not ordered by block"
                )));
            }
            queues.insert(subject, VecDeque::from(entries));
        }
        Ok(Self {
            config,
            clock,
            authority,
            queues,
        })
    }

    /// Capture every queue.
    pub fn snapshot(&self) -> AnchorSnapshot {
        AnchorSnapshot {
            capacity: self.config.capacity,
            queues: self
                .queues
                .iter()
                .map(|(subject, queue)| (subject.clone(), queue.iter().copied().collect::<Vec<_>>()))
                .collect(),
        }
    }

    /// Anchor `roots[i]` under `subjects[i]`, in array order.
    ///
    /// A subject may appear more than once; its entries are pushed in the
    /// order given. Every push is stamped with the clock's current block.
    pub fn append_state(
        &mut self,
        caller: &ActorId,
        subjects: &[SubjectId],
        roots: &[FieldElement],
    ) -> Result<(), AnchorError> {
        if !self.authority.is_authorized_writer(caller) {
            warn!(caller = %caller, "rejected anchor write from unauthorized caller");
            return Err(AnchorError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        if subjects.len() != roots.len() {
            return Err(AnchorError::LengthMismatch {
                subjects: subjects.len(),
                roots: roots.len(),
            });
        }

        let block = self.clock.current_block();
        for subject in subjects {
            if let Some(newest) = self.last_block(subject).ok().filter(|newest| *newest > block) {
                return Err(AnchorError::ClockRegression {
                    subject: subject.clone(),
                    newest,
                    current: block,
                });
            }
        }

        for (subject, root) in subjects.iter().zip(roots) {
            self.push(subject, *root, block);
        }
        Ok(())
    }

    fn push(&mut self, subject: &SubjectId, root: FieldElement, block: BlockNumber) {
        let capacity = self.config.capacity;
        let queue = self
            .queues
            .entry(subject.clone())
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        if queue.len() == capacity {
            if let Some(evicted) = queue.pop_front() {
                debug!(
                    subject = %subject,
                    root = %evicted.root,
                    block = evicted.anchored_at_block,
                    "evicted oldest anchored root"
                );
            }
        }
        queue.push_back(StateEntry {
            root,
            anchored_at_block: block,
        });
        info!(subject = %subject, root = %root, block, "anchored state root");
    }

    /// The most recently anchored root for `subject`.
    pub fn last_root(&self, subject: &SubjectId) -> Result<FieldElement, AnchorError> {
        self.newest(subject).map(|entry| entry.root)
    }

    /// The block at which the current root was anchored.
    pub fn last_block(&self, subject: &SubjectId) -> Result<BlockNumber, AnchorError> {
        self.newest(subject).map(|entry| entry.anchored_at_block)
    }

    fn newest(&self, subject: &SubjectId) -> Result<&StateEntry, AnchorError> {
        self.queues
            .get(subject)
            .and_then(VecDeque::back)
            .ok_or_else(|| AnchorError::EmptyQueue {
                subject: subject.clone(),
            })
    }

    /// Retained entries for `subject`, oldest first. Empty if unknown.
    pub fn history(&self, subject: &SubjectId) -> Vec<StateEntry> {
        self.queues
            .get(subject)
            .map(|queue| queue.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Block at which `root` was anchored for `subject`, if it is still
    /// retained. When the same root was anchored more than once, the
    /// newest anchoring wins.
    pub fn anchored_at(&self, subject: &SubjectId, root: &FieldElement) -> Option<BlockNumber> {
        self.queues
            .get(subject)?
            .iter()
            .rev()
            .find(|entry| entry.root == *root)
            .map(|entry| entry.anchored_at_block)
    }

    /// Number of retained entries for `subject`.
    pub fn len(&self, subject: &SubjectId) -> usize {
        self.queues.get(subject).map_or(0, VecDeque::len)
    }

    /// Whether nothing at all has been anchored.
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Subjects with at least one anchored root, in byte order.
    pub fn subjects(&self) -> Vec<SubjectId> {
        let mut subjects: Vec<SubjectId> = self.queues.keys().cloned().collect();
        subjects.sort();
        subjects
    }

    /// Per-subject queue capacity `N`.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// The injected clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The injected writer authority.
    pub fn authority(&self) -> &A {
        &self.authority
    }
}

impl<C: BlockClock, A: WriterAuthority> RootSource for StateAnchor<C, A> {
    fn last_root(&self, subject: &SubjectId) -> Result<FieldElement, AnchorError> {
        StateAnchor::last_root(self, subject)
    }
}

impl<R: RootSource + ?Sized> RootSource for &R {
    fn last_root(&self, subject: &SubjectId) -> Result<FieldElement, AnchorError> {
        (**self).last_root(subject)
    }
}
