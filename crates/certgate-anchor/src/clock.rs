//! # Block Clock
//!
//! The anchor never reads wall-clock time. Every entry is stamped with the
//! reading of an injected [`BlockClock`], the ledger's notion of "current
//! block number".

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use certgate_core::BlockNumber;

/// Source of the current block number.
pub trait BlockClock: Send + Sync {
    /// The block the current transaction is executing in.
    fn current_block(&self) -> BlockNumber;
}

impl<C: BlockClock + ?Sized> BlockClock for Arc<C> {
    fn current_block(&self) -> BlockNumber {
        (**self).current_block()
    }
}

impl<C: BlockClock + ?Sized> BlockClock for &C {
    fn current_block(&self) -> BlockNumber {
        (**self).current_block()
    }
}

/// A clock advanced by hand.
///
/// Clones share the same counter, so a ledger can hand one clone to the
/// anchor and keep another to mine blocks.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    block: Arc<AtomicU64>,
}

impl ManualClock {
    /// Start the clock at `block`.
    pub fn new(block: BlockNumber) -> Self {
        Self {
            block: Arc::new(AtomicU64::new(block)),
        }
    }

    /// Move to the next block and return it. The clock stops at
    /// `BlockNumber::MAX` instead of wrapping.
    pub fn advance(&self) -> BlockNumber {
        let next = |block: BlockNumber| block.saturating_add(1);
        match self
            .block
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |block| Some(next(block)))
        {
            Ok(previous) | Err(previous) => next(previous),
        }
    }

    /// Jump to `block`. Moving backwards is allowed; the anchor rejects
    /// writes that would break its ordering.
    pub fn set(&self, block: BlockNumber) {
        self.block.store(block, Ordering::SeqCst);
    }
}

impl BlockClock for ManualClock {
    fn current_block(&self) -> BlockNumber {
        self.block.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_returns_new_block() {
        let clock = ManualClock::new(5);
        assert_eq!(clock.current_block(), 5);
        assert_eq!(clock.advance(), 6);
        assert_eq!(clock.current_block(), 6);
    }

    #[test]
    fn advance_saturates_at_last_block() {
        let clock = ManualClock::new(BlockNumber::MAX - 1);
        assert_eq!(clock.advance(), BlockNumber::MAX);
        assert_eq!(clock.advance(), BlockNumber::MAX);
        assert_eq!(clock.current_block(), BlockNumber::MAX);
    }

    #[test]
    fn clones_share_counter() {
        let clock = ManualClock::default();
        let shared = clock.clone();
        clock.advance();
        clock.advance();
        assert_eq!(shared.current_block(), 2);
        shared.set(10);
        assert_eq!(clock.current_block(), 10);
    }

    #[test]
    fn arc_and_ref_delegate() {
        let clock = ManualClock::new(7);
        let arc: Arc<dyn BlockClock> = Arc::new(clock.clone());
        assert_eq!(arc.current_block(), 7);
        assert_eq!((&clock).current_block(), 7);
    }
}
