//! # Anchor Configuration

use serde::{Deserialize, Serialize};

use crate::error::AnchorError;

/// Queue capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Construction-time parameters of a [`StateAnchor`](crate::StateAnchor).
///
/// Fixed for the life of the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Maximum number of entries retained per subject (`N`).
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl AnchorConfig {
    /// Build a validated configuration.
    pub fn new(capacity: usize) -> Result<Self, AnchorError> {
        let config = Self { capacity };
        config.validate()?;
        Ok(config)
    }

    /// Reject a zero capacity.
    pub fn validate(&self) -> Result<(), AnchorError> {
        if self.capacity == 0 {
            return Err(AnchorError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
