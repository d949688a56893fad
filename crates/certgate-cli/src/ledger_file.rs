//! # Ledger Snapshot Files
//!
//! The CLI keeps the whole ledger in one JSON snapshot. A missing state
//! file means a fresh ledger built from `--config`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use certgate_registry::{Ledger, LedgerConfig};

/// Where the ledger lives on disk.
#[derive(Debug, Clone)]
pub struct LedgerFile {
    pub state: PathBuf,
    pub config: Option<PathBuf>,
}

impl LedgerFile {
    pub fn new(state: impl Into<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            state: state.into(),
            config,
        }
    }

    /// Load the snapshot, or start a fresh ledger from the config file.
    pub fn open(&self) -> Result<Ledger> {
        if self.state.exists() {
            if self.config.is_some() {
                tracing::warn!(
                    state = %self.state.display(),
                    "state file exists, ignoring --config"
                );
            }
            let json = std::fs::read_to_string(&self.state)
                .with_context(|| format!("failed to read {}", self.state.display()))?;
            let ledger = Ledger::from_json(&json)
                .with_context(|| format!("invalid ledger snapshot {}", self.state.display()))?;
            tracing::debug!(block = ledger.current_block(), "loaded ledger snapshot");
            return Ok(ledger);
        }

        let Some(config_path) = &self.config else {
            bail!(
                "no ledger at {} and no --config to create one",
                self.state.display()
            );
        };
        let config = LedgerConfig::from_yaml_file(config_path)?;
        tracing::info!(writer = %config.writer, "creating new ledger");
        Ok(Ledger::new(config)?)
    }

    /// Load an existing snapshot. Read-only commands never create a ledger.
    pub fn open_existing(&self) -> Result<Ledger> {
        if !self.state.exists() {
            bail!("no ledger at {}", self.state.display());
        }
        self.open()
    }

    /// Write the snapshot atomically (temp file, then rename).
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = ledger.to_json()?;
        if let Some(parent) = self.state.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let tmp = temp_path(&self.state);
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.state)
            .with_context(|| format!("failed to replace {}", self.state.display()))?;
        tracing::debug!(block = ledger.current_block(), "saved ledger snapshot");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
