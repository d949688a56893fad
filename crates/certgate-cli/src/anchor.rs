//! # Anchor and History Subcommands
//!
//! - `anchor`: Anchor one or more roots as the privileged writer.
//! - `history`: Show the retained roots of a subject.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use certgate_core::{ActorId, BlockNumber, FieldElement, SubjectId};

use crate::ledger_file::LedgerFile;
use crate::print_json;

/// Arguments for `certgate anchor`.
#[derive(Args, Debug)]
pub struct AnchorArgs {
    /// Transaction sender. Must be the configured writer.
    #[arg(long)]
    pub caller: String,

    /// Subject to anchor under (hex). Repeat once per root.
    #[arg(long = "subject", required = true)]
    pub subjects: Vec<String>,

    /// Root to anchor (hex or decimal). Paired by position with `--subject`.
    #[arg(long = "root", required = true)]
    pub roots: Vec<String>,
}

/// Arguments for `certgate history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Subject to inspect (hex).
    #[arg(long)]
    pub subject: String,
}

#[derive(Debug, Serialize)]
struct AnchorOutput {
    block: BlockNumber,
    anchored: usize,
}

/// Execute `certgate anchor`.
pub fn run_anchor(args: &AnchorArgs, file: &LedgerFile) -> Result<u8> {
    let caller = ActorId::new(args.caller.clone())?;
    let subjects = args
        .subjects
        .iter()
        .map(|s| s.parse::<SubjectId>().with_context(|| format!("invalid subject {s:?}")))
        .collect::<Result<Vec<_>>>()?;
    let roots = args
        .roots
        .iter()
        .map(|r| r.parse::<FieldElement>().with_context(|| format!("invalid root {r:?}")))
        .collect::<Result<Vec<_>>>()?;

    let mut ledger = file.open()?;
    let block = ledger.append_state(&caller, &subjects, &roots)?;
    file.save(&ledger)?;

    print_json(&AnchorOutput {
        block,
        anchored: roots.len(),
    })?;
    Ok(0)
}

/// Execute `certgate history`.
pub fn run_history(args: &HistoryArgs, file: &LedgerFile) -> Result<u8> {
    let subject: SubjectId = args
        .subject
        .parse()
        .with_context(|| format!("invalid subject {:?}", args.subject))?;
    let ledger = file.open_existing()?;
    print_json(&ledger.history(&subject))?;
    Ok(0)
}
