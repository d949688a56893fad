//! # certgate CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use certgate_cli::anchor::{run_anchor, run_history, AnchorArgs, HistoryArgs};
use certgate_cli::ledger_file::LedgerFile;
use certgate_cli::submit::{run_feedback, run_issue, SubmitArgs};
use certgate_cli::verify::{
    run_verify_inclusion, run_verify_ring, VerifyInclusionArgs, VerifyRingArgs,
};

/// certgate: anchored-state claim gating.
///
/// Anchors state roots, verifies sparse Merkle inclusion proofs and ring
/// signatures, and records gated feedback and credentials in a
/// file-backed ledger.
#[derive(Parser, Debug)]
#[command(name = "certgate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML ledger configuration, used when the state file does not exist yet.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ledger snapshot file.
    #[arg(long, global = true, default_value = "certgate-state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Anchor roots as the privileged writer.
    Anchor(AnchorArgs),

    /// Show the retained roots of a subject.
    History(HistoryArgs),

    /// Verify a sparse Merkle tree inclusion proof.
    VerifyInclusion(VerifyInclusionArgs),

    /// Verify a ring signature over a message.
    VerifyRing(VerifyRingArgs),

    /// Record feedback from a claim submission.
    Feedback(SubmitArgs),

    /// Issue a credential from a claim submission.
    Issue(SubmitArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file = LedgerFile::new(cli.state, cli.config);
    tracing::debug!(state = %file.state.display(), "certgate CLI starting");

    let result = match cli.command {
        Commands::Anchor(args) => run_anchor(&args, &file),
        Commands::History(args) => run_history(&args, &file),
        Commands::VerifyInclusion(args) => run_verify_inclusion(&args),
        Commands::VerifyRing(args) => run_verify_ring(&args),
        Commands::Feedback(args) => run_feedback(&args, &file),
        Commands::Issue(args) => run_issue(&args, &file),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
