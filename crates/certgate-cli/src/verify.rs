//! # Offline Verification Subcommands
//!
//! - `verify-inclusion`: Check a sparse Merkle tree inclusion proof.
//! - `verify-ring`: Check a ring signature over a message.
//!
//! Neither touches the ledger. Both print `{"valid": bool}` and exit
//! with [`EXIT_INVALID`](crate::EXIT_INVALID) when the check fails.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use certgate_core::{hex, FieldElement};
use certgate_crypto::{RingSignature, RingVerifier, Sha256FieldHash, SmtVerifier};

use crate::{print_json, EXIT_INVALID};

/// Arguments for `certgate verify-inclusion`.
#[derive(Args, Debug)]
pub struct VerifyInclusionArgs {
    /// Expected tree root.
    #[arg(long)]
    pub root: String,

    /// Leaf key.
    #[arg(long)]
    pub key: String,

    /// Leaf value.
    #[arg(long)]
    pub value: String,

    /// Sibling path, leaf-first, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub proof: Vec<String>,
}

/// Arguments for `certgate verify-ring`.
#[derive(Args, Debug)]
pub struct VerifyRingArgs {
    /// Path to a JSON ring signature.
    #[arg(long)]
    pub signature: PathBuf,

    /// Signed message as UTF-8 text.
    #[arg(long, conflicts_with = "message_hex", required_unless_present = "message_hex")]
    pub message: Option<String>,

    /// Signed message as hex bytes.
    #[arg(long)]
    pub message_hex: Option<String>,
}

#[derive(Debug, Serialize)]
struct Verdict {
    valid: bool,
}

fn parse_field(label: &str, raw: &str) -> Result<FieldElement> {
    raw.parse()
        .with_context(|| format!("invalid {label} {raw:?}"))
}

fn report(valid: bool) -> Result<u8> {
    print_json(&Verdict { valid })?;
    Ok(if valid { 0 } else { EXIT_INVALID })
}

/// Execute `certgate verify-inclusion`.
pub fn run_verify_inclusion(args: &VerifyInclusionArgs) -> Result<u8> {
    let root = parse_field("root", &args.root)?;
    let key = parse_field("key", &args.key)?;
    let value = parse_field("value", &args.value)?;
    let proof = args
        .proof
        .iter()
        .map(|p| parse_field("proof element", p))
        .collect::<Result<Vec<_>>>()?;

    let valid = SmtVerifier::new(Sha256FieldHash).verify(&root, &key, &value, &proof)?;
    report(valid)
}

/// Execute `certgate verify-ring`.
pub fn run_verify_ring(args: &VerifyRingArgs) -> Result<u8> {
    let json = std::fs::read_to_string(&args.signature)
        .with_context(|| format!("failed to read {}", args.signature.display()))?;
    let signature: RingSignature =
        serde_json::from_str(&json).context("invalid ring signature JSON")?;

    let message = match (&args.message, &args.message_hex) {
        (Some(text), _) => text.as_bytes().to_vec(),
        (None, Some(raw)) => hex::decode(raw).context("invalid --message-hex")?,
        (None, None) => anyhow::bail!("one of --message or --message-hex is required"),
    };

    let valid = RingVerifier::new().verify(&message, &signature)?;
    report(valid)
}
