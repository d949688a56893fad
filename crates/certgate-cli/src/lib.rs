//! # certgate-cli: Command-Line Interface
//!
//! Provides the `certgate` binary. Mutating subcommands load a ledger
//! snapshot from `--state`, run one transaction and write the snapshot
//! back. Verification subcommands are offline and touch no state.
//!
//! ```bash
//! certgate --config ledger.yaml anchor --caller owner --subject 0x01 --root 0x2a
//! certgate history --subject 0x01
//! certgate verify-inclusion --root 0x.. --key 1 --value 5 --proof 7,11
//! certgate verify-ring --signature sig.json --message "hello"
//! certgate feedback submission.json
//! certgate issue submission.json
//! ```
//!
//! Exit codes: `0` success, `1` error, `2` a verification that ran but
//! returned false.

pub mod anchor;
pub mod ledger_file;
pub mod submit;
pub mod verify;

/// Exit code for a verification that evaluated to false.
pub const EXIT_INVALID: u8 = 2;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
