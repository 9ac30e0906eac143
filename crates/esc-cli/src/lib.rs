//! # esc-cli: Escrow Stack Command-Line Interface
//!
//! Provides the `esc` binary. Handlers delegate to the domain crates; no
//! validation logic lives here.
//!
//! ## Subcommands
//!
//! - `esc keygen`: Ed25519 key pair and its `pkh:` address.
//! - `esc address`: script address and control-token policy id for a receiver.
//! - `esc build start|cancel|resolve`: unbalanced drafts as JSON.
//! - `esc sign`: witness for a draft.
//! - `esc validate mint|spend`: offline verdict for a transaction view.
//!
//! ```bash
//! esc --config deploy.yaml address
//! esc build start --sender pkh:… --lovelace 5000000 --amount 100 > start.json
//! esc validate mint --view view.json
//! ```
//!
//! Every handler returns the process exit code: 0 on success or accept,
//! 1 on a rejected view. Errors surface as `Err` and the binary exits 2.

pub mod address;
pub mod build;
pub mod config;
pub mod keygen;
pub mod sign;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Pretty-print `value` as JSON to `out`, or to stdout if `out` is `None`.
pub fn emit_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match out {
        Some(path) => std::fs::write(path, text + "\n")
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
