//! # Sign Subcommand
//!
//! Produces an Ed25519 witness over a draft's canonical body. The key must
//! belong to one of the draft's required signers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use esc_builder::{UnbalancedTxDraft, Witness};

/// Arguments for `esc sign`.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Private key file (hex seed, as written by `esc keygen`).
    #[arg(long)]
    pub key: PathBuf,

    /// Draft JSON file.
    #[arg(long)]
    pub draft: PathBuf,

    /// Write the witness here instead of stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Execute `esc sign`.
pub fn run_sign(args: &SignArgs) -> Result<u8> {
    let keypair = crate::keygen::load_keypair(&args.key)?;
    let draft: UnbalancedTxDraft = crate::read_json(&args.draft)?;
    let witness = sign_draft(&draft, &keypair, &args.draft)?;
    tracing::info!(draft = %draft.id, signer = %keypair.key_hash(), "draft signed");
    crate::emit_json(&witness, args.out.as_deref())?;
    Ok(0)
}

fn sign_draft(draft: &UnbalancedTxDraft, keypair: &esc_crypto::Ed25519KeyPair, path: &Path) -> Result<Witness> {
    draft
        .sign(keypair)
        .with_context(|| format!("failed to sign {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{run_build, BuildArgs, BuildCommand};
    use esc_core::{hex, Address, PubKeyHash};
    use esc_crypto::Ed25519KeyPair;

    fn start_draft(dir: &Path, sender: Address) -> PathBuf {
        let out = dir.join("start.json");
        let args = BuildArgs {
            receiver: Some(Address::PubKey(PubKeyHash::from_bytes([0x4e; 32]))),
            out: Some(out.clone()),
            command: BuildCommand::Start {
                sender,
                lovelace: 10,
                locked: None,
                amount: 5,
                requested_currency: String::new(),
                requested_token: String::new(),
                escrow_out: None,
            },
        };
        run_build(&args, None).unwrap();
        out
    }

    #[test]
    fn sender_key_signs_start_draft() {
        let dir = tempfile::tempdir().unwrap();
        let seed = [7u8; 32];
        let kp = Ed25519KeyPair::from_seed(&seed);
        let key = dir.path().join("sender.key");
        std::fs::write(&key, hex::encode(&seed)).unwrap();

        let draft = start_draft(dir.path(), kp.public_key().address());
        let out = dir.path().join("witness.json");
        let args = SignArgs {
            key,
            draft: draft.clone(),
            out: Some(out.clone()),
        };
        assert_eq!(run_sign(&args).unwrap(), 0);

        let witness: Witness = crate::read_json(&out).unwrap();
        let draft: UnbalancedTxDraft = crate::read_json(&draft).unwrap();
        draft.verify_witness(&witness).unwrap();
    }

    #[test]
    fn foreign_key_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let sender = Ed25519KeyPair::from_seed(&[7u8; 32]);
        let key = dir.path().join("other.key");
        std::fs::write(&key, hex::encode(&[8u8; 32])).unwrap();

        let args = SignArgs {
            key,
            draft: start_draft(dir.path(), sender.public_key().address()),
            out: None,
        };
        let err = run_sign(&args).unwrap_err();
        assert!(format!("{err:#}").contains("not a required signer"));
    }
}
