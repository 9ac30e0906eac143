//! # Build Subcommand
//!
//! Emits unbalanced drafts as JSON. `start` takes the escrow terms as flags;
//! `cancel` and `resolve` take the escrow UTXO as a JSON file, in the shape
//! `start --escrow-out` writes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use esc_builder::{find_escrows, EscrowTerms, EscrowTxBuilder, EscrowUtxo, MemoryIndex, UnbalancedTxDraft};
use esc_core::{Address, AssetClass, CurrencySymbol, TokenName, Value};

/// Arguments for `esc build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Receiver address (`pkh:<hex>`). Overrides the deployment file.
    #[arg(long, global = true)]
    pub receiver: Option<Address>,

    /// Write the draft here instead of stdout.
    #[arg(long, short, global = true)]
    pub out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: BuildCommand,
}

/// Draft kinds.
#[derive(Subcommand, Debug)]
pub enum BuildCommand {
    /// Lock value at the script address and mint a control token.
    Start {
        /// Sender address (`pkh:<hex>`).
        #[arg(long)]
        sender: Address,
        /// Lovelace to lock.
        #[arg(long, default_value_t = 0)]
        lovelace: i64,
        /// Additional value to lock, as a JSON value file.
        #[arg(long)]
        locked: Option<PathBuf>,
        /// Quantity owed to the sender on resolve.
        #[arg(long)]
        amount: i64,
        /// Currency symbol of the requested asset (empty for lovelace).
        #[arg(long, default_value = "")]
        requested_currency: String,
        /// Token name of the requested asset.
        #[arg(long, default_value = "")]
        requested_token: String,
        /// Also write the escrow UTXO the draft creates, for later cancel/resolve.
        #[arg(long)]
        escrow_out: Option<PathBuf>,
    },

    /// Return an escrow's locked value to its sender.
    Cancel {
        /// Escrow UTXO JSON file.
        #[arg(long)]
        escrow: PathBuf,
    },

    /// Pay the sender and release an escrow to the receiver.
    Resolve {
        /// Escrow UTXO JSON file.
        #[arg(long)]
        escrow: PathBuf,
    },
}

/// Execute `esc build`.
pub fn run_build(args: &BuildArgs, config: Option<&Path>) -> Result<u8> {
    let receiver = crate::config::resolve_receiver(args.receiver, config)?;
    let builder = EscrowTxBuilder::new(receiver)?;

    let draft = match &args.command {
        BuildCommand::Start {
            sender,
            lovelace,
            locked,
            amount,
            requested_currency,
            requested_token,
            escrow_out,
        } => {
            let mut value = Value::lovelace(*lovelace);
            if let Some(path) = locked {
                let extra: Value = crate::read_json(path)?;
                value = value + extra;
            }
            let requested = AssetClass::new(
                CurrencySymbol::new(requested_currency)?,
                TokenName::new(requested_token.as_str())?,
            )?;
            let terms = EscrowTerms {
                requested,
                amount: *amount,
            };
            let draft = builder
                .start(sender, value, &terms)
                .context("failed to build start draft")?;
            if let Some(path) = escrow_out {
                let escrow = created_escrow(&builder, &draft)?;
                crate::emit_json(&escrow, Some(path))?;
            }
            draft
        }
        BuildCommand::Cancel { escrow } => {
            let escrow: EscrowUtxo = crate::read_json(escrow)?;
            builder.cancel(&escrow).context("failed to build cancel draft")?
        }
        BuildCommand::Resolve { escrow } => {
            let escrow: EscrowUtxo = crate::read_json(escrow)?;
            builder.resolve(&escrow).context("failed to build resolve draft")?
        }
    };

    tracing::info!(draft = %draft.id, kind = %draft.kind, "draft built");
    crate::emit_json(&draft, args.out.as_deref())?;
    Ok(0)
}

/// The escrow UTXO a start draft creates once confirmed.
pub fn created_escrow(builder: &EscrowTxBuilder, draft: &UnbalancedTxDraft) -> Result<EscrowUtxo> {
    let mut index = MemoryIndex::new();
    index.apply(draft)?;
    find_escrows(&index, builder.script_address())?
        .into_iter()
        .next()
        .context("start draft creates no escrow output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use esc_builder::DraftKind;
    use esc_core::PubKeyHash;

    fn receiver() -> Address {
        Address::PubKey(PubKeyHash::from_bytes([0x4e; 32]))
    }

    fn sender() -> Address {
        Address::PubKey(PubKeyHash::from_bytes([0x5e; 32]))
    }

    fn start_args(out: PathBuf, escrow_out: PathBuf) -> BuildArgs {
        BuildArgs {
            receiver: Some(receiver()),
            out: Some(out),
            command: BuildCommand::Start {
                sender: sender(),
                lovelace: 50,
                locked: None,
                amount: 100,
                requested_currency: String::new(),
                requested_token: String::new(),
                escrow_out: Some(escrow_out),
            },
        }
    }

    #[test]
    fn start_then_cancel_via_files() {
        let dir = tempfile::tempdir().unwrap();
        let start_path = dir.path().join("start.json");
        let escrow_path = dir.path().join("escrow.json");
        assert_eq!(run_build(&start_args(start_path.clone(), escrow_path.clone()), None).unwrap(), 0);

        let start: UnbalancedTxDraft = crate::read_json(&start_path).unwrap();
        assert_eq!(start.kind, DraftKind::Start);
        let escrow: EscrowUtxo = crate::read_json(&escrow_path).unwrap();
        assert_eq!(escrow.out_ref.tx_id, start.tx_id().unwrap());
        assert_eq!(escrow.locked(), Value::lovelace(50));

        let cancel_path = dir.path().join("cancel.json");
        let args = BuildArgs {
            receiver: Some(receiver()),
            out: Some(cancel_path.clone()),
            command: BuildCommand::Cancel {
                escrow: escrow_path,
            },
        };
        assert_eq!(run_build(&args, None).unwrap(), 0);
        let cancel: UnbalancedTxDraft = crate::read_json(&cancel_path).unwrap();
        assert_eq!(cancel.kind, DraftKind::Cancel);
    }

    #[test]
    fn resolve_for_other_receiver_fails() {
        let dir = tempfile::tempdir().unwrap();
        let escrow_path = dir.path().join("escrow.json");
        run_build(&start_args(dir.path().join("start.json"), escrow_path.clone()), None).unwrap();

        let args = BuildArgs {
            receiver: Some(Address::PubKey(PubKeyHash::from_bytes([1; 32]))),
            out: Some(dir.path().join("resolve.json")),
            command: BuildCommand::Resolve {
                escrow: escrow_path,
            },
        };
        assert!(run_build(&args, None).is_err());
    }

    #[test]
    fn start_with_zero_amount_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = start_args(dir.path().join("s.json"), dir.path().join("e.json"));
        if let BuildCommand::Start { amount, .. } = &mut args.command {
            *amount = 0;
        }
        let err = run_build(&args, None).unwrap_err();
        assert!(format!("{err:#}").contains("requested amount must be strictly positive"));
    }
}
