//! # Validate Subcommand
//!
//! Runs the minting policy or the escrow validator against a transaction
//! view offline. The view comes from a `TransactionView` JSON file or is
//! derived from a draft. The verdict is printed and mapped to the exit code.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use esc_builder::UnbalancedTxDraft;
use esc_core::{Address, TransactionView};
use esc_validator::{ControlTokenPolicy, EscrowRecord, EscrowValidator, Redeemer, RejectReason, Verdict};

/// Arguments for `esc validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Receiver address (`pkh:<hex>`). Overrides the deployment file.
    #[arg(long, global = true)]
    pub receiver: Option<Address>,

    /// Print the verdict as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: ValidateCommand,
}

/// Which script to run.
#[derive(Subcommand, Debug)]
pub enum ValidateCommand {
    /// Run the control-token minting policy.
    Mint {
        #[command(flatten)]
        source: ViewSource,
        /// Script address the policy is parameterized by. Defaults to the
        /// receiver's escrow script.
        #[arg(long)]
        script: Option<Address>,
    },

    /// Run the escrow validator for the escrow input.
    Spend {
        #[command(flatten)]
        source: ViewSource,
        /// Redeemer. Taken from the draft's escrow input if omitted.
        #[arg(long, value_enum)]
        redeemer: Option<RedeemerArg>,
        /// Escrow record JSON. Decoded from the escrow input's datum if omitted.
        #[arg(long)]
        record: Option<PathBuf>,
    },
}

/// Where the transaction view comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ViewSource {
    /// Transaction view JSON file.
    #[arg(long)]
    pub view: Option<PathBuf>,
    /// Draft JSON file; its view assumes the required signers sign.
    #[arg(long)]
    pub draft: Option<PathBuf>,
}

/// Redeemer as a command-line value.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemerArg {
    Cancel,
    Resolve,
}

impl From<RedeemerArg> for Redeemer {
    fn from(arg: RedeemerArg) -> Self {
        match arg {
            RedeemerArg::Cancel => Redeemer::Cancel,
            RedeemerArg::Resolve => Redeemer::Resolve,
        }
    }
}

struct LoadedView {
    view: TransactionView,
    redeemer: Option<Redeemer>,
}

impl ViewSource {
    fn load(&self) -> Result<LoadedView> {
        match (&self.view, &self.draft) {
            (Some(path), _) => Ok(LoadedView {
                view: crate::read_json(path)?,
                redeemer: None,
            }),
            (None, Some(path)) => {
                let draft: UnbalancedTxDraft = crate::read_json(path)?;
                Ok(LoadedView {
                    view: draft.view(),
                    redeemer: draft.inputs.iter().find_map(|input| input.redeemer),
                })
            }
            (None, None) => bail!("pass --view or --draft"),
        }
    }
}

/// Execute `esc validate`.
pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<u8> {
    let verdict = match &args.command {
        ValidateCommand::Mint { source, script } => {
            let script = match script {
                Some(address) => *address,
                None => {
                    let receiver = crate::config::resolve_receiver(args.receiver, config)?;
                    *EscrowValidator::new(receiver)?.script_address()
                }
            };
            let loaded = source.load()?;
            ControlTokenPolicy::new(script)?.evaluate(&loaded.view)
        }
        ValidateCommand::Spend {
            source,
            redeemer,
            record,
        } => {
            let receiver = crate::config::resolve_receiver(args.receiver, config)?;
            let validator = EscrowValidator::new(receiver)?;
            let loaded = source.load()?;
            let redeemer = match redeemer.map(Redeemer::from).or(loaded.redeemer) {
                Some(r) => r,
                None => bail!("no redeemer: pass --redeemer cancel|resolve"),
            };
            let record = match record {
                Some(path) => Ok(crate::read_json(path)?),
                None => record_from_view(&validator, &loaded.view)?,
            };
            match record {
                Ok(record) => validator.evaluate(&record, redeemer, &loaded.view),
                Err(reason) => Verdict::Reject(reason),
            }
        }
    };

    report(&verdict, args.json)?;
    Ok(exit_code(&verdict))
}

/// Decode the record carried by the view's escrow input. A missing or
/// undecodable datum is a verdict, not an input error.
fn record_from_view(
    validator: &EscrowValidator,
    view: &TransactionView,
) -> Result<Result<EscrowRecord, RejectReason>> {
    let input = view
        .inputs_at(validator.script_address())
        .next()
        .context("view spends no escrow input; pass --record")?;
    let Some(datum) = input.resolved.datum.as_ref() else {
        tracing::warn!(utxo = %input.out_ref, "escrow input carries no record");
        return Ok(Err(RejectReason::MissingRecord));
    };
    Ok(EscrowRecord::from_datum(datum).map_err(|e| {
        tracing::warn!(utxo = %input.out_ref, error = %e, "escrow input record is undecodable");
        RejectReason::MalformedRecord
    }))
}

fn report(verdict: &Verdict, json: bool) -> Result<()> {
    if json {
        crate::emit_json(verdict, None)
    } else {
        println!("{verdict}");
        if let Some(reason) = verdict.reason() {
            println!("  {reason}");
        }
        Ok(())
    }
}

/// 0 for accept, 1 for reject.
pub fn exit_code(verdict: &Verdict) -> u8 {
    if verdict.is_accept() {
        0
    } else {
        1
    }
}
