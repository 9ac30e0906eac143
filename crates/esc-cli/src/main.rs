//! # esc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Logs go to stderr so JSON on stdout stays machine-readable.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use esc_cli::address::{run_address, AddressArgs};
use esc_cli::build::{run_build, BuildArgs};
use esc_cli::keygen::{run_keygen, KeygenArgs};
use esc_cli::sign::{run_sign, SignArgs};
use esc_cli::validate::{run_validate, ValidateArgs};

/// Exit status for errors that are not a verdict (bad input, I/O).
const EXIT_ERROR: u8 = 2;

/// Escrow stack CLI.
///
/// Derives deployment addresses, builds and signs unbalanced escrow drafts,
/// and checks transaction views against the minting policy and the escrow
/// validator.
#[derive(Parser, Debug)]
#[command(name = "esc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the deployment config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 key pair.
    Keygen(KeygenArgs),

    /// Print the escrow script address and control-token policy id.
    Address(AddressArgs),

    /// Build an unbalanced start, cancel or resolve draft.
    Build(BuildArgs),

    /// Sign a draft with a required signer's key.
    Sign(SignArgs),

    /// Check a transaction view against the policy or the validator.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "esc CLI starting");

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::Address(args) => run_address(&args, config),
        Commands::Build(args) => run_build(&args, config),
        Commands::Sign(args) => run_sign(&args),
        Commands::Validate(args) => run_validate(&args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
