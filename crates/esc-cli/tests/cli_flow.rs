//! End-to-end command flow through the handler functions: config file,
//! start, sign, validate, resolve.

use std::path::Path;

use esc_builder::{EscrowUtxo, UnbalancedTxDraft, Witness};
use esc_cli::build::{run_build, BuildArgs, BuildCommand};
use esc_cli::sign::{run_sign, SignArgs};
use esc_cli::validate::{run_validate, ValidateArgs, ValidateCommand, ViewSource};
use esc_core::hex;
use esc_crypto::Ed25519KeyPair;

fn write_key(dir: &Path, name: &str, seed: [u8; 32]) -> (std::path::PathBuf, Ed25519KeyPair) {
    let path = dir.join(format!("{name}.key"));
    std::fs::write(&path, hex::encode(&seed)).unwrap();
    (path, Ed25519KeyPair::from_seed(&seed))
}

fn draft_source(path: &Path) -> ViewSource {
    ViewSource {
        view: None,
        draft: Some(path.to_path_buf()),
    }
}

#[test]
fn start_sign_validate_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let (sender_key, sender) = write_key(dir.path(), "sender", [1; 32]);
    let (receiver_key, receiver) = write_key(dir.path(), "receiver", [2; 32]);

    let config = dir.path().join("deploy.yaml");
    std::fs::write(&config, format!("receiver: {}\nnetwork: preview\n", receiver.public_key().address())).unwrap();

    // Start, receiver taken from the config file.
    let start = dir.path().join("start.json");
    let escrow = dir.path().join("escrow.json");
    let args = BuildArgs {
        receiver: None,
        out: Some(start.clone()),
        command: BuildCommand::Start {
            sender: sender.public_key().address(),
            lovelace: 2_000_000,
            locked: None,
            amount: 150,
            requested_currency: String::new(),
            requested_token: String::new(),
            escrow_out: Some(escrow.clone()),
        },
    };
    assert_eq!(run_build(&args, Some(&config)).unwrap(), 0);

    let witness = dir.path().join("start.witness.json");
    let sign = SignArgs {
        key: sender_key,
        draft: start.clone(),
        out: Some(witness.clone()),
    };
    assert_eq!(run_sign(&sign).unwrap(), 0);
    let draft: UnbalancedTxDraft = esc_cli::read_json(&start).unwrap();
    let witness: Witness = esc_cli::read_json(&witness).unwrap();
    draft.verify_witness(&witness).unwrap();

    let validate = ValidateArgs {
        receiver: None,
        json: true,
        command: ValidateCommand::Mint {
            source: draft_source(&start),
            script: None,
        },
    };
    assert_eq!(run_validate(&validate, Some(&config)).unwrap(), 0);

    // Resolve by the receiver.
    let utxo: EscrowUtxo = esc_cli::read_json(&escrow).unwrap();
    assert_eq!(utxo.record.amount, 150);
    let resolve = dir.path().join("resolve.json");
    let args = BuildArgs {
        receiver: None,
        out: Some(resolve.clone()),
        command: BuildCommand::Resolve { escrow },
    };
    assert_eq!(run_build(&args, Some(&config)).unwrap(), 0);

    let validate = ValidateArgs {
        receiver: None,
        json: false,
        command: ValidateCommand::Spend {
            source: draft_source(&resolve),
            redeemer: None,
            record: None,
        },
    };
    assert_eq!(run_validate(&validate, Some(&config)).unwrap(), 0);

    // The sender cannot sign the resolve.
    let sign = SignArgs {
        key: dir.path().join("sender.key"),
        draft: resolve.clone(),
        out: None,
    };
    assert!(run_sign(&sign).is_err());
    let sign = SignArgs {
        key: receiver_key,
        draft: resolve,
        out: None,
    };
    assert_eq!(run_sign(&sign).unwrap(), 0);
}

#[test]
fn missing_receiver_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let draft = dir.path().join("nothing.json");
    let validate = ValidateArgs {
        receiver: None,
        json: false,
        command: ValidateCommand::Mint {
            source: draft_source(&draft),
            script: None,
        },
    };
    // No --config and (in tests) no ESC_CONFIG.
    if std::env::var_os(esc_cli::config::CONFIG_ENV).is_none() {
        let err = run_validate(&validate, None).unwrap_err();
        assert!(format!("{err:#}").contains("no receiver"));
    }
}
