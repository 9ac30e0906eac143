//! # Keygen Subcommand
//!
//! Generates an Ed25519 key pair. The seed is printed (or written to
//! `<prefix>.key`) as hex; the public key and `pkh:` address alongside it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use esc_core::hex;
use esc_crypto::{random_seed, Ed25519KeyPair};

/// Arguments for `esc keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Write `<prefix>.key` and `<prefix>.pub` into this directory instead of
    /// printing the seed.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Filename prefix for written keys.
    #[arg(long, default_value = "esc")]
    pub prefix: String,
}

/// Execute `esc keygen`.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let seed = random_seed();
    let keypair = Ed25519KeyPair::from_seed(&seed);
    let public_key = keypair.public_key();
    let seed_hex = hex::encode(&seed);

    match &args.output {
        Some(dir) => {
            let (key_path, pub_path) = write_keys(dir, &args.prefix, &seed_hex, &public_key.to_hex())?;
            println!("OK: generated Ed25519 keypair");
            println!("  Private key: {}", key_path.display());
            println!("  Public key:  {}", pub_path.display());
        }
        None => println!("seed:       {seed_hex}"),
    }
    println!("public key: {public_key}");
    println!("address:    {}", public_key.address());

    tracing::debug!(address = %public_key.address(), "generated key pair");
    Ok(0)
}

fn write_keys(dir: &Path, prefix: &str, seed_hex: &str, pub_hex: &str) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    let key_path = dir.join(format!("{prefix}.key"));
    let pub_path = dir.join(format!("{prefix}.pub"));
    std::fs::write(&key_path, seed_hex)
        .with_context(|| format!("failed to write private key: {}", key_path.display()))?;
    std::fs::write(&pub_path, pub_hex)
        .with_context(|| format!("failed to write public key: {}", pub_path.display()))?;
    Ok((key_path, pub_path))
}

/// Load a key pair from a file holding a hex seed.
pub fn load_keypair(path: &Path) -> Result<Ed25519KeyPair> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read private key: {}", path.display()))?;
    Ed25519KeyPair::from_seed_hex(text.trim())
        .with_context(|| format!("invalid private key: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keygen_writes_loadable_keys() {
        let dir = tempfile::tempdir().unwrap();
        let args = KeygenArgs {
            output: Some(dir.path().to_path_buf()),
            prefix: "alice".into(),
        };
        assert_eq!(run_keygen(&args).unwrap(), 0);

        let seed = std::fs::read_to_string(dir.path().join("alice.key")).unwrap();
        assert_eq!(seed.len(), 64);
        let kp = load_keypair(&dir.path().join("alice.key")).unwrap();
        let pub_hex = std::fs::read_to_string(dir.path().join("alice.pub")).unwrap();
        assert_eq!(kp.public_key().to_hex(), pub_hex);
    }

    #[test]
    fn load_keypair_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.key");
        std::fs::write(&path, "not hex").unwrap();
        assert!(load_keypair(&path).is_err());
    }
}
