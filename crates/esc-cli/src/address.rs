//! # Address Subcommand
//!
//! Prints the escrow script address and control-token policy id for a
//! receiver.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use esc_core::Address;
use esc_validator::EscrowValidator;

/// Arguments for `esc address`.
#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Receiver address (`pkh:<hex>`). Overrides the deployment file.
    #[arg(long)]
    pub receiver: Option<Address>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Derived deployment addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentAddresses {
    /// Receiver the validator is instantiated for.
    pub receiver: Address,
    /// Escrow script address.
    pub script_address: Address,
    /// Currency symbol of the control tokens.
    pub policy_id: String,
}

/// Derive the deployment addresses for `receiver`.
pub fn derive(receiver: Address) -> Result<DeploymentAddresses> {
    let validator = EscrowValidator::new(receiver)?;
    Ok(DeploymentAddresses {
        receiver,
        script_address: *validator.script_address(),
        policy_id: validator.minting_policy().currency_symbol().as_str().to_string(),
    })
}

/// Execute `esc address`.
pub fn run_address(args: &AddressArgs, config: Option<&Path>) -> Result<u8> {
    let receiver = crate::config::resolve_receiver(args.receiver, config)?;
    let addresses = derive(receiver)?;
    if args.json {
        crate::emit_json(&addresses, None)?;
    } else {
        println!("receiver:       {}", addresses.receiver);
        println!("script address: {}", addresses.script_address);
        println!("policy id:      {}", addresses.policy_id);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esc_core::{PubKeyHash, ScriptHash};

    #[test]
    fn derive_is_stable_per_receiver() {
        let r = Address::PubKey(PubKeyHash::from_bytes([3; 32]));
        let a = derive(r).unwrap();
        assert_eq!(a, derive(r).unwrap());
        assert!(a.script_address.is_script());
        assert_eq!(a.policy_id.len(), 64);
    }

    #[test]
    fn script_receiver_is_refused() {
        assert!(derive(Address::Script(ScriptHash::from_bytes([3; 32]))).is_err());
    }
}
