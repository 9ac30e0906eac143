//! # Script Hash Derivation
//!
//! Both scripts are parameterized, and a parameterized script's hash commits
//! to its parameter. The validator's hash is derived from the receiver, so
//! every receiver gets its own script address. The policy's hash (its
//! currency symbol) is derived from the validator's script address.
//!
//! ```text
//! receiver ──▶ validator hash ──▶ script address ──▶ policy id
//! ```
//!
//! Each derivation hashes the canonical JSON of `{"purpose": …, <param>: …}`.
//! The purpose string keeps the two hash domains apart.

use serde::Serialize;

use esc_core::{sha256_digest, Address, CanonicalBytes, CanonicalizationError, ScriptHash};

const VALIDATOR_PURPOSE: &str = "escrow-validator";
const POLICY_PURPOSE: &str = "control-token-policy";

#[derive(Serialize)]
struct ValidatorParams<'a> {
    purpose: &'static str,
    receiver: &'a Address,
}

#[derive(Serialize)]
struct PolicyParams<'a> {
    purpose: &'static str,
    script: &'a Address,
}

/// Hash of the escrow validator instantiated for `receiver`.
pub fn validator_script_hash(receiver: &Address) -> Result<ScriptHash, CanonicalizationError> {
    let bytes = CanonicalBytes::new(&ValidatorParams {
        purpose: VALIDATOR_PURPOSE,
        receiver,
    })?;
    Ok(ScriptHash::from(sha256_digest(&bytes)))
}

/// Script address of the escrow validator instantiated for `receiver`.
pub fn validator_address(receiver: &Address) -> Result<Address, CanonicalizationError> {
    validator_script_hash(receiver).map(Address::Script)
}

/// Hash of the control-token policy instantiated for `script_address`.
pub fn policy_script_hash(script_address: &Address) -> Result<ScriptHash, CanonicalizationError> {
    let bytes = CanonicalBytes::new(&PolicyParams {
        purpose: POLICY_PURPOSE,
        script: script_address,
    })?;
    Ok(ScriptHash::from(sha256_digest(&bytes)))
}
