//! # esc-validator: Escrow Validation Core
//!
//! Decides whether a candidate transaction may start, cancel, or resolve an
//! escrow. Every decision is a pure function of fixed deployment parameters,
//! the escrow record, the redeemer, and a read-only
//! [`TransactionView`](esc_core::TransactionView).
//!
//! ## Components
//!
//! - **Record** (`record.rs`): the escrow datum and the spend redeemer.
//!
//! - **Reasons** (`reason.rs`): the closed set of rejection reasons and the
//!   `Verdict` type. Every failed check maps to exactly one reason.
//!
//! - **Script** (`script.rs`): derivation of the validator's script address
//!   from its receiver, and of the policy id from that script address.
//!
//! - **Policy** (`policy.rs`): the control-token minting policy. Structural
//!   guarantees about a new escrow (token placement, well-formed record,
//!   sender signature) are enforced here, once, at mint time.
//!
//! - **Validator** (`validator.rs`): the spend validator for `Cancel` and
//!   `Resolve`, including the single-script-input guard against double
//!   satisfaction.
//!
//! - **Lifecycle** (`lifecycle.rs`): `Escrow<Active>` → `Escrow<Closed>`
//!   typestate. An active escrow is only constructible from an accepted mint,
//!   a closed one only from an accepted spend.
//!
//! ## Deployment Parameters
//!
//! The receiver is threaded into [`EscrowValidator::new`] at runtime. Each
//! receiver yields a distinct script address. The control-token asset class
//! is part of the record, so the validator never has to know the policy and
//! the policy only has to know the script address.

pub mod lifecycle;
pub mod policy;
pub mod reason;
pub mod record;
pub mod script;
pub mod validator;

use thiserror::Error;

use esc_core::{Address, CanonicalizationError};

pub use lifecycle::{Active, Closed, DynEscrow, DynEscrowState, Escrow, EscrowState, LifecycleError};
pub use policy::{evaluate_mint, ControlTokenPolicy, MintApproval};
pub use reason::{RejectReason, Verdict};
pub use record::{EscrowRecord, Redeemer};
pub use validator::{evaluate_spend, EscrowValidator, SpendApproval};

/// Errors in deployment parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The validator's receiver must be a key-locked address.
    #[error("receiver {0} is not a public key address")]
    ReceiverNotPubKey(Address),

    /// The minting policy must be parameterized by a script address.
    #[error("policy target {0} is not a script address")]
    PolicyTargetNotScript(Address),

    /// Parameter encoding failed while deriving a script hash.
    #[error("parameter encoding failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
