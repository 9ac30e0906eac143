//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout the Escrow Stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Ledger lookup failures carry the address or count that made the lookup
//!   ambiguous, so a rejected transaction can be diagnosed from the log alone.
//! - Identifier errors name the offending input.
//! - None of these types is used to express a validation verdict. Rejections
//!   are values in `esc-validator`; these errors describe malformed input.

use thiserror::Error;

/// Top-level error type for the Escrow Stack.
#[derive(Error, Debug)]
pub enum EscError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// An identifier, hash, or asset name failed validation.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// A ledger lookup found zero or several candidates where one was required.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// A timestamp could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Quantities must be integers.
    #[error("float values are not permitted in canonical representations; use an integer quantity: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing or constructing an identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Input was not valid lowercase or uppercase hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length did not match the identifier width.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required byte length.
        expected: usize,
        /// Byte length actually decoded.
        actual: usize,
    },

    /// Token names are limited to 32 bytes.
    #[error("token name is {0} bytes, maximum is 32")]
    TokenNameTooLong(usize),

    /// The (currency symbol, token name) pair is not a valid asset class.
    #[error("invalid asset class: {0}")]
    InvalidAssetClass(String),

    /// Address text did not start with `pkh:` or `script:`.
    #[error("unrecognized address {0:?}; expected pkh:<hex> or script:<hex>")]
    UnknownAddressForm(String),

    /// Out-reference text was not of the form `<txid>#<index>`.
    #[error("invalid output reference {0:?}; expected <txid>#<index>")]
    InvalidOutRef(String),
}

/// Error from a single-candidate ledger lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// More than one output pays to the address.
    #[error("{count} outputs pay to {address}, expected exactly one")]
    MultipleOutputs {
        /// Address that was looked up.
        address: String,
        /// Number of matching outputs.
        count: usize,
    },

    /// No output pays to the address.
    #[error("no output pays to {address}")]
    NoOutput {
        /// Address that was looked up.
        address: String,
    },

    /// The mint field holds more than one distinct asset class.
    #[error("mint field holds {count} asset classes, expected exactly one")]
    MultipleAssetsMinted {
        /// Number of distinct asset classes minted or burned.
        count: usize,
    },

    /// The mint field is empty.
    #[error("mint field is empty")]
    NothingMinted,

    /// The transaction does not carry exactly one signatory.
    #[error("transaction carries {count} signatories, expected exactly one")]
    NoSingleSigner {
        /// Number of signatories present.
        count: usize,
    },

    /// Record bytes attached to an output could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),
}
