//! # Rejection Reasons
//!
//! The closed set of reasons a candidate transaction can be refused for.
//! Reasons carry no payload: they are stable, enumerable codes suitable for
//! logs and telemetry. The `code()` strings and the serde names are the same
//! `SCREAMING_SNAKE_CASE` text and must not change once deployed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the minting policy or the escrow validator refused a transaction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    // ── Minting policy ──────────────────────────────────────────────
    /// The mint field does not hold exactly one asset class.
    #[error("mint field must hold exactly one asset class")]
    MultiAssetMint,

    /// The minted quantity is neither 1 nor -1.
    #[error("minted quantity must be 1 (start) or -1 (close)")]
    InvalidMintAmount,

    /// No output pays to the escrow script address.
    #[error("no output pays to the escrow script address")]
    NoScriptOutput,

    /// More than one output pays to the escrow script address.
    #[error("more than one output pays to the escrow script address")]
    MultipleScriptOutputs,

    /// The escrow output does not hold exactly one control token.
    #[error("escrow output must hold exactly one control token")]
    TokenNotPaid,

    /// The escrow output holds a negative quantity of some asset.
    #[error("escrow output value must not hold negative quantities")]
    NegativeValue,

    /// The escrow output carries no record.
    #[error("escrow output carries no record")]
    MissingRecord,

    /// The escrow output's record could not be decoded.
    #[error("escrow record could not be decoded")]
    MalformedRecord,

    /// The start transaction is not signed by the record's sender.
    #[error("start must be signed by the record's sender")]
    WrongSigner,

    /// The record asks for a zero or negative amount.
    #[error("requested amount must be strictly positive")]
    NonPositiveAmount,

    /// The record names a control token other than the one minted.
    #[error("record's control token differs from the minted asset class")]
    AssetClassMismatch,

    // ── Shared ──────────────────────────────────────────────────────
    /// The transaction does not carry exactly one signatory.
    #[error("transaction must carry exactly one signatory")]
    NoSingleSigner,

    // ── Escrow validator ────────────────────────────────────────────
    /// The transaction does not spend exactly one escrow script input.
    #[error("transaction must spend exactly one escrow script input")]
    MultipleScriptInputs,

    /// The record's control token is not burned with quantity -1.
    #[error("control token must be burned with quantity -1")]
    TokenNotBurned,

    /// A cancel is not signed by the record's sender.
    #[error("cancel must be signed by the record's sender")]
    WrongSenderSignature,

    /// A resolve is not signed by the receiver.
    #[error("resolve must be signed by the receiver")]
    WrongReceiverSignature,

    /// A resolve pays the sender less than the record demands.
    #[error("sender is paid less than the record demands")]
    UnderpaidSender,

    /// A resolve pays the receiver less than the escrowed value.
    #[error("receiver is paid less than the escrowed value")]
    UnderpaidReceiver,
}

impl RejectReason {
    /// Every reason, in declaration order.
    pub const ALL: [RejectReason; 18] = [
        Self::MultiAssetMint,
        Self::InvalidMintAmount,
        Self::NoScriptOutput,
        Self::MultipleScriptOutputs,
        Self::TokenNotPaid,
        Self::NegativeValue,
        Self::MissingRecord,
        Self::MalformedRecord,
        Self::WrongSigner,
        Self::NonPositiveAmount,
        Self::AssetClassMismatch,
        Self::NoSingleSigner,
        Self::MultipleScriptInputs,
        Self::TokenNotBurned,
        Self::WrongSenderSignature,
        Self::WrongReceiverSignature,
        Self::UnderpaidSender,
        Self::UnderpaidReceiver,
    ];

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MultiAssetMint => "MULTI_ASSET_MINT",
            Self::InvalidMintAmount => "INVALID_MINT_AMOUNT",
            Self::NoScriptOutput => "NO_SCRIPT_OUTPUT",
            Self::MultipleScriptOutputs => "MULTIPLE_SCRIPT_OUTPUTS",
            Self::TokenNotPaid => "TOKEN_NOT_PAID",
            Self::NegativeValue => "NEGATIVE_VALUE",
            Self::MissingRecord => "MISSING_RECORD",
            Self::MalformedRecord => "MALFORMED_RECORD",
            Self::WrongSigner => "WRONG_SIGNER",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::AssetClassMismatch => "ASSET_CLASS_MISMATCH",
            Self::NoSingleSigner => "NO_SINGLE_SIGNER",
            Self::MultipleScriptInputs => "MULTIPLE_SCRIPT_INPUTS",
            Self::TokenNotBurned => "TOKEN_NOT_BURNED",
            Self::WrongSenderSignature => "WRONG_SENDER_SIGNATURE",
            Self::WrongReceiverSignature => "WRONG_RECEIVER_SIGNATURE",
            Self::UnderpaidSender => "UNDERPAID_SENDER",
            Self::UnderpaidReceiver => "UNDERPAID_RECEIVER",
        }
    }
}

/// Outcome of evaluating a candidate transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The transaction is legitimate.
    Accept,
    /// The transaction is refused.
    Reject(RejectReason),
}

impl Verdict {
    /// Whether the transaction was accepted.
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Accept => None,
            Self::Reject(r) => Some(*r),
        }
    }

    /// `Ok(())` on accept, `Err(reason)` on reject.
    pub fn into_result(self) -> Result<(), RejectReason> {
        match self {
            Self::Accept => Ok(()),
            Self::Reject(r) => Err(r),
        }
    }
}

impl<T> From<Result<T, RejectReason>> for Verdict {
    fn from(result: Result<T, RejectReason>) -> Self {
        match result {
            Ok(_) => Self::Accept,
            Err(reason) => Self::Reject(reason),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accept => f.write_str("ACCEPT"),
            Self::Reject(r) => write!(f, "REJECT {}", r.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = RejectReason::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes.len(), RejectReason::ALL.len());
    }

    #[test]
    fn test_serde_name_matches_code() {
        for reason in RejectReason::ALL {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.code()));
            let back: RejectReason = serde_json::from_str(&json).unwrap();
            assert_eq!(back, reason);
        }
    }

    #[test]
    fn test_verdict_serde_shape() {
        let json = serde_json::to_value(Verdict::Reject(RejectReason::UnderpaidSender)).unwrap();
        assert_eq!(json, serde_json::json!({"verdict": "REJECT", "reason": "UNDERPAID_SENDER"}));
        let json = serde_json::to_value(Verdict::Accept).unwrap();
        assert_eq!(json, serde_json::json!({"verdict": "ACCEPT"}));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Accept.to_string(), "ACCEPT");
        assert_eq!(
            Verdict::Reject(RejectReason::TokenNotBurned).to_string(),
            "REJECT TOKEN_NOT_BURNED"
        );
    }

    #[test]
    fn test_verdict_from_result() {
        let ok: Result<u8, RejectReason> = Ok(1);
        assert_eq!(Verdict::from(ok), Verdict::Accept);
        let err: Result<u8, RejectReason> = Err(RejectReason::WrongSigner);
        let v = Verdict::from(err);
        assert_eq!(v.reason(), Some(RejectReason::WrongSigner));
        assert_eq!(v.into_result(), Err(RejectReason::WrongSigner));
    }
}
