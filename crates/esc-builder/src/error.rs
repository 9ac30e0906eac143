//! Builder errors.

use thiserror::Error;

use esc_core::{CanonicalizationError, CryptoError, IdentifierError, PubKeyHash, TxOutRef};
use esc_validator::{ConfigError, RejectReason};

/// Errors from building, signing, or indexing escrow drafts.
#[derive(Error, Debug)]
pub enum BuilderError {
    /// The requested terms cannot describe an escrow.
    #[error("invalid escrow terms: {0}")]
    InvalidTerms(String),

    /// The UTXO does not sit at this builder's script address.
    #[error("{0} is not an escrow of this validator")]
    NotAnEscrow(TxOutRef),

    /// The draft fails its own policy or validator check.
    #[error("draft rejected: {0}")]
    Rejected(#[from] RejectReason),

    /// A witness was produced by a key the draft does not require.
    #[error("signer {0} is not a required signer of this draft")]
    UnexpectedSigner(PubKeyHash),

    /// An index lookup failed.
    #[error("index error: {0}")]
    Index(String),

    /// Deployment parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Record or body encoding failed.
    #[error("encoding error: {0}")]
    Encoding(#[from] CanonicalizationError),

    /// A derived identifier was invalid.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// Witness verification failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
