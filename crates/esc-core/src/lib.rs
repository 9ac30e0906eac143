//! # esc-core: Foundational Types for the Escrow Stack
//!
//! This crate is the leaf of the Escrow Stack dependency graph. It defines
//! the ledger vocabulary every other crate speaks: hashes and addresses,
//! asset classes, multi-asset values, canonical record bytes, and the
//! read-only transaction view that the minting policy and the escrow
//! validator evaluate.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for hashes.** `PubKeyHash`, `ScriptHash`, `TxId` are
//!    distinct types. A script hash cannot be passed where a key hash is
//!    expected.
//!
//! 2. **Records only through `CanonicalBytes`.** A [`Datum`] is built from
//!    `CanonicalBytes::new()`, so the same record always attaches as the same
//!    bytes, whoever encodes it.
//!
//! 3. **Normalized values.** A [`Value`] never stores a zero quantity, so
//!    structural equality is value equality.
//!
//! 4. **One set of ledger primitives.** `single_output_at`,
//!    `single_minted_asset`, `Value::value_of` and `Value::covers` live here
//!    and nowhere else, so the policy and the validator cannot drift apart.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `esc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod hex;
pub mod identity;
pub mod ledger;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, sha256_raw, ContentDigest};
pub use error::{CanonicalizationError, CryptoError, EscError, IdentifierError, LedgerError};
pub use identity::{Address, PubKeyHash, ScriptHash, TxId, TxOutRef};
pub use ledger::{single_indexed_output_at, single_minted_asset, single_output_at, Datum, TransactionView, TxInInfo, TxOut};
pub use temporal::Timestamp;
pub use value::{AssetClass, CurrencySymbol, TokenName, Value};
