//! # esc-builder: Escrow Transaction Builder
//!
//! Produces unbalanced transaction drafts for starting, cancelling and
//! resolving escrows. A draft is only returned if the minting policy and the
//! escrow validator in `esc-validator` accept its transaction view, so a
//! client cannot be handed a transaction the scripts would refuse.
//!
//! Balancing, fee computation, collateral and submission belong to the
//! wallet. Witnesses can be produced and checked here with `esc-crypto` keys.
//!
//! ## Modules
//!
//! - `builder`: [`EscrowTxBuilder`] and the `build_*` entry points.
//! - `draft`: [`UnbalancedTxDraft`], body digests, witnesses.
//! - `index`: the [`EscrowIndex`] seam and the in-memory [`MemoryIndex`].

pub mod builder;
pub mod draft;
pub mod error;
pub mod index;

pub use builder::{build_cancel, build_resolve, build_start, control_token_name, EscrowTerms, EscrowTxBuilder};
pub use draft::{DraftId, DraftInput, DraftKind, UnbalancedTxDraft, Witness};
pub use error::BuilderError;
pub use index::{find_escrows, EscrowIndex, EscrowUtxo, MemoryIndex};
