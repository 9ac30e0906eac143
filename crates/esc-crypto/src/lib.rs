//! # esc-crypto: Signer Identities
//!
//! Ed25519 key pairs and signatures for the Escrow Stack, plus the mapping
//! from a public key to the [`PubKeyHash`](esc_core::PubKeyHash) that
//! transaction views list as signatories.
//!
//! Signature verification itself is delegated to `ed25519-dalek`; this crate
//! only fixes what is signed (`CanonicalBytes`) and how keys are named.
//!
//! ## Crate Policy
//!
//! - Depends only on `esc-core` internally.
//! - No mocking of cryptographic operations in tests.

pub mod ed25519;

pub use ed25519::{
    random_seed, verify, verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
};
