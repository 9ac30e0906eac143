//! # Ed25519 Signing and Verification
//!
//! Key generation, signing, verification, and key hashing for escrow
//! participants.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes`. A draft body is signed in the
//!   same canonical form that its transaction id is computed from.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does
//!   not implement `Serialize` or expose the private key bytes.
//!
//! ## Key Hashes
//!
//! A participant's on-ledger identity is `sha256(public key bytes)`, wrapped
//! as a [`PubKeyHash`]. It is what the escrow record stores as the sender and
//! what transaction views list as signatories.

use ed25519_dalek::{Signer, Verifier};
use esc_core::digest::sha256_raw;
use esc_core::{hex, Address, CanonicalBytes, CryptoError, PubKeyHash};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-width byte newtype carried on the wire as lowercase hex.
macro_rules! hex_bytes {
    ($(#[$meta:meta])* $name:ident, $len:literal, $what:literal, $err:path) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Wrap raw bytes.
            pub fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// The raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Lowercase hex.
            pub fn to_hex(&self) -> String {
                hex::encode(&self.0)
            }

            /// Parse from hex of exactly the right width.
            pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
                hex::decode_array::<$len>(s)
                    .map(Self)
                    .map_err(|e| $err(format!(concat!($what, ": {}"), e)))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({}...)"), hex::prefix(&self.0))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }
    };
}

hex_bytes!(
    /// A participant's Ed25519 verifying key.
    Ed25519PublicKey,
    32,
    "public key",
    CryptoError::KeyError
);

hex_bytes!(
    /// An Ed25519 signature over a draft body.
    Ed25519Signature,
    64,
    "signature",
    CryptoError::VerificationFailed
);

/// A signer. Holds the private key, so it is neither `Serialize` nor
/// `Clone`, and its `Debug` prints nothing secret.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519PublicKey {
    /// Decompress into a dalek verifying key. Fails for bytes that are not a
    /// curve point.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("not an Ed25519 point: {e}")))
    }

    /// The hash under which this key appears as a signatory.
    pub fn key_hash(&self) -> PubKeyHash {
        PubKeyHash::from(sha256_raw(&self.0))
    }

    /// The key-locked address owned by this key.
    pub fn address(&self) -> Address {
        Address::PubKey(self.key_hash())
    }
}

// ─── Key Pairs ───────────────────────────────────────────────────────

impl Ed25519KeyPair {
    /// Fresh key pair from the OS RNG.
    pub fn generate() -> Self {
        Self::from_seed(&random_seed())
    }

    /// Key pair for a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Key pair for a hex seed, as `esc keygen` writes it.
    pub fn from_seed_hex(s: &str) -> Result<Self, CryptoError> {
        let seed = hex::decode_array::<32>(s)
            .map_err(|e| CryptoError::KeyError(format!("seed: {e}")))?;
        Ok(Self::from_seed(&seed))
    }

    /// The verifying half.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Shorthand for `self.public_key().key_hash()`.
    pub fn key_hash(&self) -> PubKeyHash {
        self.public_key().key_hash()
    }

    /// Sign canonical bytes. Deterministic per (key, message).
    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

/// Draw a fresh 32-byte seed from the operating system RNG.
pub fn random_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut seed);
    seed
}

// ─── Verification ────────────────────────────────────────────────────

/// Check `signature` over `data` against a dalek key.
pub fn verify(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    verifying_key: &ed25519_dalek::VerifyingKey,
) -> Result<(), CryptoError> {
    verifying_key
        .verify(data.as_bytes(), &ed25519_dalek::Signature::from_bytes(&signature.0))
        .map_err(|e| CryptoError::VerificationFailed(format!("bad signature: {e}")))
}

/// [`verify`] for a wire-format public key.
pub fn verify_with_public_key(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    verify(data, signature, &public_key.to_verifying_key()?)
}
