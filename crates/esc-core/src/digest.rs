//! # Digests
//!
//! Every identifier in the stack is a SHA-256 digest: script hashes, policy
//! ids, transaction ids, public key hashes and control-token names. Structured
//! preimages go through [`sha256_digest`], which only accepts
//! [`CanonicalBytes`], so two machines deriving a script address from the same
//! receiver get the same address. [`sha256_raw`] is for fixed-width key
//! material only.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 digest, before it is wrapped in a typed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// The digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        crate::hex::encode(&self.0)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Digest of a canonical preimage.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    sha256_raw(data.as_bytes())
}

/// Hex digest of a canonical preimage.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Digest of raw key material. Structured data goes through
/// [`sha256_digest()`].
pub fn sha256_raw(data: &[u8]) -> ContentDigest {
    ContentDigest(Sha256::digest(data).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Determinism ─────────────────────────────────────────────────

    #[test]
    fn test_same_receiver_same_digest() {
        let a = CanonicalBytes::new(&serde_json::json!({"receiver": "pkh:00"})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"receiver": "pkh:00"})).unwrap();
        assert_eq!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let a = CanonicalBytes::new(&serde_json::json!({"purpose": "p", "receiver": "r"})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"receiver": "r", "purpose": "p"})).unwrap();
        assert_eq!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn test_different_receivers_differ() {
        let a = CanonicalBytes::new(&serde_json::json!({"receiver": "pkh:00"})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"receiver": "pkh:01"})).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&b));
    }

    // ─── Encoding ────────────────────────────────────────────────────

    #[test]
    fn test_known_vector_and_display() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        let expected = "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a";
        assert_eq!(sha256_hex(&cb), expected);
        assert_eq!(sha256_raw(b"{}").to_string(), expected);
    }
}
