//! # Ledger Identity Newtypes
//!
//! Newtype wrappers for the hashes and addresses of the escrow ledger model.
//! These prevent accidental identifier confusion: a `ScriptHash` cannot be
//! passed where a `PubKeyHash` is expected, and an [`Address`] always says
//! which of the two it wraps.
//!
//! ## Textual Forms
//!
//! - Hashes render as 64 lowercase hex characters.
//! - Addresses render as `pkh:<hex>` or `script:<hex>`.
//! - Output references render as `<txid>#<index>`.
//!
//! All of them serialize as those strings, so they are usable as JSON map keys.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::ContentDigest;
use crate::error::IdentifierError;
use crate::hex;

/// Defines a 32-byte hash newtype with hex `Display`, `FromStr` and serde.
macro_rules! hash_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Wrap raw 32 bytes.
            pub fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Return the raw 32 bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Render as lowercase hex.
            pub fn to_hex(&self) -> String {
                hex::encode(&self.0)
            }

            /// Parse from a 64-character hex string.
            pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
                hex::decode_array::<32>(s).map(Self)
            }
        }

        impl From<ContentDigest> for $name {
            fn from(digest: ContentDigest) -> Self {
                Self(*digest.as_bytes())
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}...)", stringify!($name), hex::prefix(&self.0))
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
    };
}

hash_newtype!(
    /// Hash of an Ed25519 public key. Identifies a signer.
    PubKeyHash
);

hash_newtype!(
    /// Hash of a script and its fixed parameters. Identifies a script address
    /// or, for a minting policy, a currency symbol.
    ScriptHash
);

hash_newtype!(
    /// Identifier of a transaction (digest of its canonical body).
    TxId
);

// ─── Address ─────────────────────────────────────────────────────────

/// A payment destination: either a key-locked or a script-locked address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Address {
    /// Spendable by the holder of the key hashing to this value.
    PubKey(PubKeyHash),
    /// Spendable only under the script hashing to this value.
    Script(ScriptHash),
}

impl Address {
    /// The key hash behind a key-locked address, `None` for a script address.
    pub fn pub_key_hash(&self) -> Option<&PubKeyHash> {
        match self {
            Self::PubKey(pkh) => Some(pkh),
            Self::Script(_) => None,
        }
    }

    /// The script hash behind a script address, `None` for a key address.
    pub fn script_hash(&self) -> Option<&ScriptHash> {
        match self {
            Self::Script(h) => Some(h),
            Self::PubKey(_) => None,
        }
    }

    /// Whether this address is locked by a script.
    pub fn is_script(&self) -> bool {
        matches!(self, Self::Script(_))
    }
}

impl From<PubKeyHash> for Address {
    fn from(pkh: PubKeyHash) -> Self {
        Self::PubKey(pkh)
    }
}

impl From<ScriptHash> for Address {
    fn from(h: ScriptHash) -> Self {
        Self::Script(h)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PubKey(pkh) => write!(f, "pkh:{pkh}"),
            Self::Script(h) => write!(f, "script:{h}"),
        }
    }
}

impl FromStr for Address {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("pkh:") {
            Ok(Self::PubKey(PubKeyHash::from_hex(rest)?))
        } else if let Some(rest) = s.strip_prefix("script:") {
            Ok(Self::Script(ScriptHash::from_hex(rest)?))
        } else {
            Err(IdentifierError::UnknownAddressForm(s.to_string()))
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Output Reference ────────────────────────────────────────────────

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxOutRef {
    /// Transaction that created the output.
    pub tx_id: TxId,
    /// Position of the output in that transaction.
    pub index: u32,
}

impl TxOutRef {
    /// Create an output reference.
    pub fn new(tx_id: TxId, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl std::fmt::Display for TxOutRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.tx_id, self.index)
    }
}

impl FromStr for TxOutRef {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tx, idx) = s
            .trim()
            .split_once('#')
            .ok_or_else(|| IdentifierError::InvalidOutRef(s.to_string()))?;
        let index = idx
            .parse::<u32>()
            .map_err(|_| IdentifierError::InvalidOutRef(s.to_string()))?;
        Ok(Self::new(TxId::from_hex(tx)?, index))
    }
}

impl Serialize for TxOutRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxOutRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkh(b: u8) -> PubKeyHash {
        PubKeyHash::from_bytes([b; 32])
    }

    #[test]
    fn test_address_display_forms() {
        let a = Address::PubKey(pkh(0xab));
        assert_eq!(a.to_string(), format!("pkh:{}", "ab".repeat(32)));
        let s = Address::Script(ScriptHash::from_bytes([0x01; 32]));
        assert!(s.to_string().starts_with("script:0101"));
    }

    #[test]
    fn test_address_parse() {
        let text = format!("script:{}", "cd".repeat(32));
        let addr: Address = text.parse().unwrap();
        assert!(addr.is_script());
        assert_eq!(addr.to_string(), text);
        assert!(addr.pub_key_hash().is_none());
    }

    #[test]
    fn test_address_parse_rejects_unknown_prefix() {
        let err = format!("addr1{}", "00".repeat(32)).parse::<Address>().unwrap_err();
        assert!(matches!(err, IdentifierError::UnknownAddressForm(_)));
    }

    #[test]
    fn test_address_parse_rejects_short_hash() {
        assert!("pkh:abcd".parse::<Address>().is_err());
    }

    #[test]
    fn test_hash_hex_has_one_form() {
        let hex = "ab".repeat(32);
        let key = PubKeyHash::from_hex(&hex).unwrap();
        assert_eq!(PubKeyHash::from_hex(&hex.to_uppercase()).unwrap(), key);
        assert!(PubKeyHash::from_hex(&format!(" {hex}")).is_err());
        assert!(PubKeyHash::from_hex(&format!("{hex}\n")).is_err());
        assert!(format!("pkh: {hex}").parse::<Address>().is_err());
        assert!(format!("pkh:+b{}", "ab".repeat(31)).parse::<Address>().is_err());
    }

    #[test]
    fn test_address_serializes_as_string() {
        let a = Address::PubKey(pkh(0x11));
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, format!("\"pkh:{}\"", "11".repeat(32)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_key_and_script_with_same_bytes_differ() {
        let k = Address::PubKey(pkh(0x22));
        let s = Address::Script(ScriptHash::from_bytes([0x22; 32]));
        assert_ne!(k, s);
    }

    #[test]
    fn test_out_ref_parse() {
        let text = format!("{}#3", "ef".repeat(32));
        let r: TxOutRef = text.parse().unwrap();
        assert_eq!(r.index, 3);
        assert_eq!(r.to_string(), text);
    }

    #[test]
    fn test_out_ref_rejects_missing_index() {
        assert!("ef".repeat(32).parse::<TxOutRef>().is_err());
        assert!(format!("{}#x", "ef".repeat(32)).parse::<TxOutRef>().is_err());
    }

    #[test]
    fn test_hash_debug_shows_prefix() {
        assert_eq!(format!("{:?}", pkh(0xaa)), "PubKeyHash(aaaaaaaa...)");
    }
}
