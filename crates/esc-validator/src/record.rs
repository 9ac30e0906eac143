//! # Escrow Record and Redeemer
//!
//! The record is the datum attached to the escrow output. It is written once,
//! in the same transaction that mints the control token, and read back by the
//! validator when the escrow is spent. The minting policy is what guarantees
//! a record at the script address is well formed: anything that decodes here
//! but was never checked at mint time cannot hold a genuine control token.

use serde::{Deserialize, Serialize};

use esc_core::{Address, AssetClass, CanonicalizationError, Datum, LedgerError, PubKeyHash, Value};

/// Terms of one escrow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EscrowRecord {
    /// Who locked the value and may cancel.
    pub sender: Address,
    /// Asset class the sender wants in return.
    pub requested: AssetClass,
    /// Quantity of `requested` owed to the sender on resolve.
    pub amount: i64,
    /// The control token minted for this escrow.
    pub control_token: AssetClass,
}

impl EscrowRecord {
    /// What a resolve must pay the sender.
    pub fn value_to_sender(&self) -> Value {
        Value::singleton(&self.requested, self.amount)
    }

    /// The sender's key hash, `None` if the sender is a script.
    pub fn sender_key(&self) -> Option<&PubKeyHash> {
        self.sender.pub_key_hash()
    }

    /// Canonical datum bytes for this record.
    pub fn to_datum(&self) -> Result<Datum, CanonicalizationError> {
        Datum::encode(self)
    }

    /// Decode a record from datum bytes.
    pub fn from_datum(datum: &Datum) -> Result<Self, LedgerError> {
        datum.decode()
    }
}

/// Spending action supplied with the escrow input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redeemer {
    /// Sender reclaims the locked value.
    Cancel,
    /// Receiver pays the sender and takes the locked value.
    Resolve,
}

impl Redeemer {
    /// Lowercase name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Resolve => "resolve",
        }
    }
}

impl std::fmt::Display for Redeemer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esc_core::{ScriptHash, TokenName};

    fn record() -> EscrowRecord {
        EscrowRecord {
            sender: Address::PubKey(PubKeyHash::from_bytes([1; 32])),
            requested: AssetClass::lovelace(),
            amount: 100,
            control_token: AssetClass::from_policy(
                &ScriptHash::from_bytes([9; 32]),
                TokenName::new("ctl").unwrap(),
            ),
        }
    }

    #[test]
    fn test_value_to_sender() {
        assert_eq!(record().value_to_sender(), Value::lovelace(100));
    }

    #[test]
    fn test_sender_key() {
        let mut r = record();
        assert_eq!(r.sender_key(), Some(&PubKeyHash::from_bytes([1; 32])));
        r.sender = Address::Script(ScriptHash::from_bytes([1; 32]));
        assert_eq!(r.sender_key(), None);
    }

    #[test]
    fn test_datum_roundtrip_is_canonical() {
        let r = record();
        let a = r.to_datum().unwrap();
        let b = r.clone().to_datum().unwrap();
        assert_eq!(a, b);
        assert_eq!(EscrowRecord::from_datum(&a).unwrap(), r);
        // JCS orders keys lexicographically.
        let text = std::str::from_utf8(a.as_bytes()).unwrap();
        assert!(text.starts_with(r#"{"amount":100,"control_token":"#));
    }

    #[test]
    fn test_unknown_fields_are_malformed() {
        let mut json = serde_json::to_value(record()).unwrap();
        json["extra"] = serde_json::json!(1);
        let datum = Datum::encode(&json).unwrap();
        assert!(matches!(
            EscrowRecord::from_datum(&datum),
            Err(LedgerError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let datum = Datum::encode(&serde_json::json!({"amount": 1})).unwrap();
        assert!(EscrowRecord::from_datum(&datum).is_err());
    }

    #[test]
    fn test_redeemer_serde() {
        assert_eq!(serde_json::to_string(&Redeemer::Cancel).unwrap(), "\"cancel\"");
        let r: Redeemer = serde_json::from_str("\"resolve\"").unwrap();
        assert_eq!(r, Redeemer::Resolve);
        assert_eq!(r.to_string(), "resolve");
    }
}
