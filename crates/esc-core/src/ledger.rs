//! # Transaction View and Ledger Primitives
//!
//! The [`TransactionView`] is the read-only projection of a candidate
//! transaction that validation logic sees: inputs with their resolved
//! outputs, outputs, the mint field, and the signatories.
//!
//! The single-candidate lookups here are the only implementations in the
//! stack. The minting policy and the escrow validator both call them, so a
//! transaction that one of them reads as "exactly one script output" is read
//! the same way by the other.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::canonical::CanonicalBytes;
use crate::error::{CanonicalizationError, LedgerError};
use crate::identity::{Address, PubKeyHash, TxOutRef};
use crate::value::{AssetClass, Value};

// ─── Datum ───────────────────────────────────────────────────────────

/// Record bytes attached to an output.
///
/// Built from canonical JSON by [`Datum::encode`]. Raw bytes from outside
/// (a deserialized view, an indexer) are carried as-is and only interpreted
/// by [`Datum::decode`], which is where a malformed record is detected.
/// Serializes as a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Datum(Vec<u8>);

impl Datum {
    /// Encode a record through the canonical pipeline.
    pub fn encode(record: &impl Serialize) -> Result<Self, CanonicalizationError> {
        Ok(Self(CanonicalBytes::new(record)?.into_bytes()))
    }

    /// Wrap bytes of unknown shape.
    pub fn from_raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Access the attached bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Interpret the bytes as a record of type `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, LedgerError> {
        serde_json::from_slice(&self.0).map_err(|e| LedgerError::MalformedRecord(e.to_string()))
    }
}

impl Serialize for Datum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&crate::hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Datum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::hex::decode(&s)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

// ─── Outputs and Inputs ──────────────────────────────────────────────

/// A transaction output: value paid to an address, optionally with a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Destination.
    pub address: Address,
    /// Value paid.
    pub value: Value,
    /// Attached record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<Datum>,
}

impl TxOut {
    /// An output without a record.
    pub fn new(address: Address, value: Value) -> Self {
        Self {
            address,
            value,
            datum: None,
        }
    }

    /// An output carrying a record.
    pub fn with_datum(address: Address, value: Value, datum: Datum) -> Self {
        Self {
            address,
            value,
            datum: Some(datum),
        }
    }
}

/// An input being spent, together with the output it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInInfo {
    /// Which output is spent.
    pub out_ref: TxOutRef,
    /// The spent output as recorded on the ledger.
    pub resolved: TxOut,
}

// ─── TransactionView ─────────────────────────────────────────────────

/// Read-only projection of a candidate transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    /// Inputs being spent.
    #[serde(default)]
    pub inputs: Vec<TxInInfo>,
    /// Outputs being created.
    #[serde(default)]
    pub outputs: Vec<TxOut>,
    /// Minted (positive) and burned (negative) quantities.
    #[serde(default)]
    pub mint: Value,
    /// Key hashes that signed the transaction.
    #[serde(default)]
    pub signatories: Vec<PubKeyHash>,
}

impl TransactionView {
    /// Inputs whose resolved output sits at `address`.
    pub fn inputs_at(&self, address: &Address) -> impl Iterator<Item = &TxInInfo> {
        let address = *address;
        self.inputs
            .iter()
            .filter(move |input| input.resolved.address == address)
    }

    /// Outputs paying to `address`.
    pub fn outputs_at(&self, address: &Address) -> impl Iterator<Item = &TxOut> {
        let address = *address;
        self.outputs.iter().filter(move |out| out.address == address)
    }

    /// Total value this transaction pays to `address`.
    pub fn value_paid_to(&self, address: &Address) -> Value {
        self.outputs_at(address).map(|out| &out.value).sum()
    }

    /// The unique output paying to `address`.
    pub fn single_output_at(&self, address: &Address) -> Result<&TxOut, LedgerError> {
        single_output_at(&self.outputs, address)
    }

    /// The unique output paying to `address`, with its position.
    pub fn single_indexed_output_at(&self, address: &Address) -> Result<(usize, &TxOut), LedgerError> {
        single_indexed_output_at(&self.outputs, address)
    }

    /// The unique signatory.
    pub fn single_signer(&self) -> Result<&PubKeyHash, LedgerError> {
        match self.signatories.as_slice() {
            [signer] => Ok(signer),
            other => Err(LedgerError::NoSingleSigner { count: other.len() }),
        }
    }
}

/// The unique output in `outputs` paying to `address`.
///
/// # Errors
///
/// `LedgerError::MultipleOutputs` if more than one output pays to the
/// address, `LedgerError::NoOutput` if none does.
pub fn single_output_at<'a>(outputs: &'a [TxOut], address: &Address) -> Result<&'a TxOut, LedgerError> {
    single_indexed_output_at(outputs, address).map(|(_, out)| out)
}

/// [`single_output_at`], also returning the output's position in `outputs`.
pub fn single_indexed_output_at<'a>(
    outputs: &'a [TxOut],
    address: &Address,
) -> Result<(usize, &'a TxOut), LedgerError> {
    let mut matching = outputs.iter().enumerate().filter(|(_, out)| out.address == *address);
    match (matching.next(), matching.count()) {
        (Some(found), 0) => Ok(found),
        (Some(_), rest) => Err(LedgerError::MultipleOutputs {
            address: address.to_string(),
            count: rest + 1,
        }),
        (None, _) => Err(LedgerError::NoOutput {
            address: address.to_string(),
        }),
    }
}

/// The single asset class in a mint field and its signed quantity.
///
/// # Errors
///
/// `LedgerError::MultipleAssetsMinted` if more than one distinct asset class
/// is minted or burned, `LedgerError::NothingMinted` if the field is empty.
pub fn single_minted_asset(mint: &Value) -> Result<(AssetClass, i64), LedgerError> {
    let mut entries = mint.flatten();
    match entries.len() {
        0 => Err(LedgerError::NothingMinted),
        1 => Ok(entries.remove(0)),
        count => Err(LedgerError::MultipleAssetsMinted { count }),
    }
}
