//! # Escrow Index
//!
//! Builders need the escrow UTXOs sitting at a script address. In a
//! deployment those come from an external indexing service; [`EscrowIndex`]
//! is the seam, and [`MemoryIndex`] is a ledger-in-a-map used by the CLI and
//! tests.
//!
//! Anyone can pay to the script address, so not every output there is an
//! escrow. [`find_escrows`] keeps only outputs whose record decodes, names
//! a control token of this deployment's policy, and that still hold that
//! token. The rest are logged and skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use esc_core::{Address, TxId, TxInInfo, TxOut, TxOutRef, Value};
use esc_validator::{ControlTokenPolicy, EscrowRecord};

use crate::draft::UnbalancedTxDraft;
use crate::error::BuilderError;

/// An escrow output with its decoded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowUtxo {
    /// Where the output lives.
    pub out_ref: TxOutRef,
    /// The output itself.
    pub output: TxOut,
    /// Its decoded record.
    pub record: EscrowRecord,
}

impl EscrowUtxo {
    /// Value locked by the sender, excluding the control token.
    pub fn locked(&self) -> Value {
        &self.output.value - &Value::singleton(&self.record.control_token, 1)
    }
}

/// Source of unspent outputs at an address.
pub trait EscrowIndex {
    /// Unspent outputs at `address`.
    fn escrows_at(&self, address: &Address) -> Result<Vec<TxInInfo>, BuilderError>;
}

/// In-memory unspent-output set.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    utxos: BTreeMap<TxOutRef, TxOut>,
}

impl MemoryIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output directly.
    pub fn insert(&mut self, out_ref: TxOutRef, output: TxOut) {
        self.utxos.insert(out_ref, output);
    }

    /// Look up an unspent output.
    pub fn get(&self, out_ref: &TxOutRef) -> Option<&TxOut> {
        self.utxos.get(out_ref)
    }

    /// Number of unspent outputs.
    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    /// Whether the index holds nothing.
    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Record `draft` as confirmed: consume its inputs, create its outputs
    /// under the draft's transaction id.
    ///
    /// # Errors
    ///
    /// `BuilderError::Index` if an input is not unspent.
    pub fn apply(&mut self, draft: &UnbalancedTxDraft) -> Result<TxId, BuilderError> {
        if let Some(missing) = draft
            .inputs
            .iter()
            .find(|input| !self.utxos.contains_key(&input.utxo.out_ref))
        {
            return Err(BuilderError::Index(format!(
                "input {} is not unspent",
                missing.utxo.out_ref
            )));
        }

        let tx_id = draft.tx_id()?;
        for input in &draft.inputs {
            self.utxos.remove(&input.utxo.out_ref);
        }
        for (index, output) in draft.outputs.iter().enumerate() {
            let index = u32::try_from(index)
                .map_err(|_| BuilderError::Index(format!("output index {index} out of range")))?;
            self.utxos.insert(TxOutRef::new(tx_id, index), output.clone());
        }
        tracing::info!(tx = %tx_id, kind = %draft.kind, utxos = self.utxos.len(), "draft applied");
        Ok(tx_id)
    }
}

impl EscrowIndex for MemoryIndex {
    fn escrows_at(&self, address: &Address) -> Result<Vec<TxInInfo>, BuilderError> {
        Ok(self
            .utxos
            .iter()
            .filter(|(_, out)| out.address == *address)
            .map(|(out_ref, out)| TxInInfo {
                out_ref: *out_ref,
                resolved: out.clone(),
            })
            .collect())
    }
}

/// Escrows at `script_address`, skipping outputs that are not genuine.
pub fn find_escrows(
    index: &impl EscrowIndex,
    script_address: &Address,
) -> Result<Vec<EscrowUtxo>, BuilderError> {
    let policy = ControlTokenPolicy::new(*script_address)?;
    let currency = policy.currency_symbol();
    let mut escrows = Vec::new();
    for utxo in index.escrows_at(script_address)? {
        let Some(datum) = utxo.resolved.datum.as_ref() else {
            tracing::warn!(utxo = %utxo.out_ref, "output at script address carries no record, skipping");
            continue;
        };
        let record = match EscrowRecord::from_datum(datum) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(utxo = %utxo.out_ref, error = %e, "undecodable escrow record, skipping");
                continue;
            }
        };
        if *record.control_token.currency() != currency {
            tracing::warn!(
                utxo = %utxo.out_ref,
                token = %record.control_token,
                "record names a token outside this deployment's policy, skipping"
            );
            continue;
        }
        if utxo.resolved.value.value_of(&record.control_token) != 1 {
            tracing::warn!(
                utxo = %utxo.out_ref,
                token = %record.control_token,
                "output does not hold its control token, skipping"
            );
            continue;
        }
        escrows.push(EscrowUtxo {
            out_ref: utxo.out_ref,
            output: utxo.resolved,
            record,
        });
    }
    Ok(escrows)
}
