//! # Unbalanced Transaction Drafts
//!
//! A draft is what the builder hands out: the escrow-relevant inputs,
//! outputs, mint field and required signers of a transaction, without fees,
//! collateral, funding inputs or change. A wallet balances it, collects
//! witnesses, and submits it.
//!
//! The draft's body (everything but its creation time) is hashed through
//! `CanonicalBytes`. That digest is the draft's transaction id for the
//! in-memory index and the message each witness signs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use esc_core::{
    sha256_digest, CanonicalBytes, ContentDigest, PubKeyHash, Timestamp, TransactionView, TxId,
    TxInInfo, TxOut, Value,
};
use esc_crypto::{verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use esc_validator::Redeemer;

use crate::error::BuilderError;

/// Unique identifier of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub Uuid);

impl DraftId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which escrow operation a draft performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftKind {
    /// Lock value and mint the control token.
    Start,
    /// Return the locked value to the sender.
    Cancel,
    /// Pay the sender, release the locked value to the receiver.
    Resolve,
}

impl DraftKind {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Cancel => "cancel",
            Self::Resolve => "resolve",
        }
    }
}

impl std::fmt::Display for DraftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input of a draft, with the redeemer for script inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInput {
    /// The output being spent.
    pub utxo: TxInInfo,
    /// Redeemer passed to the escrow validator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemer: Option<Redeemer>,
}

/// A transaction lacking fees, collateral, balancing inputs and witnesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbalancedTxDraft {
    /// Draft identifier.
    pub id: DraftId,
    /// Escrow operation.
    pub kind: DraftKind,
    /// Escrow inputs.
    pub inputs: Vec<DraftInput>,
    /// Outputs.
    pub outputs: Vec<TxOut>,
    /// Mint field.
    pub mint: Value,
    /// Keys that must sign.
    pub required_signers: Vec<PubKeyHash>,
    /// When the draft was built.
    pub created_at: Timestamp,
}

#[derive(Serialize)]
struct DraftBody<'a> {
    id: &'a DraftId,
    kind: DraftKind,
    inputs: &'a [DraftInput],
    outputs: &'a [TxOut],
    mint: &'a Value,
    required_signers: &'a [PubKeyHash],
}

/// An Ed25519 signature over a draft body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Key that signed.
    pub public_key: Ed25519PublicKey,
    /// Signature over the canonical body bytes.
    pub signature: Ed25519Signature,
}

impl UnbalancedTxDraft {
    /// The transaction view the scripts would see, assuming exactly the
    /// required signers sign.
    pub fn view(&self) -> TransactionView {
        TransactionView {
            inputs: self.inputs.iter().map(|i| i.utxo.clone()).collect(),
            outputs: self.outputs.clone(),
            mint: self.mint.clone(),
            signatories: self.required_signers.clone(),
        }
    }

    /// Canonical bytes of the body.
    pub fn body_bytes(&self) -> Result<CanonicalBytes, BuilderError> {
        Ok(CanonicalBytes::new(&DraftBody {
            id: &self.id,
            kind: self.kind,
            inputs: &self.inputs,
            outputs: &self.outputs,
            mint: &self.mint,
            required_signers: &self.required_signers,
        })?)
    }

    /// SHA-256 of the canonical body.
    pub fn body_digest(&self) -> Result<ContentDigest, BuilderError> {
        Ok(sha256_digest(&self.body_bytes()?))
    }

    /// Transaction id the draft will be recorded under.
    pub fn tx_id(&self) -> Result<TxId, BuilderError> {
        self.body_digest().map(TxId::from)
    }

    /// Sign the body with `keypair`.
    ///
    /// # Errors
    ///
    /// `BuilderError::UnexpectedSigner` if the key is not a required signer.
    pub fn sign(&self, keypair: &Ed25519KeyPair) -> Result<Witness, BuilderError> {
        let key_hash = keypair.key_hash();
        if !self.required_signers.contains(&key_hash) {
            return Err(BuilderError::UnexpectedSigner(key_hash));
        }
        let signature = keypair.sign(&self.body_bytes()?);
        Ok(Witness {
            public_key: keypair.public_key(),
            signature,
        })
    }

    /// Check that `witness` is a valid signature by a required signer.
    pub fn verify_witness(&self, witness: &Witness) -> Result<(), BuilderError> {
        let key_hash = witness.public_key.key_hash();
        if !self.required_signers.contains(&key_hash) {
            return Err(BuilderError::UnexpectedSigner(key_hash));
        }
        verify_with_public_key(&self.body_bytes()?, &witness.signature, &witness.public_key)?;
        Ok(())
    }
}
