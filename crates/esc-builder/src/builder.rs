//! # Escrow Transaction Builder
//!
//! Builds the three escrow drafts for one deployment (one receiver):
//!
//! - **start**: one script output holding the locked value plus one freshly
//!   minted control token, with the encoded record attached. Signed by the
//!   sender.
//! - **cancel**: spends the escrow with `Cancel`, burns the token, returns
//!   the locked value to the sender. Signed by the sender.
//! - **resolve**: spends the escrow with `Resolve`, burns the token, pays the
//!   sender what the record demands and the receiver the locked value.
//!   Signed by the receiver.
//!
//! Every draft is run through the minting policy, and spending drafts also
//! through the validator, before it is returned. A draft the scripts would
//! refuse comes back as `BuilderError::Rejected(reason)`.

use serde::{Deserialize, Serialize};

use esc_core::{
    hex, sha256_digest, Address, AssetClass, CanonicalBytes, PubKeyHash, Timestamp, TokenName,
    TxInInfo, TxOut, Value,
};
use esc_validator::{EscrowRecord, EscrowValidator, Redeemer};

use crate::draft::{DraftId, DraftInput, DraftKind, UnbalancedTxDraft};
use crate::error::BuilderError;
use crate::index::EscrowUtxo;

/// Control-token names are the hex of this many digest bytes.
const TOKEN_NAME_BYTES: usize = 16;

/// What the sender asks for in return for the locked value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowTerms {
    /// Asset class owed to the sender.
    pub requested: AssetClass,
    /// Quantity owed.
    pub amount: i64,
}

/// Builder for one receiver's escrow deployment.
#[derive(Debug, Clone)]
pub struct EscrowTxBuilder {
    validator: EscrowValidator,
}

impl EscrowTxBuilder {
    /// Builder for escrows paying out to `receiver`.
    pub fn new(receiver: Address) -> Result<Self, BuilderError> {
        Ok(Self::from_validator(EscrowValidator::new(receiver)?))
    }

    /// Builder over an existing validator instance.
    pub fn from_validator(validator: EscrowValidator) -> Self {
        Self { validator }
    }

    /// The validator drafts are checked against.
    pub fn validator(&self) -> &EscrowValidator {
        &self.validator
    }

    /// Where escrows of this deployment live.
    pub fn script_address(&self) -> &Address {
        self.validator.script_address()
    }

    /// Draft that opens an escrow locking `locked` from `sender`.
    pub fn start(
        &self,
        sender: &Address,
        locked: Value,
        terms: &EscrowTerms,
    ) -> Result<UnbalancedTxDraft, BuilderError> {
        let sender_key = *sender
            .pub_key_hash()
            .ok_or_else(|| BuilderError::InvalidTerms(format!("sender {sender} is not a key address")))?;
        if !locked.is_non_negative() {
            return Err(BuilderError::InvalidTerms(format!(
                "locked value {locked} holds a negative quantity"
            )));
        }

        let id = DraftId::new();
        let policy = self.validator.minting_policy();
        let control_token = policy.control_token(control_token_name(&id, sender)?);
        let record = EscrowRecord {
            sender: *sender,
            requested: terms.requested.clone(),
            amount: terms.amount,
            control_token: control_token.clone(),
        };

        let escrow_value = &locked + &Value::singleton(&control_token, 1);
        let draft = UnbalancedTxDraft {
            id,
            kind: DraftKind::Start,
            inputs: Vec::new(),
            outputs: vec![TxOut::with_datum(
                *self.script_address(),
                escrow_value,
                record.to_datum()?,
            )],
            mint: Value::singleton(&control_token, 1),
            required_signers: vec![sender_key],
            created_at: Timestamp::now(),
        };

        policy.approve(&draft.view())?;
        tracing::debug!(draft = %draft.id, token = %control_token, locked = %locked, "start draft built");
        Ok(draft)
    }

    /// Draft that returns an escrow's locked value to its sender.
    pub fn cancel(&self, escrow: &EscrowUtxo) -> Result<UnbalancedTxDraft, BuilderError> {
        self.check_escrow(escrow)?;
        let sender_key = *escrow.record.sender_key().ok_or_else(|| {
            BuilderError::InvalidTerms(format!("sender {} is not a key address", escrow.record.sender))
        })?;

        let draft = self.spend_draft(
            escrow,
            Redeemer::Cancel,
            vec![TxOut::new(escrow.record.sender, escrow.locked())],
            sender_key,
        );
        self.self_check(escrow, Redeemer::Cancel, &draft)?;
        Ok(draft)
    }

    /// Draft that pays the sender and releases the locked value to the receiver.
    pub fn resolve(&self, escrow: &EscrowUtxo) -> Result<UnbalancedTxDraft, BuilderError> {
        self.check_escrow(escrow)?;
        let receiver = *self.validator.receiver();

        let draft = self.spend_draft(
            escrow,
            Redeemer::Resolve,
            vec![
                TxOut::new(escrow.record.sender, escrow.record.value_to_sender()),
                TxOut::new(receiver, escrow.locked()),
            ],
            *self.validator.receiver_key(),
        );
        self.self_check(escrow, Redeemer::Resolve, &draft)?;
        Ok(draft)
    }

    /// The UTXO sits at this script, holds one control token of this
    /// deployment's policy, and its datum is the record it claims.
    fn check_escrow(&self, escrow: &EscrowUtxo) -> Result<(), BuilderError> {
        let policy = self.validator.minting_policy();
        let token = &escrow.record.control_token;
        let genuine = escrow.output.address == *self.script_address()
            && *token.currency() == policy.currency_symbol()
            && escrow.output.value.value_of(token) == 1
            && escrow
                .output
                .datum
                .as_ref()
                .and_then(|datum| EscrowRecord::from_datum(datum).ok())
                .is_some_and(|record| record == escrow.record);
        if !genuine {
            tracing::warn!(escrow = %escrow.out_ref, token = %token, "refusing to spend a non-escrow output");
            return Err(BuilderError::NotAnEscrow(escrow.out_ref));
        }
        Ok(())
    }

    fn spend_draft(
        &self,
        escrow: &EscrowUtxo,
        redeemer: Redeemer,
        outputs: Vec<TxOut>,
        signer: PubKeyHash,
    ) -> UnbalancedTxDraft {
        let kind = match redeemer {
            Redeemer::Cancel => DraftKind::Cancel,
            Redeemer::Resolve => DraftKind::Resolve,
        };
        UnbalancedTxDraft {
            id: DraftId::new(),
            kind,
            inputs: vec![DraftInput {
                utxo: TxInInfo {
                    out_ref: escrow.out_ref,
                    resolved: escrow.output.clone(),
                },
                redeemer: Some(redeemer),
            }],
            outputs,
            mint: Value::singleton(&escrow.record.control_token, -1),
            required_signers: vec![signer],
            created_at: Timestamp::now(),
        }
    }

    fn self_check(
        &self,
        escrow: &EscrowUtxo,
        redeemer: Redeemer,
        draft: &UnbalancedTxDraft,
    ) -> Result<(), BuilderError> {
        let view = draft.view();
        self.validator.approve(&escrow.record, redeemer, &view)?;
        self.validator.minting_policy().approve(&view)?;
        tracing::debug!(
            draft = %draft.id,
            kind = %draft.kind,
            escrow = %escrow.out_ref,
            "spend draft built"
        );
        Ok(())
    }
}

/// Control-token name for a start draft: hex of the leading digest bytes
/// of `{"draft": id, "sender": sender}`.
pub fn control_token_name(id: &DraftId, sender: &Address) -> Result<TokenName, BuilderError> {
    #[derive(Serialize)]
    struct Seed<'a> {
        draft: &'a DraftId,
        sender: &'a Address,
    }
    let digest = sha256_digest(&CanonicalBytes::new(&Seed { draft: id, sender })?);
    Ok(TokenName::new(hex::encode(&digest.as_bytes()[..TOKEN_NAME_BYTES]))?)
}

/// Start draft for the deployment paying out to `receiver`.
pub fn build_start(
    sender: &Address,
    receiver: &Address,
    locked_value: Value,
    terms: &EscrowTerms,
) -> Result<UnbalancedTxDraft, BuilderError> {
    EscrowTxBuilder::new(*receiver)?.start(sender, locked_value, terms)
}

/// Cancel draft for an escrow of the deployment paying out to `receiver`.
pub fn build_cancel(receiver: &Address, escrow_utxo: &EscrowUtxo) -> Result<UnbalancedTxDraft, BuilderError> {
    EscrowTxBuilder::new(*receiver)?.cancel(escrow_utxo)
}

/// Resolve draft for an escrow of the deployment paying out to `receiver`.
pub fn build_resolve(receiver: &Address, escrow_utxo: &EscrowUtxo) -> Result<UnbalancedTxDraft, BuilderError> {
    EscrowTxBuilder::new(*receiver)?.resolve(escrow_utxo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esc_core::{TxId, TxOutRef};
    use esc_validator::RejectReason;

    fn sender() -> Address {
        Address::PubKey(PubKeyHash::from_bytes([0x11; 32]))
    }

    fn receiver() -> Address {
        Address::PubKey(PubKeyHash::from_bytes([0x22; 32]))
    }

    fn builder() -> EscrowTxBuilder {
        EscrowTxBuilder::new(receiver()).unwrap()
    }

    fn terms(amount: i64) -> EscrowTerms {
        EscrowTerms {
            requested: AssetClass::lovelace(),
            amount,
        }
    }

    fn escrow_from(draft: &UnbalancedTxDraft) -> EscrowUtxo {
        let output = draft.outputs[0].clone();
        let record = output.datum.as_ref().unwrap().decode().unwrap();
        EscrowUtxo {
            out_ref: TxOutRef::new(TxId::from_bytes([5; 32]), 0),
            output,
            record,
        }
    }

    // ── start ────────────────────────────────────────────────────────

    #[test]
    fn test_start_shape() {
        let b = builder();
        let draft = b.start(&sender(), Value::lovelace(50), &terms(100)).unwrap();
        assert_eq!(draft.kind, DraftKind::Start);
        assert_eq!(draft.outputs.len(), 1);
        assert_eq!(draft.outputs[0].address, *b.script_address());
        assert_eq!(draft.mint.asset_count(), 1);
        assert_eq!(draft.required_signers, vec![*sender().pub_key_hash().unwrap()]);

        let escrow = escrow_from(&draft);
        assert_eq!(escrow.locked(), Value::lovelace(50));
        assert_eq!(escrow.record.amount, 100);
        assert_eq!(draft.mint.value_of(&escrow.record.control_token), 1);
    }

    #[test]
    fn test_start_tokens_are_unique_per_draft() {
        let b = builder();
        let a = escrow_from(&b.start(&sender(), Value::lovelace(1), &terms(1)).unwrap());
        let c = escrow_from(&b.start(&sender(), Value::lovelace(1), &terms(1)).unwrap());
        assert_ne!(a.record.control_token, c.record.control_token);
    }

    #[test]
    fn test_start_with_non_positive_amount_is_rejected() {
        let err = builder()
            .start(&sender(), Value::lovelace(50), &terms(0))
            .unwrap_err();
        assert!(matches!(err, BuilderError::Rejected(RejectReason::NonPositiveAmount)));
    }

    #[test]
    fn test_start_from_script_sender_fails() {
        let script_sender = *builder().script_address();
        assert!(matches!(
            builder().start(&script_sender, Value::lovelace(1), &terms(1)),
            Err(BuilderError::InvalidTerms(_))
        ));
    }

    #[test]
    fn test_start_with_negative_locked_value_fails() {
        assert!(matches!(
            builder().start(&sender(), Value::lovelace(-1), &terms(1)),
            Err(BuilderError::InvalidTerms(_))
        ));
    }

    #[test]
    fn test_token_name_fits_limit() {
        let name = control_token_name(&DraftId::new(), &sender()).unwrap();
        assert_eq!(name.as_str().len(), 2 * TOKEN_NAME_BYTES);
    }

    // ── cancel / resolve ─────────────────────────────────────────────

    #[test]
    fn test_cancel_shape() {
        let b = builder();
        let escrow = escrow_from(&b.start(&sender(), Value::lovelace(50), &terms(100)).unwrap());
        let draft = b.cancel(&escrow).unwrap();
        assert_eq!(draft.kind, DraftKind::Cancel);
        assert_eq!(draft.inputs[0].redeemer, Some(Redeemer::Cancel));
        assert_eq!(draft.outputs, vec![TxOut::new(sender(), Value::lovelace(50))]);
        assert_eq!(draft.mint, Value::singleton(&escrow.record.control_token, -1));
    }

    #[test]
    fn test_resolve_shape() {
        let b = builder();
        let escrow = escrow_from(&b.start(&sender(), Value::lovelace(50), &terms(100)).unwrap());
        let draft = b.resolve(&escrow).unwrap();
        assert_eq!(draft.kind, DraftKind::Resolve);
        assert_eq!(draft.required_signers, vec![*receiver().pub_key_hash().unwrap()]);
        assert_eq!(draft.view().value_paid_to(&sender()), Value::lovelace(100));
        assert_eq!(draft.view().value_paid_to(&receiver()), Value::lovelace(50));
    }

    #[test]
    fn test_foreign_escrow_is_refused() {
        let other = EscrowTxBuilder::new(Address::PubKey(PubKeyHash::from_bytes([0x33; 32]))).unwrap();
        let escrow = escrow_from(&other.start(&sender(), Value::lovelace(5), &terms(1)).unwrap());
        assert!(matches!(builder().cancel(&escrow), Err(BuilderError::NotAnEscrow(_))));
    }

    #[test]
    fn test_edited_record_is_refused() {
        let b = builder();
        let mut escrow = escrow_from(&b.start(&sender(), Value::lovelace(50), &terms(100)).unwrap());
        escrow.record.amount = 1;
        assert!(matches!(b.resolve(&escrow), Err(BuilderError::NotAnEscrow(_))));
    }

    #[test]
    fn test_foreign_policy_token_is_refused() {
        let b = builder();
        let fake = EscrowTxBuilder::new(Address::PubKey(PubKeyHash::from_bytes([0x33; 32]))).unwrap();
        let token = fake
            .validator()
            .minting_policy()
            .control_token(TokenName::new("t").unwrap());
        let record = EscrowRecord {
            sender: sender(),
            requested: AssetClass::lovelace(),
            amount: 1_000_000,
            control_token: token.clone(),
        };
        let escrow = EscrowUtxo {
            out_ref: TxOutRef::new(TxId::from_bytes([6; 32]), 0),
            output: TxOut::with_datum(
                *b.script_address(),
                Value::lovelace(5) + Value::singleton(&token, 1),
                record.to_datum().unwrap(),
            ),
            record,
        };
        assert!(matches!(b.resolve(&escrow), Err(BuilderError::NotAnEscrow(_))));
        assert!(matches!(b.cancel(&escrow), Err(BuilderError::NotAnEscrow(_))));
    }

    #[test]
    fn test_escrow_without_its_token_is_refused() {
        let b = builder();
        let mut escrow = escrow_from(&b.start(&sender(), Value::lovelace(50), &terms(100)).unwrap());
        escrow.output.value = Value::lovelace(50);
        assert!(matches!(b.cancel(&escrow), Err(BuilderError::NotAnEscrow(_))));
    }

    #[test]
    fn test_free_functions_match_builder() {
        let draft = build_start(&sender(), &receiver(), Value::lovelace(7), &terms(3)).unwrap();
        let escrow = escrow_from(&draft);
        assert!(build_cancel(&receiver(), &escrow).is_ok());
        assert!(build_resolve(&receiver(), &escrow).is_ok());
    }
}
