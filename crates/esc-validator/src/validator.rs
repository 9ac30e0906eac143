//! # Escrow Spend Validator
//!
//! Guards the escrow script address. It runs once per script input being
//! spent, with that input's record and the redeemer supplied alongside it.
//!
//! ## Checks
//!
//! Common, in order:
//!
//! 1. exactly one input is spent from the script address;
//! 2. the mint field burns exactly one unit of the record's control token.
//!
//! `Cancel`: the single signer is the record's sender.
//!
//! `Resolve`: the single signer is the receiver; the sender is paid at least
//! the record's `value_to_sender`; the receiver is paid at least the script
//! input's value minus the control token.
//!
//! Check (1) is the double-satisfaction guard. Without it two escrows with
//! the same terms could be resolved in one transaction by a single payment
//! that each validator run would count as its own.

use esc_core::{Address, PubKeyHash, TransactionView, TxInInfo, TxOutRef, Value};

use crate::policy::ControlTokenPolicy;
use crate::reason::{RejectReason, Verdict};
use crate::record::{EscrowRecord, Redeemer};
use crate::script::validator_address;
use crate::ConfigError;

/// What an accepted spend closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendApproval {
    /// How the escrow was closed.
    pub redeemer: Redeemer,
    /// The escrow output that was spent.
    pub spent: TxOutRef,
    /// The record it carried.
    pub record: EscrowRecord,
}

/// The escrow validator instantiated for one receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowValidator {
    receiver: Address,
    receiver_key: PubKeyHash,
    script_address: Address,
    policy: ControlTokenPolicy,
}

impl EscrowValidator {
    /// Instantiate the validator for `receiver`.
    ///
    /// # Errors
    ///
    /// `ConfigError::ReceiverNotPubKey` if the receiver is a script.
    pub fn new(receiver: Address) -> Result<Self, ConfigError> {
        let receiver_key = *receiver
            .pub_key_hash()
            .ok_or(ConfigError::ReceiverNotPubKey(receiver))?;
        let script_address = validator_address(&receiver)?;
        let policy = ControlTokenPolicy::new(script_address)?;
        Ok(Self {
            receiver,
            receiver_key,
            script_address,
            policy,
        })
    }

    /// The receiver this instance was built for.
    pub fn receiver(&self) -> &Address {
        &self.receiver
    }

    /// Key hash that must sign a resolve.
    pub fn receiver_key(&self) -> &PubKeyHash {
        &self.receiver_key
    }

    /// Address the escrow outputs sit at.
    pub fn script_address(&self) -> &Address {
        &self.script_address
    }

    /// The control-token policy paired with this script address.
    pub fn minting_policy(&self) -> &ControlTokenPolicy {
        &self.policy
    }

    /// Run every check, returning what the spend closed.
    pub fn approve(
        &self,
        record: &EscrowRecord,
        redeemer: Redeemer,
        view: &TransactionView,
    ) -> Result<SpendApproval, RejectReason> {
        let input = self.single_script_input(view)?;

        if view.mint.value_of(&record.control_token) != -1 {
            return Err(RejectReason::TokenNotBurned);
        }

        let signer = view
            .single_signer()
            .map_err(|_| RejectReason::NoSingleSigner)?;

        match redeemer {
            Redeemer::Cancel => {
                if record.sender_key() != Some(signer) {
                    return Err(RejectReason::WrongSenderSignature);
                }
            }
            Redeemer::Resolve => {
                if *signer != self.receiver_key {
                    return Err(RejectReason::WrongReceiverSignature);
                }
                if !view
                    .value_paid_to(&record.sender)
                    .covers(&record.value_to_sender())
                {
                    return Err(RejectReason::UnderpaidSender);
                }
                let owed = &input.resolved.value - &Value::singleton(&record.control_token, 1);
                if !view.value_paid_to(&self.receiver).covers(&owed) {
                    return Err(RejectReason::UnderpaidReceiver);
                }
            }
        }

        Ok(SpendApproval {
            redeemer,
            spent: input.out_ref,
            record: record.clone(),
        })
    }

    /// Evaluate a candidate spend of an escrow carrying `record`.
    pub fn evaluate(&self, record: &EscrowRecord, redeemer: Redeemer, view: &TransactionView) -> Verdict {
        let result = self.approve(record, redeemer, view);
        if let Err(reason) = &result {
            tracing::debug!(
                reason = reason.code(),
                redeemer = %redeemer,
                script = %self.script_address,
                "spend rejected"
            );
        }
        Verdict::from(result)
    }

    fn single_script_input<'a>(&self, view: &'a TransactionView) -> Result<&'a TxInInfo, RejectReason> {
        let mut inputs = view.inputs_at(&self.script_address);
        match (inputs.next(), inputs.next()) {
            (Some(input), None) => Ok(input),
            _ => Err(RejectReason::MultipleScriptInputs),
        }
    }
}

/// Evaluate a candidate spend against the validator for `receiver`.
///
/// # Errors
///
/// Only for an invalid deployment parameter. A refused transaction is an
/// `Ok(Verdict::Reject(_))`.
pub fn evaluate_spend(
    receiver: &Address,
    record: &EscrowRecord,
    redeemer: Redeemer,
    view: &TransactionView,
) -> Result<Verdict, ConfigError> {
    Ok(EscrowValidator::new(*receiver)?.evaluate(record, redeemer, view))
}
