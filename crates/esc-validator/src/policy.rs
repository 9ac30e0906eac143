//! # Control-Token Minting Policy
//!
//! The policy runs whenever its currency symbol appears in a mint field.
//! It is parameterized by the escrow validator's script address.
//!
//! ## Rules
//!
//! The mint field must hold exactly one asset class. Then, by quantity:
//!
//! - `-1` (burn): accept. Burning is what closing an escrow does, and the
//!   validator is the gate for that.
//! - `1` (start): exactly one output pays to the script address; it holds
//!   exactly one unit of the minted class; it carries a decodable record;
//!   the transaction's single signer is the record's sender; the record asks
//!   for a positive amount; the record names the minted class as its control
//!   token.
//! - anything else: reject.
//!
//! Checks run in that order and the first failure decides the reason.
//!
//! The policy never compares the minted class against its own currency
//! symbol: the ledger only invokes a policy for its own symbol.

use esc_core::{
    single_minted_asset, Address, AssetClass, CurrencySymbol, LedgerError, ScriptHash, TokenName,
    TransactionView, Value,
};

use crate::reason::{RejectReason, Verdict};
use crate::record::EscrowRecord;
use crate::script::policy_script_hash;
use crate::ConfigError;

/// What an accepted mint established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintApproval {
    /// A new escrow was opened.
    Started {
        /// The record attached to the escrow output.
        record: EscrowRecord,
        /// Value locked by the sender, excluding the control token.
        locked: Value,
        /// Position of the escrow output in the transaction's outputs.
        output_index: usize,
    },
    /// A control token was burned.
    Burned {
        /// The burned asset class.
        control_token: AssetClass,
    },
}

/// The control-token policy instantiated for one escrow script address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTokenPolicy {
    script_address: Address,
    policy_id: ScriptHash,
}

impl ControlTokenPolicy {
    /// Instantiate the policy for `script_address`.
    ///
    /// # Errors
    ///
    /// `ConfigError::PolicyTargetNotScript` if the address is key-locked.
    pub fn new(script_address: Address) -> Result<Self, ConfigError> {
        if !script_address.is_script() {
            return Err(ConfigError::PolicyTargetNotScript(script_address));
        }
        let policy_id = policy_script_hash(&script_address)?;
        Ok(Self {
            script_address,
            policy_id,
        })
    }

    /// The escrow script address this policy guards.
    pub fn script_address(&self) -> &Address {
        &self.script_address
    }

    /// Hash of this policy instance.
    pub fn policy_id(&self) -> &ScriptHash {
        &self.policy_id
    }

    /// Currency symbol of every control token this policy mints.
    pub fn currency_symbol(&self) -> CurrencySymbol {
        CurrencySymbol::from_script_hash(&self.policy_id)
    }

    /// The control-token asset class with the given name.
    pub fn control_token(&self, name: TokenName) -> AssetClass {
        AssetClass::from_policy(&self.policy_id, name)
    }

    /// Run every check, returning what the mint established.
    pub fn approve(&self, view: &TransactionView) -> Result<MintApproval, RejectReason> {
        let (minted, amount) =
            single_minted_asset(&view.mint).map_err(|_| RejectReason::MultiAssetMint)?;

        match amount {
            -1 => Ok(MintApproval::Burned {
                control_token: minted,
            }),
            1 => self.approve_start(view, minted),
            _ => Err(RejectReason::InvalidMintAmount),
        }
    }

    /// Evaluate a candidate transaction.
    pub fn evaluate(&self, view: &TransactionView) -> Verdict {
        let result = self.approve(view);
        if let Err(reason) = &result {
            tracing::debug!(
                reason = reason.code(),
                script = %self.script_address,
                "mint rejected"
            );
        }
        Verdict::from(result)
    }

    fn approve_start(
        &self,
        view: &TransactionView,
        minted: AssetClass,
    ) -> Result<MintApproval, RejectReason> {
        let (output_index, output) = view
            .single_indexed_output_at(&self.script_address)
            .map_err(|e| match e {
                LedgerError::MultipleOutputs { .. } => RejectReason::MultipleScriptOutputs,
                _ => RejectReason::NoScriptOutput,
            })?;

        if output.value.value_of(&minted) != 1 {
            return Err(RejectReason::TokenNotPaid);
        }
        if !output.value.is_non_negative() {
            return Err(RejectReason::NegativeValue);
        }

        let datum = output.datum.as_ref().ok_or(RejectReason::MissingRecord)?;
        let record = EscrowRecord::from_datum(datum).map_err(|_| RejectReason::MalformedRecord)?;

        let signer = view
            .single_signer()
            .map_err(|_| RejectReason::NoSingleSigner)?;
        if record.sender_key() != Some(signer) {
            return Err(RejectReason::WrongSigner);
        }

        if record.amount <= 0 {
            return Err(RejectReason::NonPositiveAmount);
        }

        if record.control_token != minted {
            return Err(RejectReason::AssetClassMismatch);
        }

        let locked = &output.value - &Value::singleton(&minted, 1);

        Ok(MintApproval::Started {
            record,
            locked,
            output_index,
        })
    }
}

/// Evaluate a candidate transaction against the policy for `script_address`.
///
/// # Errors
///
/// Only for an invalid deployment parameter. A refused transaction is an
/// `Ok(Verdict::Reject(_))`.
pub fn evaluate_mint(script_address: &Address, view: &TransactionView) -> Result<Verdict, ConfigError> {
    Ok(ControlTokenPolicy::new(*script_address)?.evaluate(view))
}
