//! # Escrow Lifecycle Typestate
//!
//! An escrow is `Active` from the transaction that mints its control token
//! until the transaction that burns it, and `Closed` afterwards.
//!
//! ```text
//! accepted mint ──open()──▶ Active ──close()──▶ Closed
//!                                  (accepted spend)
//! ```
//!
//! `Escrow<Active>` can only be built from a [`MintApproval::Started`], and
//! `Escrow<Closed>` only from an `Escrow<Active>` plus a [`SpendApproval`]
//! for the same output. There is no `close()` on `Escrow<Closed>`.
//!
//! ```compile_fail
//! use esc_validator::lifecycle::*;
//!
//! fn reopen(closed: Escrow<Closed>, approval: esc_validator::SpendApproval) {
//!     // ERROR: no method named `close` found for `Escrow<Closed>`
//!     let _ = closed.close(approval);
//! }
//! ```

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use esc_core::{Timestamp, TxId, TxOutRef, Value};

use crate::policy::MintApproval;
use crate::record::{EscrowRecord, Redeemer};
use crate::validator::SpendApproval;

// ─── State Types ─────────────────────────────────────────────────────

/// Escrow state: funds locked at the script address.
#[derive(Debug, Clone, Copy)]
pub struct Active;

/// Escrow state: control token burned, output spent (terminal).
#[derive(Debug, Clone, Copy)]
pub struct Closed;

mod private {
    pub trait Sealed {}
    impl Sealed for super::Active {}
    impl Sealed for super::Closed {}
}

/// Marker trait for escrow states. Sealed.
pub trait EscrowState: private::Sealed + std::fmt::Debug {
    /// Canonical state name.
    fn name() -> &'static str;

    /// Whether no further transition exists.
    fn is_terminal() -> bool {
        false
    }
}

impl EscrowState for Active {
    fn name() -> &'static str {
        "ACTIVE"
    }
}

impl EscrowState for Closed {
    fn name() -> &'static str {
        "CLOSED"
    }
    fn is_terminal() -> bool {
        true
    }
}

// ─── Transition Record ───────────────────────────────────────────────

/// One entry in an escrow's transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before the transition.
    pub from_state: String,
    /// State after the transition.
    pub to_state: String,
    /// When the transition was recorded (UTC).
    pub timestamp: Timestamp,
    /// Redeemer of the closing spend.
    pub redeemer: Option<Redeemer>,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from lifecycle bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// A burn approval cannot open an escrow.
    #[error("mint approval is a burn, not a start")]
    NotAStart,

    /// The escrow output index does not fit an output reference.
    #[error("output index {0} out of range")]
    OutputIndexOutOfRange(usize),

    /// The spend approval is for a different output.
    #[error("spend closes {actual}, escrow lives at {expected}")]
    OutRefMismatch {
        /// Where the escrow lives.
        expected: TxOutRef,
        /// What the spend consumed.
        actual: TxOutRef,
    },

    /// Runtime transition not allowed by the state machine.
    #[error("invalid escrow transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

// ─── The Escrow ──────────────────────────────────────────────────────

/// An escrow output tracked through its lifecycle.
#[derive(Debug)]
pub struct Escrow<S: EscrowState> {
    /// Where the escrow output lives.
    pub out_ref: TxOutRef,
    /// Terms of the escrow.
    pub record: EscrowRecord,
    /// Value locked by the sender, excluding the control token.
    pub locked: Value,
    /// When the escrow was opened.
    pub opened_at: Timestamp,
    transition_log: Vec<TransitionRecord>,
    _state: PhantomData<S>,
}

impl<S: EscrowState> Escrow<S> {
    /// Canonical state name.
    pub fn state_name(&self) -> &'static str {
        S::name()
    }

    /// Whether the escrow is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        S::is_terminal()
    }

    /// The transition log.
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }

    fn transition_to<T: EscrowState>(mut self, redeemer: Option<Redeemer>) -> Escrow<T> {
        self.transition_log.push(TransitionRecord {
            from_state: S::name().to_string(),
            to_state: T::name().to_string(),
            timestamp: Timestamp::now(),
            redeemer,
        });
        Escrow {
            out_ref: self.out_ref,
            record: self.record,
            locked: self.locked,
            opened_at: self.opened_at,
            transition_log: self.transition_log,
            _state: PhantomData,
        }
    }
}

impl Escrow<Active> {
    /// Open an escrow from an accepted start in transaction `tx_id`.
    pub fn open(approval: MintApproval, tx_id: TxId) -> Result<Self, LifecycleError> {
        match approval {
            MintApproval::Started {
                record,
                locked,
                output_index,
            } => {
                let index = u32::try_from(output_index)
                    .map_err(|_| LifecycleError::OutputIndexOutOfRange(output_index))?;
                Ok(Self {
                    out_ref: TxOutRef::new(tx_id, index),
                    record,
                    locked,
                    opened_at: Timestamp::now(),
                    transition_log: Vec::new(),
                    _state: PhantomData,
                })
            }
            MintApproval::Burned { .. } => Err(LifecycleError::NotAStart),
        }
    }

    /// Close the escrow with an accepted spend of its output.
    pub fn close(self, approval: SpendApproval) -> Result<Escrow<Closed>, LifecycleError> {
        if approval.spent != self.out_ref {
            return Err(LifecycleError::OutRefMismatch {
                expected: self.out_ref,
                actual: approval.spent,
            });
        }
        Ok(self.transition_to(Some(approval.redeemer)))
    }
}

impl Escrow<Closed> {
    /// How the escrow was closed.
    pub fn closed_by(&self) -> Option<Redeemer> {
        self.transition_log.last().and_then(|t| t.redeemer)
    }
}

// ─── DynEscrow ───────────────────────────────────────────────────────

/// Runtime escrow state, for escrows loaded from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynEscrowState {
    /// Funds locked.
    Active,
    /// Control token burned.
    Closed,
}

impl DynEscrowState {
    /// Canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::fmt::Display for DynEscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An escrow whose state is only known at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynEscrow {
    /// Where the escrow output lives.
    pub out_ref: TxOutRef,
    /// Terms of the escrow.
    pub record: EscrowRecord,
    /// Value locked by the sender, excluding the control token.
    pub locked: Value,
    /// When the escrow was opened.
    pub opened_at: Timestamp,
    /// Current state.
    pub state: DynEscrowState,
    /// The transition log.
    pub transition_log: Vec<TransitionRecord>,
}

impl DynEscrow {
    /// Attempt a transition with runtime validation.
    pub fn try_transition(
        &mut self,
        to: DynEscrowState,
        redeemer: Option<Redeemer>,
    ) -> Result<(), LifecycleError> {
        let valid = matches!((self.state, to), (DynEscrowState::Active, DynEscrowState::Closed));
        if !valid {
            return Err(LifecycleError::InvalidTransition {
                from: self.state.name().to_string(),
                to: to.name().to_string(),
            });
        }
        self.transition_log.push(TransitionRecord {
            from_state: self.state.name().to_string(),
            to_state: to.name().to_string(),
            timestamp: Timestamp::now(),
            redeemer,
        });
        self.state = to;
        Ok(())
    }

    /// Canonical state name.
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }
}

macro_rules! impl_into_dyn_escrow {
    ($state_type:ty, $dyn_variant:ident) => {
        impl From<Escrow<$state_type>> for DynEscrow {
            fn from(e: Escrow<$state_type>) -> Self {
                DynEscrow {
                    out_ref: e.out_ref,
                    record: e.record,
                    locked: e.locked,
                    opened_at: e.opened_at,
                    state: DynEscrowState::$dyn_variant,
                    transition_log: e.transition_log,
                }
            }
        }
    };
}

impl_into_dyn_escrow!(Active, Active);
impl_into_dyn_escrow!(Closed, Closed);
