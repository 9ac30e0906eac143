//! Shared fixture: one receiver, one sender, one escrow of 50 lovelace
//! asking 100 lovelace in return.

#![allow(dead_code)]

use esc_core::{
    Address, AssetClass, PubKeyHash, TokenName, TransactionView, TxId, TxInInfo, TxOut, TxOutRef,
    Value,
};
use esc_validator::{EscrowRecord, EscrowValidator};

pub fn sender() -> PubKeyHash {
    PubKeyHash::from_bytes([0x5e; 32])
}

pub fn receiver() -> PubKeyHash {
    PubKeyHash::from_bytes([0x4e; 32])
}

pub fn validator() -> EscrowValidator {
    EscrowValidator::new(Address::PubKey(receiver())).expect("receiver is a key address")
}

pub fn script() -> Address {
    *validator().script_address()
}

pub fn control_token(name: &str) -> AssetClass {
    validator()
        .minting_policy()
        .control_token(TokenName::new(name).expect("short name"))
}

pub fn record() -> EscrowRecord {
    EscrowRecord {
        sender: Address::PubKey(sender()),
        requested: AssetClass::lovelace(),
        amount: 100,
        control_token: control_token("escrow-a"),
    }
}

pub fn locked() -> Value {
    Value::lovelace(50)
}

/// A start transaction that the policy accepts.
pub fn start_view() -> TransactionView {
    let r = record();
    TransactionView {
        inputs: vec![TxInInfo {
            out_ref: TxOutRef::new(TxId::from_bytes([1; 32]), 0),
            resolved: TxOut::new(Address::PubKey(sender()), Value::lovelace(1_000)),
        }],
        outputs: vec![TxOut::with_datum(
            script(),
            &locked() + &Value::singleton(&r.control_token, 1),
            r.to_datum().expect("record encodes"),
        )],
        mint: Value::singleton(&r.control_token, 1),
        signatories: vec![sender()],
    }
}

/// The escrow output created by [`start_view`], as a spendable input.
pub fn escrow_input(record: &EscrowRecord, index: u32) -> TxInInfo {
    TxInInfo {
        out_ref: TxOutRef::new(TxId::from_bytes([2; 32]), index),
        resolved: TxOut::with_datum(
            script(),
            &locked() + &Value::singleton(&record.control_token, 1),
            record.to_datum().expect("record encodes"),
        ),
    }
}

pub fn cancel_view() -> TransactionView {
    let r = record();
    TransactionView {
        inputs: vec![escrow_input(&r, 0)],
        outputs: vec![TxOut::new(Address::PubKey(sender()), locked())],
        mint: Value::singleton(&r.control_token, -1),
        signatories: vec![sender()],
    }
}

pub fn resolve_view() -> TransactionView {
    let r = record();
    TransactionView {
        inputs: vec![escrow_input(&r, 0)],
        outputs: vec![
            TxOut::new(Address::PubKey(sender()), Value::lovelace(100)),
            TxOut::new(Address::PubKey(receiver()), locked()),
        ],
        mint: Value::singleton(&r.control_token, -1),
        signatories: vec![receiver()],
    }
}
