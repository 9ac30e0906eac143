//! # Asset Classes and Multi-Asset Values
//!
//! An [`AssetClass`] is a `(CurrencySymbol, TokenName)` pair. A [`Value`] maps
//! asset classes to integer quantities, stored nested as
//! `CurrencySymbol → TokenName → quantity`.
//!
//! ## Invariants
//!
//! - The native coin has the empty currency symbol and the empty token name.
//!   No other token name may sit under the empty currency symbol.
//! - A non-empty currency symbol is the hex of a 32-byte script hash.
//! - A token name is at most 32 bytes.
//! - A `Value` never stores a zero quantity, nor an empty inner map. Every
//!   operation re-normalizes, so derived `PartialEq` is value equality.
//!
//! Quantities are `i64` and may be negative: a mint field is a `Value` whose
//! burns are negative entries. Arithmetic saturates at the `i64` bounds.

use std::collections::BTreeMap;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentifierError;
use crate::identity::ScriptHash;

const MAX_TOKEN_NAME_BYTES: usize = 32;

// ─── CurrencySymbol ──────────────────────────────────────────────────

/// Policy id of an asset, or empty for the native coin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencySymbol(String);

impl CurrencySymbol {
    /// The currency symbol of the native coin.
    pub fn lovelace() -> Self {
        Self(String::new())
    }

    /// Currency symbol of the minting policy with this script hash.
    pub fn from_script_hash(hash: &ScriptHash) -> Self {
        Self(hash.to_hex())
    }

    /// Parse a currency symbol: empty, or 64 hex characters.
    pub fn new(s: &str) -> Result<Self, IdentifierError> {
        if s.is_empty() {
            return Ok(Self::lovelace());
        }
        let hash = ScriptHash::from_hex(s)?;
        Ok(Self::from_script_hash(&hash))
    }

    /// Whether this is the native coin's symbol.
    pub fn is_lovelace(&self) -> bool {
        self.0.is_empty()
    }

    /// Access the hex text (empty for the native coin).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CurrencySymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_lovelace() {
            f.write_str("lovelace")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl Serialize for CurrencySymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CurrencySymbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

// ─── TokenName ───────────────────────────────────────────────────────

/// Name of a token under a currency symbol, at most 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenName(String);

impl TokenName {
    /// The empty token name.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Validate and wrap a token name.
    pub fn new(s: impl Into<String>) -> Result<Self, IdentifierError> {
        let s = s.into();
        if s.len() > MAX_TOKEN_NAME_BYTES {
            return Err(IdentifierError::TokenNameTooLong(s.len()));
        }
        Ok(Self(s))
    }

    /// Access the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty name.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for TokenName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TokenName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

// ─── AssetClass ──────────────────────────────────────────────────────

/// A fungible or non-fungible asset type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "AssetClassRepr")]
pub struct AssetClass {
    currency: CurrencySymbol,
    token: TokenName,
}

#[derive(Deserialize)]
struct AssetClassRepr {
    currency: CurrencySymbol,
    token: TokenName,
}

impl TryFrom<AssetClassRepr> for AssetClass {
    type Error = IdentifierError;

    fn try_from(repr: AssetClassRepr) -> Result<Self, Self::Error> {
        Self::new(repr.currency, repr.token)
    }
}

impl AssetClass {
    /// Build an asset class, rejecting a named token under the native symbol.
    pub fn new(currency: CurrencySymbol, token: TokenName) -> Result<Self, IdentifierError> {
        if currency.is_lovelace() && !token.is_empty() {
            return Err(IdentifierError::InvalidAssetClass(format!(
                "native coin cannot carry token name {:?}",
                token.as_str()
            )));
        }
        Ok(Self { currency, token })
    }

    /// The native coin.
    pub fn lovelace() -> Self {
        Self {
            currency: CurrencySymbol::lovelace(),
            token: TokenName::empty(),
        }
    }

    /// A token minted under the policy with script hash `policy`.
    ///
    /// Infallible: a policy currency symbol is never the native coin's.
    pub fn from_policy(policy: &ScriptHash, token: TokenName) -> Self {
        Self {
            currency: CurrencySymbol::from_script_hash(policy),
            token,
        }
    }

    /// The currency symbol.
    pub fn currency(&self) -> &CurrencySymbol {
        &self.currency
    }

    /// The token name.
    pub fn token(&self) -> &TokenName {
        &self.token
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.currency.is_lovelace() {
            f.write_str("lovelace")
        } else {
            write!(f, "{}.{}", self.currency, self.token)
        }
    }
}

// ─── Value ───────────────────────────────────────────────────────────

type Nested = BTreeMap<CurrencySymbol, BTreeMap<TokenName, i64>>;

/// A multi-asset quantity map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Nested")]
pub struct Value(Nested);

impl TryFrom<Nested> for Value {
    type Error = IdentifierError;

    fn try_from(raw: Nested) -> Result<Self, Self::Error> {
        let mut value = Value::new();
        for (currency, tokens) in raw {
            for (token, qty) in tokens {
                let asset = AssetClass::new(currency.clone(), token)?;
                value.add_quantity(&asset, qty);
            }
        }
        Ok(value)
    }
}

impl Value {
    /// The empty value.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A value holding `quantity` of a single asset class.
    pub fn singleton(asset: &AssetClass, quantity: i64) -> Self {
        let mut v = Self::new();
        v.add_quantity(asset, quantity);
        v
    }

    /// A value holding only native coin.
    pub fn lovelace(quantity: i64) -> Self {
        Self::singleton(&AssetClass::lovelace(), quantity)
    }

    /// Quantity of `asset` held, 0 if absent.
    pub fn value_of(&self, asset: &AssetClass) -> i64 {
        self.0
            .get(asset.currency())
            .and_then(|tokens| tokens.get(asset.token()))
            .copied()
            .unwrap_or(0)
    }

    /// Whether no asset class has a non-zero quantity.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct asset classes with a non-zero quantity.
    pub fn asset_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// All `(asset class, quantity)` entries in canonical order.
    pub fn flatten(&self) -> Vec<(AssetClass, i64)> {
        self.0
            .iter()
            .flat_map(|(currency, tokens)| {
                tokens.iter().map(move |(token, qty)| {
                    (
                        AssetClass {
                            currency: currency.clone(),
                            token: token.clone(),
                        },
                        *qty,
                    )
                })
            })
            .collect()
    }

    /// Whether every held quantity is positive (zero entries are never stored).
    pub fn is_non_negative(&self) -> bool {
        self.0.values().flat_map(BTreeMap::values).all(|qty| *qty > 0)
    }

    /// Component-wise `self ≥ other` over the asset classes of `other`.
    ///
    /// Asset classes that appear only in `self` are not consulted: extra
    /// holdings never make a payment insufficient.
    pub fn covers(&self, other: &Value) -> bool {
        other
            .flatten()
            .iter()
            .all(|(asset, qty)| self.value_of(asset) >= *qty)
    }

    /// Add `quantity` of `asset`, dropping the entry if it reaches zero.
    pub fn add_quantity(&mut self, asset: &AssetClass, quantity: i64) {
        if quantity == 0 {
            return;
        }
        let tokens = self.0.entry(asset.currency().clone()).or_default();
        let entry = tokens.entry(asset.token().clone()).or_insert(0);
        *entry = entry.saturating_add(quantity);
        if *entry == 0 {
            tokens.remove(asset.token());
        }
        if tokens.is_empty() {
            self.0.remove(asset.currency());
        }
    }

    /// Remove an asset class entirely, returning what it held.
    pub fn take(&mut self, asset: &AssetClass) -> i64 {
        let qty = self.value_of(asset);
        self.add_quantity(asset, qty.saturating_neg());
        qty
    }
}

impl Add<&Value> for &Value {
    type Output = Value;

    fn add(self, rhs: &Value) -> Value {
        let mut out = self.clone();
        for (asset, qty) in rhs.flatten() {
            out.add_quantity(&asset, qty);
        }
        out
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        &self + &rhs
    }
}

impl Sub<&Value> for &Value {
    type Output = Value;

    fn sub(self, rhs: &Value) -> Value {
        self + &(-rhs)
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        &self - &rhs
    }
}

impl Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        let mut out = Value::new();
        for (asset, qty) in self.flatten() {
            out.add_quantity(&asset, qty.saturating_neg());
        }
        out
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        -&self
    }
}

impl<'a> std::iter::Sum<&'a Value> for Value {
    fn sum<I: Iterator<Item = &'a Value>>(iter: I) -> Value {
        iter.fold(Value::new(), |acc, v| &acc + v)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .flatten()
            .iter()
            .map(|(asset, qty)| format!("{qty} {asset}"))
            .collect();
        if parts.is_empty() {
            f.write_str("0")
        } else {
            f.write_str(&parts.join(" + "))
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn asset() -> impl Strategy<Value = AssetClass> {
        prop_oneof![
            Just(AssetClass::lovelace()),
            (0u8..4, "[a-z]{0,4}").prop_map(|(b, name)| {
                AssetClass::new(
                    CurrencySymbol::from_script_hash(&ScriptHash::from_bytes([b; 32])),
                    TokenName::new(name).unwrap(),
                )
                .unwrap()
            }),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        prop::collection::vec((asset(), -1_000_000i64..1_000_000), 0..6).prop_map(|entries| {
            let mut v = Value::new();
            for (a, q) in entries {
                v.add_quantity(&a, q);
            }
            v
        })
    }

    proptest! {
        #[test]
        fn add_then_sub_is_identity(a in value(), b in value()) {
            prop_assert_eq!(&(&a + &b) - &b, a);
        }

        #[test]
        fn addition_commutes(a in value(), b in value()) {
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn value_covers_itself(a in value()) {
            prop_assert!(a.covers(&a));
        }

        #[test]
        fn flatten_never_reports_zero(a in value(), b in value()) {
            let sum = &a + &b;
            prop_assert!(sum.flatten().iter().all(|(_, q)| *q != 0));
        }
    }
}
