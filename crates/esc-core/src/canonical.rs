//! # Canonical Serialization
//!
//! Records attached to escrow outputs, draft bodies that get signed, and
//! script-hash preimages are all JSON made canonical under RFC 8785 (JCS):
//! sorted keys, no whitespace, integers only. A builder on one machine and a
//! validator on another therefore see the same record bytes, and a receiver
//! maps to one script address everywhere.
//!
//! [`CanonicalBytes`] can only be built by [`CanonicalBytes::new`], so holding
//! one proves the bytes went through this path. Floats are refused: ledger
//! quantities are `i64` and JCS number formatting for floats is not stable
//! across serializers.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// JCS bytes of a float-free value. Constructed only by [`CanonicalBytes::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` on a non-integral number anywhere in the value;
    /// `SerializationFailed` if serde or JCS fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        ensure_integral(&value)?;
        Ok(Self(serde_jcs::to_vec(&value)?))
    }

    /// The bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a serialized value; present for `len` symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk `value` and fail on the first non-integral number.
fn ensure_integral(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) if !(n.is_i64() || n.is_u64()) => {
            Err(CanonicalizationError::FloatRejected(n.as_f64().unwrap_or(f64::NAN)))
        }
        Value::Array(items) => items.iter().try_for_each(ensure_integral),
        Value::Object(map) => map.values().try_for_each(ensure_integral),
        _ => Ok(()),
    }
}
