//! Hex utilities (no external hex crate dependency).

use crate::error::IdentifierError;

/// Render bytes as a lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// First four bytes as hex, for `Debug` output.
pub fn prefix(bytes: &[u8]) -> String {
    encode(&bytes[..bytes.len().min(4)])
}

/// Decode a hex string of even length. Only `[0-9a-fA-F]` is accepted, so
/// every identifier has exactly one textual form up to case.
pub fn decode(hex: &str) -> Result<Vec<u8>, IdentifierError> {
    if hex.len() % 2 != 0 {
        return Err(IdentifierError::InvalidHex(
            "hex string must have even length".to_string(),
        ));
    }
    let nibble = |i: usize, c: u8| {
        char::from(c)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| IdentifierError::InvalidHex(format!("position {i}: {:?} is not a hex digit", char::from(c))))
    };
    hex.as_bytes()
        .chunks_exact(2)
        .enumerate()
        .map(|(pair, chunk)| -> Result<u8, IdentifierError> {
            let i = pair * 2;
            Ok(nibble(i, chunk[0])? << 4 | nibble(i + 1, chunk[1])?)
        })
        .collect()
}

/// Decode a hex string into a fixed-width array.
pub fn decode_array<const N: usize>(hex: &str) -> Result<[u8; N], IdentifierError> {
    let bytes = decode(hex)?;
    if bytes.len() != N {
        return Err(IdentifierError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}
