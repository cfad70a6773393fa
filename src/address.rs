//! Recipient address normalization
//!
//! Router transfer messages carry the destination recipient as a 32-byte
//! value, hex-encoded without a `0x` prefix. Inputs arrive either as
//! 0x-prefixed hex (EVM) or bech32 (Cosmos, Solana-style addresses excluded),
//! with raw lengths of 20 or 32 bytes.

use bech32::FromBase32;

use crate::error::AdapterError;

/// Normalize a recipient address to a left-padded 32-byte value.
///
/// Accepts 0x-prefixed (or bare) hex of 20 or 32 bytes, and bech32 addresses
/// whose data part decodes to 20 or 32 bytes.
pub fn recipient_to_bytes32(addr: &str) -> Result<[u8; 32], AdapterError> {
    let bytes = if let Some(hex_str) = addr.strip_prefix("0x") {
        hex::decode(hex_str)
            .map_err(|e| AdapterError::query(format!("invalid hex recipient '{}': {}", addr, e)))?
    } else if addr.chars().all(|c| c.is_ascii_hexdigit()) && (addr.len() == 40 || addr.len() == 64)
    {
        hex::decode(addr)
            .map_err(|e| AdapterError::query(format!("invalid hex recipient '{}': {}", addr, e)))?
    } else {
        decode_bech32_raw(addr)?
    };

    left_pad_32(&bytes).ok_or_else(|| AdapterError::query(format!(
        "recipient '{}' decodes to {} bytes, expected 20 or 32",
        addr,
        bytes.len()
    )))
}

/// Hex-encode a 32-byte recipient without the `0x` prefix, as the router
/// message format requires.
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    hex::encode(bytes)
}

/// Decode a bech32 address to raw bytes (20-byte wallet or 32-byte contract).
fn decode_bech32_raw(addr: &str) -> Result<Vec<u8>, AdapterError> {
    let (_hrp, data, _variant) = bech32::decode(addr)
        .map_err(|e| AdapterError::query(format!("invalid bech32 recipient '{}': {}", addr, e)))?;

    Vec::<u8>::from_base32(&data)
        .map_err(|e| AdapterError::query(format!("invalid base32 data in '{}': {}", addr, e)))
}

fn left_pad_32(bytes: &[u8]) -> Option<[u8; 32]> {
    match bytes.len() {
        20 => {
            let mut result = [0u8; 32];
            result[12..].copy_from_slice(bytes);
            Some(result)
        }
        32 => {
            let mut result = [0u8; 32];
            result.copy_from_slice(bytes);
            Some(result)
        }
        _ => None,
    }
}
