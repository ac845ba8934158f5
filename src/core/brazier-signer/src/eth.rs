//! Ethereum wire formats.
//!
//! Preimage framing and signed-transaction assembly. Everything here is pure
//! byte plumbing over `ethers-core` types; no key material is handled.

use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::transaction::eip712::{Eip712, TypedData};
use ethers_core::types::{Signature, U256};

use crate::error::SignerError;

/// ASCII prefix of the `personal_sign` message frame.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Builds the `personal_sign` preimage:
/// prefix, decimal byte length, then the message bytes.
pub fn personal_message_preimage(message: &[u8]) -> Vec<u8> {
    let length = message.len().to_string();

    let mut preimage =
        Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + length.len() + message.len());
    preimage.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    preimage.extend_from_slice(length.as_bytes());
    preimage.extend_from_slice(message);
    preimage
}

/// Computes the EIP-712 domain separator and struct hash for a typed-data
/// payload.
pub fn eip712_component_hashes(
    typed_data: &TypedData,
) -> Result<([u8; 32], [u8; 32]), SignerError> {
    let domain_separator = typed_data
        .domain_separator()
        .map_err(|e| SignerError::TypedData(e.to_string()))?;
    let struct_hash = typed_data
        .struct_hash()
        .map_err(|e| SignerError::TypedData(e.to_string()))?;

    Ok((domain_separator, struct_hash))
}

/// Builds the EIP-712 signing preimage:
/// `0x19 0x01 || domainSeparator || structHash`.
pub fn typed_data_preimage(domain_separator: [u8; 32], struct_hash: [u8; 32]) -> Vec<u8> {
    let mut preimage = Vec::with_capacity(2 + 32 + 32);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(&domain_separator);
    preimage.extend_from_slice(&struct_hash);
    preimage
}

/// Normalizes a signature to lowercase `0x`-prefixed hex.
pub fn normalize_signature_hex(signature: &str) -> String {
    let stripped = signature.strip_prefix("0x").unwrap_or(signature);
    format!("0x{}", stripped.to_lowercase())
}

/// Decodes a 65-byte `r || s || v` signature into its compact form and a raw
/// recovery id in `{0, 1}`. Accepts both `v` conventions (27/28 and 0/1).
pub fn decode_signature(signature: &str) -> Result<([u8; 64], u8), SignerError> {
    let stripped = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes =
        hex::decode(stripped).map_err(|e| SignerError::InvalidSignature(e.to_string()))?;

    if bytes.len() != 65 {
        return Err(SignerError::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }

    let mut rs = [0u8; 64];
    rs.copy_from_slice(&bytes[..64]);

    let recovery_id = match bytes[64] {
        27 | 28 => bytes[64] - 27,
        0 | 1 => bytes[64],
        v => {
            return Err(SignerError::InvalidSignature(format!(
                "invalid recovery byte: {v}"
            )))
        }
    };

    Ok((rs, recovery_id))
}

/// Computes the `v` value expected in the signed encoding of a transaction.
///
/// Legacy transactions fold the chain id in per EIP-155; typed envelopes
/// carry the raw y parity.
fn transaction_v(tx: &TypedTransaction, recovery_id: u8) -> u64 {
    match tx {
        TypedTransaction::Legacy(_) => match tx.chain_id() {
            Some(chain_id) => u64::from(recovery_id) + 35 + chain_id.as_u64() * 2,
            None => u64::from(recovery_id) + 27,
        },
        _ => u64::from(recovery_id),
    }
}

/// Appends a signature to an unsigned transaction and returns the serialized
/// signed transaction as `0x`-prefixed hex.
pub fn signed_transaction(tx: &TypedTransaction, signature: &str) -> Result<String, SignerError> {
    let (rs, recovery_id) = decode_signature(signature)?;

    let sig = Signature {
        r: U256::from_big_endian(&rs[..32]),
        s: U256::from_big_endian(&rs[32..]),
        v: transaction_v(tx, recovery_id),
    };

    Ok(format!("0x{}", hex::encode(tx.rlp_signed(&sig))))
}
