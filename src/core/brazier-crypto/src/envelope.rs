//! The persisted cipher envelope.
//!
//! [`seal`] and [`open`] are the two halves of the cipher service used by the
//! keystore: any serde-serializable payload goes in, a JSON-friendly envelope
//! comes out. The envelope carries everything needed to re-derive the cipher
//! key except the password itself.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::aead;
use crate::error::CryptoError;
use crate::kdf::derive_password_key;
use crate::random::generate_salt;

/// Cipher method tag written into every envelope.
const CIPHER_METHOD: &str = "aes-256-gcm";

/// A password-encrypted payload as persisted in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherEnvelope {
    /// Cipher identifier, currently always `aes-256-gcm`.
    pub method: String,
    /// Base64 salt for password key derivation.
    pub salt: String,
    /// Base64 framed ciphertext (`nonce || ciphertext || tag`).
    pub data: String,
}

/// Encrypts a serializable value under a password.
///
/// A fresh salt is generated per call, so sealing the same value twice
/// produces different envelopes.
pub fn seal<T: Serialize>(password: &str, value: &T) -> Result<CipherEnvelope, CryptoError> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(value).map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))?,
    );

    let salt = generate_salt();
    let key = derive_password_key(password, &salt)?;
    let framed = aead::encrypt(&key, &plaintext)?;

    Ok(CipherEnvelope {
        method: CIPHER_METHOD.to_string(),
        salt: BASE64.encode(salt),
        data: BASE64.encode(framed),
    })
}

/// Decrypts an envelope back into its payload.
///
/// # Errors
///
/// - [`CryptoError::MalformedEnvelope`] if the method tag, base64 fields, or
///   decrypted payload cannot be interpreted
/// - [`CryptoError::CipherRejected`] if the password is wrong or the
///   ciphertext was tampered with
pub fn open<T: DeserializeOwned>(
    password: &str,
    envelope: &CipherEnvelope,
) -> Result<T, CryptoError> {
    if envelope.method != CIPHER_METHOD {
        return Err(CryptoError::MalformedEnvelope(format!(
            "unsupported cipher method: {}",
            envelope.method
        )));
    }

    let salt = BASE64
        .decode(&envelope.salt)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid salt encoding: {e}")))?;
    let framed = BASE64
        .decode(&envelope.data)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid data encoding: {e}")))?;

    let key = derive_password_key(password, &salt)?;
    let plaintext = aead::decrypt(&key, &framed)?;

    serde_json::from_slice(&plaintext)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid payload: {e}")))
}
