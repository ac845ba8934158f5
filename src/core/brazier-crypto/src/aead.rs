//! AES-256-GCM authenticated encryption.
//!
//! Ciphertext framing: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! The nonce is generated per call and prepended so a record is a single
//! opaque byte string.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::SymmetricKey;
use crate::random::{generate_nonce, NONCE_SIZE};

/// Size of a GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encrypts plaintext under the given key.
///
/// Returns the framed ciphertext with prepended nonce and appended tag.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let nonce_bytes = generate_nonce();
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut framed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&ciphertext);

    Ok(framed)
}

/// Decrypts framed ciphertext produced by [`encrypt`].
///
/// The plaintext is wrapped in `Zeroizing` so it is erased once dropped.
/// A wrong key and a tampered ciphertext are indistinguishable here; both
/// fail tag verification and surface as [`CryptoError::CipherRejected`].
pub fn decrypt(key: &SymmetricKey, framed: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if framed.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::MalformedEnvelope(
            "ciphertext too short".to_string(),
        ));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

    let nonce = Nonce::from_slice(&framed[..NONCE_SIZE]);
    let plaintext = cipher
        .decrypt(nonce, &framed[NONCE_SIZE..])
        .map_err(|_| CryptoError::CipherRejected)?;

    Ok(Zeroizing::new(plaintext))
}
