//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivationFailed(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// The cipher rejected the ciphertext (wrong key or tampered data).
    #[error("cipher rejected ciphertext")]
    CipherRejected,

    /// Invalid key format or size.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Malformed envelope or payload.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
}
