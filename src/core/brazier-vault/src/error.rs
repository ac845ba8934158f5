//! Vault error types.

use thiserror::Error;

/// Errors that can occur in the key vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No stored record exists for the account.
    #[error("encrypted data not found for account {0}")]
    EncryptedDataNotFound(String),

    /// A record decrypted successfully but holds no secret.
    #[error("private key not found")]
    PrivateKeyNotFound,

    /// The stored payload could not be decoded.
    #[error("malformed key record: {0}")]
    Decode(String),

    /// The cipher rejected the record under the supplied password.
    #[error("wrong password")]
    WrongPassword,

    /// The password provider could not produce a password.
    #[error("password unavailable: {0}")]
    Password(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Cryptographic error.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Signer error.
    #[error("signer error: {0}")]
    Signer(String),
}

impl From<brazier_crypto::CryptoError> for VaultError {
    fn from(e: brazier_crypto::CryptoError) -> Self {
        use brazier_crypto::CryptoError;

        match e {
            CryptoError::CipherRejected => VaultError::WrongPassword,
            CryptoError::MalformedEnvelope(msg) => VaultError::Decode(msg),
            other => VaultError::Crypto(other.to_string()),
        }
    }
}

impl From<brazier_storage::StorageError> for VaultError {
    fn from(e: brazier_storage::StorageError) -> Self {
        VaultError::Storage(e.to_string())
    }
}

impl From<brazier_signer::SignerError> for VaultError {
    fn from(e: brazier_signer::SignerError) -> Self {
        VaultError::Signer(e.to_string())
    }
}
