//! Signer error types.

use thiserror::Error;

/// Errors that can occur during signing operations.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Secret material could not be parsed into a curve key.
    #[error("invalid secret key: {0}")]
    InvalidSecret(String),

    /// A signature string could not be decoded.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// The underlying cryptographic call failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Typed-data hashing failed.
    #[error("typed data hashing failed: {0}")]
    TypedData(String),
}
