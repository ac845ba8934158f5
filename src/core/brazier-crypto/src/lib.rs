//! # Brazier Crypto
//!
//! Password-based envelope encryption for the Brazier keystore.
//!
//! Key material is persisted as a JSON envelope whose payload is encrypted
//! with AES-256-GCM under a key stretched from the user's password:
//! - Argon2id turns the password and a per-record salt into input key material
//! - HKDF-SHA256 binds that material to this crate's cipher context
//! - AES-256-GCM authenticates and encrypts the serialized payload

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aead;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod random;

pub use envelope::CipherEnvelope;
pub use error::CryptoError;
pub use keys::SymmetricKey;
