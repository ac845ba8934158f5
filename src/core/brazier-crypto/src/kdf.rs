//! Password key derivation.
//!
//! Derives AES-256 keys from user passwords in two steps: Argon2id stretches
//! the password with a per-record salt, then HKDF-SHA256 expands the result
//! under this crate's context string. Records encrypted by other Brazier
//! versions or other tools cannot collide with keys derived here unless they
//! use the same context.

use argon2::Argon2;
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::{SymmetricKey, KEY_SIZE};

/// Domain separation for password-derived cipher keys.
const PASSWORD_KEY_CONTEXT: &[u8] = b"brazier-keystore-v1:password-cipher";

/// Derives an AES-256 key from a password and salt.
///
/// Deterministic: the same password and salt always produce the same key.
///
/// # Errors
///
/// Fails if the underlying Argon2 or HKDF invocation rejects its inputs
/// (e.g. an empty salt).
pub fn derive_password_key(password: &str, salt: &[u8]) -> Result<SymmetricKey, CryptoError> {
    let mut ikm = Zeroizing::new([0u8; KEY_SIZE]);
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut *ikm)
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;

    let hkdf = Hkdf::<Sha256>::new(None, &*ikm);
    let mut okm = Zeroizing::new([0u8; KEY_SIZE]);
    hkdf.expand(PASSWORD_KEY_CONTEXT, &mut *okm)
        .map_err(|_| CryptoError::KeyDerivationFailed("HKDF expansion failed".to_string()))?;

    SymmetricKey::from_bytes(&*okm)
}
