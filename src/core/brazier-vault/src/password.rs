//! Password acquisition.
//!
//! Passwords are supplied per call by an async provider; acquiring one may
//! involve user interaction and can suspend indefinitely. This layer imposes
//! no timeout. Passwords are never persisted.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::error::VaultError;

/// Supplies the password protecting an account's record.
#[async_trait]
pub trait PasswordProvider: Send + Sync {
    /// Produces the password for the current operation.
    async fn password(&self) -> Result<Zeroizing<String>, VaultError>;
}

/// A fixed password, for programmatic use and tests.
pub struct StaticPassword(Zeroizing<String>);

impl StaticPassword {
    /// Wraps a password string.
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }
}

#[async_trait]
impl PasswordProvider for StaticPassword {
    async fn password(&self) -> Result<Zeroizing<String>, VaultError> {
        Ok(self.0.clone())
    }
}
