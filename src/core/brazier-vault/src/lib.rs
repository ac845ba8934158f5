//! # Brazier Vault
//!
//! The key vault: turns an opaque encrypted record into usable secret
//! material.
//!
//! Records live in a [`StorageBackend`] at `hot_<lowercased-account>`, one
//! per account. Two on-disk shapes exist (see [`record`]); reads migrate the
//! legacy shape to the current one in place, so a record is only ever legacy
//! until first touched. Secrets exist in cleartext only transiently, inside
//! a single operation.
//!
//! Operations on different accounts are fully independent. Concurrent
//! operations on the *same* account (a migrating read racing a password
//! rotation, two rotations) are not coordinated here; the storage backend's
//! last-write-wins semantics apply.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod password;
pub mod record;

use tracing::{debug, info};

use brazier_crypto::envelope;
use brazier_signer::Signer;
use brazier_storage::StorageBackend;

pub use error::VaultError;
pub use password::{PasswordProvider, StaticPassword};
pub use record::{Share, ShareRecord, StoredRecord};

use record::LegacyKey;

/// Prefix of every record key.
pub const STORAGE_PREFIX: &str = "hot";

/// The key vault over a storage backend.
pub struct KeyVault<S: StorageBackend> {
    storage: S,
}

impl<S: StorageBackend> KeyVault<S> {
    /// Creates a vault over the given storage backend.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The storage key for an account: `hot_<lowercased-account>`.
    pub fn storage_key(account_id: &str) -> String {
        format!("{STORAGE_PREFIX}_{}", account_id.to_lowercase())
    }

    /// Creates an account record from raw secret material.
    ///
    /// Derives the account identity via the signer, wraps the secret as a
    /// degenerate single share carrying the account's public key, encrypts
    /// it under the provided password, and persists it. Always writes the
    /// current record shape. Returns the lowercased account id.
    pub async fn initialize(
        &self,
        secret_material: &str,
        signer: &dyn Signer,
        password_provider: &dyn PasswordProvider,
    ) -> Result<String, VaultError> {
        let password = password_provider.password().await?;
        let info = signer.account_info(secret_material).await?;
        let account = info.address.to_lowercase();

        let mut share = Share::from_private_key(secret_material);
        share.public_share = Some(info.public_key);

        let stored = record::encrypt_share(&share, &password)?;
        let value =
            serde_json::to_string(&stored).map_err(|e| VaultError::Decode(e.to_string()))?;
        self.storage.set(&Self::storage_key(&account), &value).await?;

        info!(account = %account, "key record initialized");
        Ok(account)
    }

    /// Retrieves the share for an account.
    ///
    /// Legacy records are decrypted to their raw private key, normalized
    /// into a share, re-encrypted under the same password, and written back
    /// in place; from then on the account only ever has the current shape.
    ///
    /// # Errors
    ///
    /// - [`VaultError::EncryptedDataNotFound`] if no record exists
    /// - [`VaultError::Decode`] if the stored payload matches neither shape
    /// - [`VaultError::WrongPassword`] if the cipher rejects the record
    /// - [`VaultError::PrivateKeyNotFound`] if the decrypted secret is empty
    pub async fn retrieve(
        &self,
        account_id: &str,
        password_provider: &dyn PasswordProvider,
    ) -> Result<Share, VaultError> {
        let password = password_provider.password().await?;
        let key = Self::storage_key(account_id);

        let raw = self
            .storage
            .get(&key)
            .await?
            .ok_or_else(|| VaultError::EncryptedDataNotFound(account_id.to_string()))?;

        let stored: StoredRecord =
            serde_json::from_str(&raw).map_err(|e| VaultError::Decode(e.to_string()))?;

        let share = match stored {
            StoredRecord::Share(share_record) => record::decrypt_share(&share_record, &password)?,
            StoredRecord::Legacy(legacy_envelope) => {
                let mut legacy: LegacyKey = envelope::open(&password, &legacy_envelope)?;
                let share = Share::from_private_key(std::mem::take(&mut legacy.private_key));

                let migrated = record::encrypt_share(&share, &password)?;
                let value = serde_json::to_string(&migrated)
                    .map_err(|e| VaultError::Decode(e.to_string()))?;
                self.storage.set(&key, &value).await?;

                info!(account = %account_id, "legacy key record migrated");
                share
            }
        };

        if share.secret_is_empty() {
            return Err(VaultError::PrivateKeyNotFound);
        }

        Ok(share)
    }

    /// Re-encrypts an account's record under a new password.
    pub async fn rotate_password(
        &self,
        account_id: &str,
        old_password_provider: &dyn PasswordProvider,
        new_password: &str,
    ) -> Result<(), VaultError> {
        let share = self.retrieve(account_id, old_password_provider).await?;

        let stored = record::encrypt_share(&share, new_password)?;
        let value =
            serde_json::to_string(&stored).map_err(|e| VaultError::Decode(e.to_string()))?;
        self.storage
            .set(&Self::storage_key(account_id), &value)
            .await?;

        info!(account = %account_id, "record password rotated");
        Ok(())
    }

    /// Deletes an account's record. Removing an absent record is not an
    /// error.
    pub async fn remove(&self, account_id: &str) -> Result<(), VaultError> {
        self.storage.remove(&Self::storage_key(account_id)).await?;

        debug!(account = %account_id, "key record removed");
        Ok(())
    }
}
