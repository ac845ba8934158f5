//! # Brazier Provider
//!
//! The signing provider: account-info retrieval, three signing operations,
//! and record lifecycle over one bound account.
//!
//! Every public operation except [`SigningProvider::account_id`] runs under
//! the failure funnel: faults never escape as errors. A failing operation
//! reports `(operation, success=false)` through the observer and returns a
//! benign default (empty string, empty struct, unit); a successful one
//! reports `(operation, success=true)` after producing its real result.
//! Panics are outside the funnel and propagate.
//!
//! A provider is constructed already bound to its account, either by
//! [`SigningProvider::initialize`] (creates the record and derives the
//! account) or [`SigningProvider::restore`] (adopts an existing account id).
//! It never unbinds; [`SigningProvider::clean`] clears persisted state only.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod observer;

use std::future::Future;
use std::sync::Arc;

use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::transaction::eip712::TypedData;
use tracing::warn;

use brazier_signer::{eth, AccountInfo, Signer};
use brazier_storage::StorageBackend;
use brazier_vault::{KeyVault, PasswordProvider, VaultError};

pub use error::ProviderError;
pub use observer::{NoopObserver, Operation, ProviderObserver, RecordingObserver};

/// A signing provider bound to one account.
pub struct SigningProvider<S: StorageBackend> {
    account: String,
    vault: KeyVault<S>,
    signer: Arc<dyn Signer>,
    password_provider: Arc<dyn PasswordProvider>,
    observer: Arc<dyn ProviderObserver>,
}

impl<S: StorageBackend> SigningProvider<S> {
    /// Creates a new account record from raw secret material and returns a
    /// provider bound to the derived account.
    ///
    /// This is the only path that creates a record from scratch. Unlike the
    /// funneled operations, creation faults propagate: there is no bound
    /// account to fall back to.
    pub async fn initialize(
        secret_material: &str,
        storage: S,
        signer: Arc<dyn Signer>,
        password_provider: Arc<dyn PasswordProvider>,
    ) -> Result<Self, ProviderError> {
        let vault = KeyVault::new(storage);
        let account = vault
            .initialize(secret_material, signer.as_ref(), password_provider.as_ref())
            .await?;

        Ok(Self {
            account,
            vault,
            signer,
            password_provider,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Binds a provider to an already-initialized account.
    pub fn restore(
        account_id: &str,
        storage: S,
        signer: Arc<dyn Signer>,
        password_provider: Arc<dyn PasswordProvider>,
    ) -> Self {
        Self {
            account: account_id.to_lowercase(),
            vault: KeyVault::new(storage),
            signer,
            password_provider,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replaces the outcome observer.
    pub fn with_observer(mut self, observer: Arc<dyn ProviderObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The bound account id. No I/O, no failure.
    pub fn account_id(&self) -> &str {
        &self.account
    }

    /// Runs an operation body under the failure funnel.
    async fn guarded<T, F>(&self, operation: Operation, default: T, body: F) -> T
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match body.await {
            Ok(value) => {
                self.observer.on_operation(operation, true);
                value
            }
            Err(err) => {
                warn!(operation = %operation, error = %err, "provider operation failed");
                self.observer.on_operation(operation, false);
                default
            }
        }
    }

    /// Returns the account's compressed public key and address.
    ///
    /// On any fault, returns an empty [`AccountInfo`] and reports failure.
    pub async fn get_account_info(&self) -> AccountInfo {
        self.guarded(Operation::GetAccountInfo, AccountInfo::default(), async {
            let share = self
                .vault
                .retrieve(&self.account, self.password_provider.as_ref())
                .await?;
            let info = self.signer.account_info(share.secret_hex()).await?;
            Ok(info)
        })
        .await
    }

    /// Signs a transaction and returns the serialized signed transaction as
    /// `0x`-hex, or `""` on any fault.
    pub async fn sign_transaction(&self, tx: &TypedTransaction) -> String {
        self.guarded(Operation::SignTransaction, String::new(), async {
            let share = self
                .vault
                .retrieve(&self.account, self.password_provider.as_ref())
                .await?;
            if share.secret_is_empty() {
                return Err(VaultError::PrivateKeyNotFound.into());
            }

            let digest = tx.sighash().to_fixed_bytes();
            let signature = self.signer.sign_digest(share.secret_hex(), digest).await?;

            Ok(eth::signed_transaction(tx, &signature)?)
        })
        .await
    }

    /// Signs a `personal_sign` message and returns the normalized
    /// `0x`-prefixed signature, or `""` on any fault.
    pub async fn sign_personal_message(&self, message: &[u8]) -> String {
        self.guarded(Operation::SignPersonalMessage, String::new(), async {
            let share = self
                .vault
                .retrieve(&self.account, self.password_provider.as_ref())
                .await?;

            let preimage = eth::personal_message_preimage(message);
            let signature = self.signer.sign(share.secret_hex(), &preimage).await?;

            Ok(eth::normalize_signature_hex(&signature))
        })
        .await
    }

    /// Signs EIP-712 typed data and returns the `r || s || v` signature, or
    /// `""` on any fault.
    pub async fn sign_typed_data(&self, typed_data: &TypedData) -> String {
        self.guarded(Operation::SignTypedData, String::new(), async {
            let share = self
                .vault
                .retrieve(&self.account, self.password_provider.as_ref())
                .await?;

            let (domain_separator, struct_hash) = eth::eip712_component_hashes(typed_data)?;
            let preimage = eth::typed_data_preimage(domain_separator, struct_hash);
            let signature = self.signer.sign(share.secret_hex(), &preimage).await?;

            Ok(signature)
        })
        .await
    }

    /// Re-encrypts the account's record under a new pin.
    pub async fn update_pin(&self, new_pin: &str) {
        self.guarded(Operation::UpdatePin, (), async {
            self.vault
                .rotate_password(&self.account, self.password_provider.as_ref(), new_pin)
                .await?;
            Ok(())
        })
        .await
    }

    /// Deletes the account's stored record. The provider itself stays bound.
    pub async fn clean(&self) {
        self.guarded(Operation::Clean, (), async {
            self.vault.remove(&self.account).await?;
            Ok(())
        })
        .await
    }
}
