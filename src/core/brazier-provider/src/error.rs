//! Provider error types.

use thiserror::Error;

/// Faults surfaced by provider operations before the failure funnel
/// swallows them.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The vault could not produce usable secret material.
    #[error(transparent)]
    Vault(#[from] brazier_vault::VaultError),

    /// A delegated cryptographic call failed.
    #[error("signer failure: {0}")]
    Signer(#[from] brazier_signer::SignerError),
}
