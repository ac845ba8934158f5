//! # Brazier Signer
//!
//! The signing service behind the Brazier provider: account derivation and
//! recoverable ECDSA over secp256k1, plus the Ethereum wire formats the
//! provider needs (transaction RLP, personal-message preimage, EIP-712
//! digest).
//!
//! Secret material is passed in as hex strings per call and never stored by
//! this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod eth;

use async_trait::async_trait;
use ethers_core::utils::keccak256;
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub use error::SignerError;

/// Public identity derived from secret material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Compressed public key, `0x`-prefixed hex (33 bytes).
    #[serde(rename = "publicKey")]
    pub public_key: String,
    /// Account address, `0x`-prefixed lowercase hex (20 bytes).
    pub address: String,
}

/// The signing service the vault and provider delegate to.
///
/// Implementations sign whatever digest they are handed; message framing
/// (personal-message prefix, EIP-712 envelope, transaction sighash) is the
/// caller's job, with helpers in [`eth`].
#[async_trait]
pub trait Signer: Send + Sync {
    /// Derives the public key and address for the given secret material.
    async fn account_info(&self, secret: &str) -> Result<AccountInfo, SignerError>;

    /// Signs a 32-byte digest, returning a 65-byte `r || s || v` signature
    /// as `0x`-prefixed hex with `v` in `{27, 28}`.
    async fn sign_digest(&self, secret: &str, digest: [u8; 32]) -> Result<String, SignerError>;

    /// Hashes a preimage with Keccak-256 and signs the digest.
    async fn sign(&self, secret: &str, preimage: &[u8]) -> Result<String, SignerError> {
        self.sign_digest(secret, keccak256(preimage)).await
    }
}

/// [`Signer`] implementation over libsecp256k1.
pub struct Secp256k1Signer {
    secp: Secp256k1<All>,
}

impl Secp256k1Signer {
    /// Creates a signer with a fresh secp256k1 context.
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    fn parse_secret(secret: &str) -> Result<SecretKey, SignerError> {
        let stripped = secret.strip_prefix("0x").unwrap_or(secret);
        let bytes = Zeroizing::new(
            hex::decode(stripped).map_err(|e| SignerError::InvalidSecret(e.to_string()))?,
        );
        SecretKey::from_slice(&bytes).map_err(|e| SignerError::InvalidSecret(e.to_string()))
    }

    fn derive_address(public_key: &PublicKey) -> String {
        let uncompressed = public_key.serialize_uncompressed();
        // Keccak of the raw point, skipping the 0x04 prefix; address is the last 20 bytes
        let hashed = keccak256(&uncompressed[1..]);
        format!("0x{}", hex::encode(&hashed[12..]))
    }
}

impl Default for Secp256k1Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secp256k1Signer").finish()
    }
}

#[async_trait]
impl Signer for Secp256k1Signer {
    async fn account_info(&self, secret: &str) -> Result<AccountInfo, SignerError> {
        let secret_key = Self::parse_secret(secret)?;
        let public_key = secret_key.public_key(&self.secp);

        Ok(AccountInfo {
            public_key: format!("0x{}", hex::encode(public_key.serialize())),
            address: Self::derive_address(&public_key),
        })
    }

    async fn sign_digest(&self, secret: &str, digest: [u8; 32]) -> Result<String, SignerError> {
        let secret_key = Self::parse_secret(secret)?;
        let message = Message::from_digest(digest);

        let signature = self.secp.sign_ecdsa_recoverable(&message, &secret_key);
        let (recovery_id, rs) = signature.serialize_compact();

        let mut raw = [0u8; 65];
        raw[..64].copy_from_slice(&rs);
        raw[64] = 27 + i32::from(recovery_id) as u8;

        Ok(format!("0x{}", hex::encode(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};

    // Well-known development key, first account of the standard test mnemonic.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[tokio::test]
    async fn test_account_info_known_key() {
        let signer = Secp256k1Signer::new();
        let info = signer.account_info(DEV_KEY).await.unwrap();

        assert_eq!(info.address, DEV_ADDRESS);
        assert_eq!(info.public_key.len(), 2 + 66);
        assert!(info.public_key.starts_with("0x02") || info.public_key.starts_with("0x03"));
    }

    #[tokio::test]
    async fn test_account_info_without_prefix() {
        let signer = Secp256k1Signer::new();
        let info = signer
            .account_info(DEV_KEY.trim_start_matches("0x"))
            .await
            .unwrap();
        assert_eq!(info.address, DEV_ADDRESS);
    }

    #[tokio::test]
    async fn test_invalid_secret_rejected() {
        let signer = Secp256k1Signer::new();
        let result = signer.account_info("0xzznothex").await;
        assert!(matches!(result, Err(SignerError::InvalidSecret(_))));
    }

    #[tokio::test]
    async fn test_sign_digest_recovers_to_signer() {
        let signer = Secp256k1Signer::new();
        let digest = keccak256(b"brazier signer test");

        let sig_hex = signer.sign_digest(DEV_KEY, digest).await.unwrap();
        let sig_bytes = hex::decode(sig_hex.trim_start_matches("0x")).unwrap();
        assert_eq!(sig_bytes.len(), 65);

        let recovery_id = RecoveryId::try_from((sig_bytes[64] - 27) as i32).unwrap();
        let recoverable =
            RecoverableSignature::from_compact(&sig_bytes[..64], recovery_id).unwrap();

        let secp = Secp256k1::new();
        let recovered = secp
            .recover_ecdsa(&Message::from_digest(digest), &recoverable)
            .unwrap();

        assert_eq!(
            Secp256k1Signer::derive_address(&recovered),
            DEV_ADDRESS.to_string()
        );
    }

    #[tokio::test]
    async fn test_sign_hashes_preimage() {
        let signer = Secp256k1Signer::new();
        let preimage = b"some preimage bytes";

        let via_sign = signer.sign(DEV_KEY, preimage).await.unwrap();
        let via_digest = signer
            .sign_digest(DEV_KEY, keccak256(preimage))
            .await
            .unwrap();

        assert_eq!(via_sign, via_digest);
    }
}
