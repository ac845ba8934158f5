//! The stored-record format.
//!
//! A persisted record is one of two shapes, told apart structurally:
//!
//! - a bare cipher envelope left behind by older wallets, whose plaintext is
//!   `{"privateKey": ...}`
//! - the current share record, a cipher envelope with a cleartext
//!   `publicShare` marker field, whose plaintext is a [`Share`]
//!
//! There is no explicit version tag; the presence of the marker field is the
//! whole discriminator. [`StoredRecord`]'s untagged deserialization tries the
//! share shape first, so the ordering of the variants is load-bearing.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use brazier_crypto::{envelope, CipherEnvelope};

use crate::error::VaultError;

/// Share index and polynomial id of the degenerate single-share scheme, and
/// the marker value used when no public component is known.
pub const DEGENERATE_COMPONENT: &str = "0";

/// The unit of secret material handled by the rest of the system.
///
/// A legacy raw private key is normalized into a share with index `"0"` and
/// polynomial id `"0"` the first time it is touched. The secret is erased
/// from memory when the share is dropped and never appears in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    /// Secret bytes as hex.
    pub share: String,
    /// Index of this share within its scheme instance.
    pub share_index: String,
    /// Identifier of the scheme instance this share belongs to.
    #[serde(rename = "polynomialID")]
    pub polynomial_id: String,
    /// Public component of the share, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_share: Option<String>,
}

impl Share {
    /// Normalizes a raw private key into the degenerate single-share form.
    pub fn from_private_key(private_key: impl Into<String>) -> Self {
        Self {
            share: private_key.into(),
            share_index: DEGENERATE_COMPONENT.to_string(),
            polynomial_id: DEGENERATE_COMPONENT.to_string(),
            public_share: None,
        }
    }

    /// The secret as a hex string.
    pub fn secret_hex(&self) -> &str {
        &self.share
    }

    /// True when the record decrypted to an empty secret.
    pub fn secret_is_empty(&self) -> bool {
        self.share.is_empty()
    }
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("share", &"[REDACTED]")
            .field("share_index", &self.share_index)
            .field("polynomial_id", &self.polynomial_id)
            .field("public_share", &self.public_share)
            .finish()
    }
}

/// Plaintext of a legacy record.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyKey {
    pub private_key: String,
}

/// The current on-disk record shape: a cleartext `publicShare` marker next
/// to the cipher envelope fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    /// Marker field that distinguishes this shape from a legacy record.
    pub public_share: String,
    /// The encrypted share payload.
    #[serde(flatten)]
    pub envelope: CipherEnvelope,
}

/// A persisted record, decoded structurally.
///
/// Variant order matters: the share shape is a superset of the legacy shape,
/// so it must be tried first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRecord {
    /// Current format, selected by the `publicShare` marker.
    Share(ShareRecord),
    /// Legacy format, a bare cipher envelope.
    Legacy(CipherEnvelope),
}

/// Encrypts a share into the current record shape.
pub fn encrypt_share(share: &Share, password: &str) -> Result<ShareRecord, VaultError> {
    let envelope = envelope::seal(password, share)?;
    let public_share = share
        .public_share
        .clone()
        .unwrap_or_else(|| DEGENERATE_COMPONENT.to_string());

    Ok(ShareRecord {
        public_share,
        envelope,
    })
}

/// Decrypts a share record back into a share.
pub fn decrypt_share(record: &ShareRecord, password: &str) -> Result<Share, VaultError> {
    Ok(envelope::open(password, &record.envelope)?)
}
