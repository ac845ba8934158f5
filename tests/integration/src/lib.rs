//! Integration tests for the Brazier keystore.
//!
//! These tests drive the complete workflow over the real SQLite backend:
//! account initialization, signing, legacy-record migration, password
//! rotation, and removal.

use std::sync::Arc;

use tempfile::TempDir;

use brazier_provider::{RecordingObserver, SigningProvider};
use brazier_signer::Secp256k1Signer;
use brazier_storage::StorageBackend;
use brazier_storage_sqlite::SqliteBackend;
use brazier_vault::{KeyVault, StaticPassword};

/// Well-known development key, first account of the standard test mnemonic.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// Address derived from [`DEV_KEY`].
pub const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// A keystore in a temporary directory, with an observer wired through every
/// provider it hands out.
pub struct TestWallet {
    _dir: TempDir,
    /// Direct handle on the backing store.
    pub backend: SqliteBackend,
    /// Records every provider operation outcome.
    pub observer: Arc<RecordingObserver>,
}

impl TestWallet {
    /// Creates an empty keystore.
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let backend = SqliteBackend::open(dir.path(), "keystore")
            .await
            .expect("open keystore");

        Self {
            _dir: dir,
            backend,
            observer: Arc::new(RecordingObserver::new()),
        }
    }

    /// Imports the dev key under the given password.
    pub async fn initialize(&self, password: &str) -> SigningProvider<SqliteBackend> {
        SigningProvider::initialize(
            DEV_KEY,
            self.backend.clone(),
            Arc::new(Secp256k1Signer::new()),
            Arc::new(StaticPassword::new(password)),
        )
        .await
        .expect("initialize provider")
        .with_observer(self.observer.clone())
    }

    /// Binds a provider to an existing account.
    pub fn restore(&self, account: &str, password: &str) -> SigningProvider<SqliteBackend> {
        SigningProvider::restore(
            account,
            self.backend.clone(),
            Arc::new(Secp256k1Signer::new()),
            Arc::new(StaticPassword::new(password)),
        )
        .with_observer(self.observer.clone())
    }

    /// A vault over the same backend, for asserting on stored state.
    pub fn vault(&self) -> KeyVault<SqliteBackend> {
        KeyVault::new(self.backend.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brazier_crypto::envelope;
    use brazier_provider::Operation;
    use brazier_signer::AccountInfo;
    use brazier_vault::{StoredRecord, VaultError};
    use ethers_core::types::transaction::eip2718::TypedTransaction;
    use ethers_core::types::transaction::eip712::TypedData;
    use ethers_core::types::{Address, Eip1559TransactionRequest, TransactionRequest};
    use ethers_core::utils::keccak256;
    use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
    use secp256k1::{Message, Secp256k1};

    fn storage_key() -> String {
        format!("hot_{DEV_ADDRESS}")
    }

    /// Recovers the signer address from a 65-byte hex signature and digest.
    fn recovered_address(signature: &str, digest: [u8; 32]) -> String {
        let bytes = hex::decode(signature.trim_start_matches("0x")).expect("hex signature");
        assert_eq!(bytes.len(), 65);

        let recovery_id = RecoveryId::try_from((bytes[64] - 27) as i32).expect("recovery id");
        let recoverable =
            RecoverableSignature::from_compact(&bytes[..64], recovery_id).expect("signature");

        let secp = Secp256k1::new();
        let public_key = secp
            .recover_ecdsa(&Message::from_digest(digest), &recoverable)
            .expect("recover");

        let uncompressed = public_key.serialize_uncompressed();
        let hashed = keccak256(&uncompressed[1..]);
        format!("0x{}", hex::encode(&hashed[12..]))
    }

    fn legacy_tx() -> TypedTransaction {
        TransactionRequest::new()
            .to(Address::zero())
            .value(1_000u64)
            .nonce(0u64)
            .gas(21_000u64)
            .gas_price(1_000_000_000u64)
            .chain_id(1u64)
            .into()
    }

    fn typed_data() -> TypedData {
        serde_json::from_value(serde_json::json!({
            "types": {
                "EIP712Domain": [
                    {"name": "name", "type": "string"},
                    {"name": "version", "type": "string"},
                    {"name": "chainId", "type": "uint256"},
                    {"name": "verifyingContract", "type": "address"}
                ],
                "Mail": [
                    {"name": "contents", "type": "string"}
                ]
            },
            "primaryType": "Mail",
            "domain": {
                "name": "Brazier Test",
                "version": "1",
                "chainId": 1,
                "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
            },
            "message": {"contents": "Hello"}
        }))
        .expect("typed data")
    }

    #[tokio::test]
    async fn test_initialize_stores_record_at_lowercased_key() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;

        assert_eq!(provider.account_id(), DEV_ADDRESS);

        let raw = wallet
            .backend
            .get(&storage_key())
            .await
            .unwrap()
            .expect("record stored");
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json["publicShare"].is_string());

        let info = provider.get_account_info().await;
        assert_eq!(info.address, DEV_ADDRESS);
        assert_eq!(
            wallet.observer.last(),
            Some((Operation::GetAccountInfo, true))
        );
    }

    #[tokio::test]
    async fn test_retrieve_returns_degenerate_share() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;

        let share = wallet
            .vault()
            .retrieve(provider.account_id(), &StaticPassword::new("hunter2"))
            .await
            .unwrap();

        assert_eq!(share.share, DEV_KEY);
        assert_eq!(share.share_index, "0");
        assert_eq!(share.polynomial_id, "0");
    }

    #[tokio::test]
    async fn test_personal_message_signature_recovers() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;

        let signature = provider.sign_personal_message(b"hello").await;
        assert!(signature.starts_with("0x"));

        let digest = keccak256(b"\x19Ethereum Signed Message:\n5hello");
        assert_eq!(recovered_address(&signature, digest), DEV_ADDRESS);
    }

    #[tokio::test]
    async fn test_typed_data_signature_recovers() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;

        let payload = typed_data();
        let signature = provider.sign_typed_data(&payload).await;
        assert!(!signature.is_empty());

        use ethers_core::types::transaction::eip712::Eip712;
        let digest = payload.encode_eip712().expect("eip712 digest");
        assert_eq!(recovered_address(&signature, digest), DEV_ADDRESS);
    }

    #[tokio::test]
    async fn test_sign_legacy_and_typed_transactions() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;

        let raw = provider.sign_transaction(&legacy_tx()).await;
        assert!(raw.starts_with("0x"));
        assert!(raw.len() > 2);

        let eip1559: TypedTransaction = Eip1559TransactionRequest::new()
            .to(Address::zero())
            .value(1_000u64)
            .nonce(0u64)
            .gas(21_000u64)
            .chain_id(1u64)
            .into();
        let raw = provider.sign_transaction(&eip1559).await;
        assert!(raw.starts_with("0x02"));
    }

    #[tokio::test]
    async fn test_missing_record_returns_default_and_notifies() {
        let wallet = TestWallet::new().await;
        let provider = wallet.restore("0xabc", "hunter2");

        let raw = provider.sign_transaction(&legacy_tx()).await;
        assert_eq!(raw, "");
        assert_eq!(
            wallet.observer.last(),
            Some((Operation::SignTransaction, false))
        );

        let info = provider.get_account_info().await;
        assert_eq!(info, AccountInfo::default());
        assert_eq!(
            wallet.observer.last(),
            Some((Operation::GetAccountInfo, false))
        );
    }

    #[tokio::test]
    async fn test_wrong_password_is_funneled() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;

        let wrong = wallet.restore(provider.account_id(), "letmein");
        let signature = wrong.sign_personal_message(b"hello").await;

        assert_eq!(signature, "");
        assert_eq!(
            wallet.observer.last(),
            Some((Operation::SignPersonalMessage, false))
        );
    }

    #[tokio::test]
    async fn test_legacy_record_migration() {
        let wallet = TestWallet::new().await;

        // plant a legacy-shaped record the way an old wallet would have
        let legacy = envelope::seal(
            "hunter2",
            &serde_json::json!({"privateKey": DEV_KEY}),
        )
        .unwrap();
        wallet
            .backend
            .set(&storage_key(), &serde_json::to_string(&legacy).unwrap())
            .await
            .unwrap();

        let share = wallet
            .vault()
            .retrieve(DEV_ADDRESS, &StaticPassword::new("hunter2"))
            .await
            .unwrap();
        assert_eq!(share.share, DEV_KEY);
        assert_eq!(share.share_index, "0");
        assert_eq!(share.polynomial_id, "0");

        // storage now holds the current shape, stable across further reads
        let migrated = wallet.backend.get(&storage_key()).await.unwrap().unwrap();
        let stored: StoredRecord = serde_json::from_str(&migrated).unwrap();
        assert!(matches!(stored, StoredRecord::Share(_)));

        let again = wallet
            .vault()
            .retrieve(DEV_ADDRESS, &StaticPassword::new("hunter2"))
            .await
            .unwrap();
        assert_eq!(again, share);
        assert_eq!(
            wallet.backend.get(&storage_key()).await.unwrap().unwrap(),
            migrated
        );

        // and the migrated record signs like any other
        let provider = wallet.restore(DEV_ADDRESS, "hunter2");
        let info = provider.get_account_info().await;
        assert_eq!(info.address, DEV_ADDRESS);
    }

    #[tokio::test]
    async fn test_update_pin_rotates_password() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;
        let account = provider.account_id().to_string();

        provider.update_pin("letmein").await;
        assert_eq!(wallet.observer.last(), Some((Operation::UpdatePin, true)));

        let result = wallet
            .vault()
            .retrieve(&account, &StaticPassword::new("hunter2"))
            .await;
        assert!(matches!(result, Err(VaultError::WrongPassword)));

        let fresh = wallet.restore(&account, "letmein");
        assert_eq!(fresh.get_account_info().await.address, DEV_ADDRESS);
    }

    #[tokio::test]
    async fn test_clean_removes_record() {
        let wallet = TestWallet::new().await;
        let provider = wallet.initialize("hunter2").await;
        let account = provider.account_id().to_string();

        provider.clean().await;
        assert_eq!(wallet.observer.last(), Some((Operation::Clean, true)));

        let result = wallet
            .vault()
            .retrieve(&account, &StaticPassword::new("hunter2"))
            .await;
        assert!(matches!(result, Err(VaultError::EncryptedDataNotFound(_))));

        assert_eq!(wallet.backend.get(&storage_key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_record_survives_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let backend = SqliteBackend::open(dir.path(), "keystore").await.unwrap();
            SigningProvider::initialize(
                DEV_KEY,
                backend,
                Arc::new(Secp256k1Signer::new()),
                Arc::new(StaticPassword::new("hunter2")),
            )
            .await
            .unwrap();
        }

        let backend = SqliteBackend::open(dir.path(), "keystore").await.unwrap();
        let provider = SigningProvider::restore(
            DEV_ADDRESS,
            backend,
            Arc::new(Secp256k1Signer::new()),
            Arc::new(StaticPassword::new("hunter2")),
        );

        assert_eq!(provider.get_account_info().await.address, DEV_ADDRESS);
    }
}
