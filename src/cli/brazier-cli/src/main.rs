//! Brazier CLI - local hot-wallet keystore management.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::transaction::eip712::TypedData;
use ethers_core::types::TransactionRequest;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use brazier_provider::{RecordingObserver, SigningProvider};
use brazier_signer::Secp256k1Signer;
use brazier_vault::{PasswordProvider, VaultError};
use brazier_storage_sqlite::SqliteBackend;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "brazier")]
#[command(about = "Brazier - local hot-wallet keystore")]
#[command(version)]
struct Cli {
    /// Directory holding keystore databases
    #[arg(long, default_value = ".brazier", env = "BRAZIER_DATA_DIR")]
    data_dir: String,

    /// Keystore name
    #[arg(long, default_value = "keystore", env = "BRAZIER_KEYSTORE")]
    keystore: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a private key and create its account record
    Init {
        /// Private key as hex (prompted for if not provided)
        #[arg(long)]
        private_key: Option<String>,
    },
    /// Show the public key and address of an account
    Info {
        /// Account address
        account: String,
    },
    /// Sign a personal message
    SignMessage {
        /// Account address
        account: String,
        /// Message text
        message: String,
    },
    /// Sign EIP-712 typed data from a JSON file
    SignTyped {
        /// Account address
        account: String,
        /// Path to the typed-data JSON document
        file: String,
    },
    /// Sign a transaction from a JSON file
    SignTx {
        /// Account address
        account: String,
        /// Path to the transaction request JSON document
        file: String,
    },
    /// Re-encrypt an account record under a new password
    Rotate {
        /// Account address
        account: String,
    },
    /// Delete an account's stored record
    Clean {
        /// Account address
        account: String,
    },
}

// ============================================================================
// Password acquisition
// ============================================================================

/// Prompts on stdin each time the vault asks for the password.
struct StdinPassword {
    label: &'static str,
}

impl StdinPassword {
    fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Self { label })
    }
}

#[async_trait]
impl PasswordProvider for StdinPassword {
    async fn password(&self) -> Result<Zeroizing<String>, VaultError> {
        read_line(self.label)
            .map(Zeroizing::new)
            .map_err(|e| VaultError::Password(e.to_string()))
    }
}

fn read_line(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read stdin")?;

    Ok(line.trim().to_string())
}

// ============================================================================
// Commands
// ============================================================================

async fn open_backend(cli: &Cli) -> Result<SqliteBackend> {
    SqliteBackend::open(&cli.data_dir, &cli.keystore)
        .await
        .context("failed to open keystore")
}

fn restored(
    backend: SqliteBackend,
    account: &str,
) -> (SigningProvider<SqliteBackend>, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let provider = SigningProvider::restore(
        account,
        backend,
        Arc::new(Secp256k1Signer::new()),
        StdinPassword::new("Password"),
    )
    .with_observer(observer.clone());

    (provider, observer)
}

/// Turns a funneled default return into a CLI error when the observer saw a
/// failure.
fn checked(observer: &RecordingObserver, what: &str) -> Result<()> {
    match observer.last() {
        Some((_, true)) => Ok(()),
        _ => bail!("{what} failed"),
    }
}

async fn cmd_init(cli: &Cli, private_key: Option<String>) -> Result<()> {
    let secret = Zeroizing::new(match private_key {
        Some(key) => key,
        None => read_line("Private key")?,
    });

    let backend = open_backend(cli).await?;
    let provider = SigningProvider::initialize(
        &secret,
        backend,
        Arc::new(Secp256k1Signer::new()),
        StdinPassword::new("Password"),
    )
    .await
    .context("failed to initialize account")?;

    println!("{}", provider.account_id());
    Ok(())
}

async fn cmd_info(cli: &Cli, account: &str) -> Result<()> {
    let backend = open_backend(cli).await?;
    let (provider, observer) = restored(backend, account);

    let info = provider.get_account_info().await;
    checked(&observer, "account info")?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

async fn cmd_sign_message(cli: &Cli, account: &str, message: &str) -> Result<()> {
    let backend = open_backend(cli).await?;
    let (provider, observer) = restored(backend, account);

    let signature = provider.sign_personal_message(message.as_bytes()).await;
    checked(&observer, "message signing")?;

    println!("{signature}");
    Ok(())
}

async fn cmd_sign_typed(cli: &Cli, account: &str, file: &str) -> Result<()> {
    let document = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read typed data from {file}"))?;
    let typed_data: TypedData =
        serde_json::from_str(&document).context("invalid typed data document")?;

    let backend = open_backend(cli).await?;
    let (provider, observer) = restored(backend, account);

    let signature = provider.sign_typed_data(&typed_data).await;
    checked(&observer, "typed data signing")?;

    println!("{signature}");
    Ok(())
}

async fn cmd_sign_tx(cli: &Cli, account: &str, file: &str) -> Result<()> {
    let document = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read transaction from {file}"))?;
    let request: TransactionRequest =
        serde_json::from_str(&document).context("invalid transaction document")?;
    let tx: TypedTransaction = request.into();

    let backend = open_backend(cli).await?;
    let (provider, observer) = restored(backend, account);

    let raw = provider.sign_transaction(&tx).await;
    checked(&observer, "transaction signing")?;

    println!("{raw}");
    Ok(())
}

async fn cmd_rotate(cli: &Cli, account: &str) -> Result<()> {
    let backend = open_backend(cli).await?;
    let (provider, observer) = restored(backend, account);

    let new_pin = Zeroizing::new(read_line("New password")?);
    provider.update_pin(&new_pin).await;
    checked(&observer, "password rotation")?;

    println!("password rotated");
    Ok(())
}

async fn cmd_clean(cli: &Cli, account: &str) -> Result<()> {
    let backend = open_backend(cli).await?;
    let (provider, observer) = restored(backend, account);

    provider.clean().await;
    checked(&observer, "record removal")?;

    println!("record removed");
    Ok(())
}

// ============================================================================
// Entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { private_key } => cmd_init(&cli, private_key.clone()).await,
        Commands::Info { account } => cmd_info(&cli, account).await,
        Commands::SignMessage { account, message } => {
            cmd_sign_message(&cli, account, message).await
        }
        Commands::SignTyped { account, file } => cmd_sign_typed(&cli, account, file).await,
        Commands::SignTx { account, file } => cmd_sign_tx(&cli, account, file).await,
        Commands::Rotate { account } => cmd_rotate(&cli, account).await,
        Commands::Clean { account } => cmd_clean(&cli, account).await,
    }
}
