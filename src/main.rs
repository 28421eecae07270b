use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wallet_ledger::application::engine::LedgerEngine;
use wallet_ledger::domain::actor::ActorContext;
use wallet_ledger::domain::ports::{TransactionStoreBox, WalletStoreBox};
use wallet_ledger::domain::transaction::RequestKind;
use wallet_ledger::error::LedgerError;
use wallet_ledger::infrastructure::in_memory::{InMemoryTransactionStore, InMemoryWalletStore};
use wallet_ledger::interfaces::csv::request_reader::{OpKind, RequestReader, RequestRow};
use wallet_ledger::interfaces::csv::wallet_writer::WalletWriter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input requests CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

/// The wallet store boxed twice (engine + actor resolution) plus the
/// transaction store.
fn build_stores(db_path: Option<PathBuf>) -> Result<(WalletStoreBox, WalletStoreBox, TransactionStoreBox)> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        let store =
            wallet_ledger::infrastructure::rocksdb::RocksDbStore::open(db_path).into_diagnostic()?;
        return Ok((
            Box::new(store.clone()),
            Box::new(store.clone()),
            Box::new(store),
        ));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    let wallets = InMemoryWalletStore::new();
    Ok((
        Box::new(wallets.clone()),
        Box::new(wallets),
        Box::new(InMemoryTransactionStore::new()),
    ))
}

/// Rebuilds the acting principal for a row: the owned-wallet set is looked
/// up from the store, the role is taken from the script.
async fn resolve_actor(
    row: &RequestRow,
    wallets: &WalletStoreBox,
) -> Result<ActorContext, LedgerError> {
    let owned = wallets
        .list()
        .await?
        .into_iter()
        .filter(|w| w.owner == row.actor)
        .map(|w| w.id);
    Ok(ActorContext::new(row.actor, row.role, owned))
}

async fn dispatch(
    engine: &LedgerEngine,
    wallets: &WalletStoreBox,
    row: RequestRow,
) -> Result<(), LedgerError> {
    let actor = resolve_actor(&row, wallets).await?;
    let require_wallet = || {
        row.wallet
            .ok_or_else(|| LedgerError::InvalidRequest("missing wallet column".into()))
    };
    let require_amount = || {
        row.amount
            .ok_or_else(|| LedgerError::InvalidRequest("missing amount column".into()))
    };

    match row.op {
        OpKind::CreateWallet => {
            let name = row
                .name
                .clone()
                .ok_or_else(|| LedgerError::InvalidRequest("missing name column".into()))?;
            engine.create_wallet(&actor, None, &name).await?;
        }
        OpKind::Deposit => {
            engine
                .apply(
                    &actor,
                    require_wallet()?,
                    row.receiver,
                    require_amount()?,
                    RequestKind::Deposit,
                )
                .await?;
        }
        OpKind::Withdraw => {
            engine
                .apply(
                    &actor,
                    require_wallet()?,
                    row.receiver,
                    require_amount()?,
                    RequestKind::Withdraw,
                )
                .await?;
        }
        OpKind::Transfer => {
            engine
                .apply(
                    &actor,
                    require_wallet()?,
                    row.receiver,
                    require_amount()?,
                    RequestKind::Transfer,
                )
                .await?;
        }
        OpKind::Cancel => {
            let tx = row
                .tx
                .ok_or_else(|| LedgerError::InvalidRequest("missing tx column".into()))?;
            engine.cancel(tx, &actor).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (engine_wallets, scan_wallets, transactions) = build_stores(cli.db_path)?;
    let engine = LedgerEngine::new(engine_wallets, transactions);

    // Process requests
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);
    for row_result in reader.requests() {
        match row_result {
            Ok(row) => {
                if let Err(e) = dispatch(&engine, &scan_wallets, row).await {
                    eprintln!("Error processing request: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading request: {}", e);
            }
        }
    }

    // Output final wallet states
    let wallets = scan_wallets.list().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = WalletWriter::new(stdout.lock());
    writer.write_wallets(wallets).into_diagnostic()?;

    Ok(())
}
