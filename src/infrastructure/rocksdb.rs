use crate::domain::ports::{TransactionStore, WalletStore};
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::domain::wallet::Wallet;
use crate::domain::{ActorId, TransactionId, WalletId};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for wallet states.
pub const CF_WALLETS: &str = "wallets";
/// Column Family for transaction records.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for id sequences.
pub const CF_META: &str = "meta";

const WALLET_SEQ: &[u8] = b"wallet_seq";
const TRANSACTION_SEQ: &[u8] = b"transaction_seq";

/// A persistent store implementation using RocksDB.
///
/// Wallets and transactions live in separate Column Families; id sequences
/// in a meta CF. All mutations are serialized behind one mutex so the
/// read-check-write of a balance change is atomic, and two-wallet mutations
/// commit through a single `WriteBatch` so no reader observes half a
/// transfer.
///
/// `Clone` shares the underlying `Arc<DB>` and the write lock.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, ensuring
    /// the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_WALLETS, Options::default()),
            ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default()),
            ColumnFamilyDescriptor::new(CF_META, Options::default()),
        ];
        let db = DB::open_cf_descriptors(&opts, path, cfs)
            .map_err(|e| LedgerError::Storage(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| LedgerError::Storage(format!("column family {name} not found")))
    }

    fn next_seq(&self, key: &[u8]) -> Result<u64> {
        let cf = self.cf(CF_META)?;
        let current = self
            .db
            .get_cf(cf, key)
            .map_err(|e| LedgerError::Storage(e.to_string()))?
            .map(|bytes| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes);
                u64::from_be_bytes(buf)
            })
            .unwrap_or(0);
        let next = current + 1;
        self.db
            .put_cf(cf, key, next.to_be_bytes())
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        Ok(next)
    }

    fn read_wallet(&self, wallet_id: WalletId) -> Result<Wallet> {
        let cf = self.cf(CF_WALLETS)?;
        let bytes = self
            .db
            .get_cf(cf, wallet_id.to_be_bytes())
            .map_err(|e| LedgerError::Storage(e.to_string()))?
            .ok_or(LedgerError::WalletNotFound(wallet_id))?;
        serde_json::from_slice(&bytes).map_err(|e| LedgerError::Storage(e.to_string()))
    }

    fn write_wallet(&self, wallet: &Wallet) -> Result<()> {
        let cf = self.cf(CF_WALLETS)?;
        let value =
            serde_json::to_vec(wallet).map_err(|e| LedgerError::Storage(e.to_string()))?;
        self.db
            .put_cf(cf, wallet.id.to_be_bytes(), value)
            .map_err(|e| LedgerError::Storage(e.to_string()))
    }

    fn read_transaction(&self, transaction_id: TransactionId) -> Result<Transaction> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let bytes = self
            .db
            .get_cf(cf, transaction_id.to_be_bytes())
            .map_err(|e| LedgerError::Storage(e.to_string()))?
            .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
        serde_json::from_slice(&bytes).map_err(|e| LedgerError::Storage(e.to_string()))
    }

    fn write_transaction(&self, tx: &Transaction) -> Result<()> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let value = serde_json::to_vec(tx).map_err(|e| LedgerError::Storage(e.to_string()))?;
        self.db
            .put_cf(cf, tx.id.to_be_bytes(), value)
            .map_err(|e| LedgerError::Storage(e.to_string()))
    }
}

#[async_trait]
impl WalletStore for RocksDbStore {
    async fn create(&self, owner: ActorId, name: String) -> Result<Wallet> {
        let _guard = self.write_lock.lock().await;
        let id = self.next_seq(WALLET_SEQ)?;
        let wallet = Wallet::new(id, owner, name);
        wallet.validate()?;
        self.write_wallet(&wallet)?;
        Ok(wallet)
    }

    async fn get(&self, wallet_id: WalletId) -> Result<Wallet> {
        self.read_wallet(wallet_id)
    }

    async fn update(&self, wallet: Wallet) -> Result<Wallet> {
        wallet.validate()?;
        let _guard = self.write_lock.lock().await;
        self.read_wallet(wallet.id)?;
        self.write_wallet(&wallet)?;
        Ok(wallet)
    }

    async fn apply_delta(&self, wallet_id: WalletId, delta: Decimal) -> Result<Wallet> {
        let _guard = self.write_lock.lock().await;
        let mut wallet = self.read_wallet(wallet_id)?;
        wallet.apply_delta(delta)?;
        self.write_wallet(&wallet)?;
        Ok(wallet)
    }

    async fn apply_delta_pair(
        &self,
        first: (WalletId, Decimal),
        second: (WalletId, Decimal),
    ) -> Result<(Wallet, Wallet)> {
        let _guard = self.write_lock.lock().await;

        if first.0 == second.0 {
            let mut wallet = self.read_wallet(first.0)?;
            wallet.apply_delta(first.1 + second.1)?;
            self.write_wallet(&wallet)?;
            return Ok((wallet.clone(), wallet));
        }

        let mut staged_first = self.read_wallet(first.0)?;
        let mut staged_second = self.read_wallet(second.0)?;
        staged_first.apply_delta(first.1)?;
        staged_second.apply_delta(second.1)?;

        // Both sides land in one batch: committed together or not at all.
        let cf = self.cf(CF_WALLETS)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            cf,
            staged_first.id.to_be_bytes(),
            serde_json::to_vec(&staged_first).map_err(|e| LedgerError::Storage(e.to_string()))?,
        );
        batch.put_cf(
            cf,
            staged_second.id.to_be_bytes(),
            serde_json::to_vec(&staged_second).map_err(|e| LedgerError::Storage(e.to_string()))?,
        );
        self.db
            .write(batch)
            .map_err(|e| LedgerError::Storage(e.to_string()))?;

        Ok((staged_first, staged_second))
    }

    async fn delete(&self, wallet_id: WalletId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.read_wallet(wallet_id)?;
        let cf = self.cf(CF_WALLETS)?;
        self.db
            .delete_cf(cf, wallet_id.to_be_bytes())
            .map_err(|e| LedgerError::Storage(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<Wallet>> {
        let cf = self.cf(CF_WALLETS)?;
        let mut wallets = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| LedgerError::Storage(e.to_string()))?;
            let wallet: Wallet =
                serde_json::from_slice(&value).map_err(|e| LedgerError::Storage(e.to_string()))?;
            wallets.push(wallet);
        }
        wallets.sort_by_key(|w| w.id);
        Ok(wallets)
    }
}

#[async_trait]
impl TransactionStore for RocksDbStore {
    async fn create(
        &self,
        wallet_id: WalletId,
        receiver_id: Option<WalletId>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Result<Transaction> {
        let _guard = self.write_lock.lock().await;
        let id = self.next_seq(TRANSACTION_SEQ)?;
        let tx = Transaction::new(id, wallet_id, receiver_id, amount, kind);
        self.write_transaction(&tx)?;
        Ok(tx)
    }

    async fn get(&self, transaction_id: TransactionId) -> Result<Transaction> {
        self.read_transaction(transaction_id)
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction> {
        let _guard = self.write_lock.lock().await;
        self.read_transaction(transaction.id)?;
        self.write_transaction(&transaction)?;
        Ok(transaction)
    }

    async fn delete_by_wallet(&self, wallet_id: WalletId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf = self.cf(CF_TRANSACTIONS)?;
        let mut batch = WriteBatch::default();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (key, value) = item.map_err(|e| LedgerError::Storage(e.to_string()))?;
            let tx: Transaction =
                serde_json::from_slice(&value).map_err(|e| LedgerError::Storage(e.to_string()))?;
            if tx.involves(wallet_id) {
                batch.delete_cf(cf, key);
            }
        }
        self.db
            .write(batch)
            .map_err(|e| LedgerError::Storage(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<Transaction>> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let mut transactions = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| LedgerError::Storage(e.to_string()))?;
            let tx: Transaction =
                serde_json::from_slice(&value).map_err(|e| LedgerError::Storage(e.to_string()))?;
            transactions.push(tx);
        }
        transactions.sort_by_key(|tx| tx.id);
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_column_families() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).expect("failed to open RocksDB");

        assert!(store.db.cf_handle(CF_WALLETS).is_some());
        assert!(store.db.cf_handle(CF_TRANSACTIONS).is_some());
        assert!(store.db.cf_handle(CF_META).is_some());
    }

    #[tokio::test]
    async fn test_wallet_roundtrip_and_sequence() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();

        let a = WalletStore::create(&store, 1, "a".into()).await.unwrap();
        let b = WalletStore::create(&store, 2, "b".into()).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let fetched = WalletStore::get(&store, a.id).await.unwrap();
        assert_eq!(fetched, a);
        assert!(matches!(
            WalletStore::get(&store, 99).await,
            Err(LedgerError::WalletNotFound(99))
        ));

        let all = WalletStore::list(&store).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delta_pair_batch_is_atomic() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();
        let a = WalletStore::create(&store, 1, "a".into()).await.unwrap();
        let b = WalletStore::create(&store, 2, "b".into()).await.unwrap();
        store.apply_delta(a.id, dec!(100.00)).await.unwrap();

        store
            .apply_delta_pair((a.id, dec!(-30.00)), (b.id, dec!(30.00)))
            .await
            .unwrap();
        assert_eq!(store.read_wallet(a.id).unwrap().balance, dec!(70.00));
        assert_eq!(store.read_wallet(b.id).unwrap().balance, dec!(30.00));

        let result = store
            .apply_delta_pair((a.id, dec!(-100.00)), (b.id, dec!(100.00)))
            .await;
        assert!(matches!(result, Err(LedgerError::InsufficientFunds)));
        assert_eq!(store.read_wallet(a.id).unwrap().balance, dec!(70.00));
        assert_eq!(store.read_wallet(b.id).unwrap().balance, dec!(30.00));
    }

    #[tokio::test]
    async fn test_transaction_sequence_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDbStore::open(dir.path()).unwrap();
            TransactionStore::create(&store, 1, None, dec!(5.00), TransactionKind::Deposit)
                .await
                .unwrap();
        }
        let store = RocksDbStore::open(dir.path()).unwrap();
        let tx = TransactionStore::create(&store, 1, None, dec!(5.00), TransactionKind::Deposit)
            .await
            .unwrap();
        assert_eq!(tx.id, 2);
    }

    #[tokio::test]
    async fn test_cascade_delete_by_wallet() {
        let dir = tempdir().unwrap();
        let store = RocksDbStore::open(dir.path()).unwrap();
        TransactionStore::create(&store, 1, Some(2), dec!(5.00), TransactionKind::Transfer)
            .await
            .unwrap();
        TransactionStore::create(&store, 3, None, dec!(5.00), TransactionKind::Deposit)
            .await
            .unwrap();

        store.delete_by_wallet(2).await.unwrap();
        let remaining = TransactionStore::list(&store).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].wallet_id, 3);
    }
}
