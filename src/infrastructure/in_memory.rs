use crate::domain::ports::{TransactionStore, WalletStore};
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::domain::wallet::Wallet;
use crate::domain::{ActorId, TransactionId, WalletId};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct WalletsInner {
    wallets: HashMap<WalletId, Wallet>,
    next_id: WalletId,
}

/// A thread-safe in-memory wallet store.
///
/// A single `RwLock` guards the whole map, so `apply_delta` and
/// `apply_delta_pair` hold the write lock across their read-check-write
/// sequence. That lock is the serialization point the engine relies on:
/// two concurrent withdrawals can never both pass the sufficiency check
/// against a stale balance.
#[derive(Default, Clone)]
pub struct InMemoryWalletStore {
    inner: Arc<RwLock<WalletsInner>>,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn create(&self, owner: ActorId, name: String) -> Result<Wallet> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let wallet = Wallet::new(inner.next_id, owner, name);
        wallet.validate()?;
        inner.wallets.insert(wallet.id, wallet.clone());
        Ok(wallet)
    }

    async fn get(&self, wallet_id: WalletId) -> Result<Wallet> {
        let inner = self.inner.read().await;
        inner
            .wallets
            .get(&wallet_id)
            .cloned()
            .ok_or(LedgerError::WalletNotFound(wallet_id))
    }

    async fn update(&self, wallet: Wallet) -> Result<Wallet> {
        wallet.validate()?;
        let mut inner = self.inner.write().await;
        if !inner.wallets.contains_key(&wallet.id) {
            return Err(LedgerError::WalletNotFound(wallet.id));
        }
        inner.wallets.insert(wallet.id, wallet.clone());
        Ok(wallet)
    }

    async fn apply_delta(&self, wallet_id: WalletId, delta: Decimal) -> Result<Wallet> {
        let mut inner = self.inner.write().await;
        let wallet = inner
            .wallets
            .get_mut(&wallet_id)
            .ok_or(LedgerError::WalletNotFound(wallet_id))?;
        wallet.apply_delta(delta)?;
        Ok(wallet.clone())
    }

    async fn apply_delta_pair(
        &self,
        first: (WalletId, Decimal),
        second: (WalletId, Decimal),
    ) -> Result<(Wallet, Wallet)> {
        let mut inner = self.inner.write().await;

        if first.0 == second.0 {
            // Same wallet on both sides: collapse to one delta so neither
            // side clobbers the other.
            let wallet = inner
                .wallets
                .get_mut(&first.0)
                .ok_or(LedgerError::WalletNotFound(first.0))?;
            wallet.apply_delta(first.1 + second.1)?;
            return Ok((wallet.clone(), wallet.clone()));
        }

        // Stage both mutations on copies; commit only if both succeed.
        let mut staged_first = inner
            .wallets
            .get(&first.0)
            .cloned()
            .ok_or(LedgerError::WalletNotFound(first.0))?;
        let mut staged_second = inner
            .wallets
            .get(&second.0)
            .cloned()
            .ok_or(LedgerError::WalletNotFound(second.0))?;
        staged_first.apply_delta(first.1)?;
        staged_second.apply_delta(second.1)?;

        inner.wallets.insert(staged_first.id, staged_first.clone());
        inner.wallets.insert(staged_second.id, staged_second.clone());
        Ok((staged_first, staged_second))
    }

    async fn delete(&self, wallet_id: WalletId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .wallets
            .remove(&wallet_id)
            .map(|_| ())
            .ok_or(LedgerError::WalletNotFound(wallet_id))
    }

    async fn list(&self) -> Result<Vec<Wallet>> {
        let inner = self.inner.read().await;
        let mut wallets: Vec<Wallet> = inner.wallets.values().cloned().collect();
        wallets.sort_by_key(|w| w.id);
        Ok(wallets)
    }
}

#[derive(Default)]
struct TransactionsInner {
    transactions: HashMap<TransactionId, Transaction>,
    next_id: TransactionId,
}

/// A thread-safe in-memory store for transaction records.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    inner: Arc<RwLock<TransactionsInner>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(
        &self,
        wallet_id: WalletId,
        receiver_id: Option<WalletId>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Result<Transaction> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let tx = Transaction::new(inner.next_id, wallet_id, receiver_id, amount, kind);
        inner.transactions.insert(tx.id, tx.clone());
        Ok(tx)
    }

    async fn get(&self, transaction_id: TransactionId) -> Result<Transaction> {
        let inner = self.inner.read().await;
        inner
            .transactions
            .get(&transaction_id)
            .cloned()
            .ok_or(LedgerError::TransactionNotFound(transaction_id))
    }

    async fn update(&self, transaction: Transaction) -> Result<Transaction> {
        let mut inner = self.inner.write().await;
        if !inner.transactions.contains_key(&transaction.id) {
            return Err(LedgerError::TransactionNotFound(transaction.id));
        }
        inner.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn delete_by_wallet(&self, wallet_id: WalletId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.transactions.retain(|_, tx| !tx.involves(wallet_id));
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Transaction>> {
        let inner = self.inner.read().await;
        let mut transactions: Vec<Transaction> = inner.transactions.values().cloned().collect();
        transactions.sort_by_key(|tx| tx.id);
        Ok(transactions)
    }
}
