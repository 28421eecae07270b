use super::transaction::{Transaction, TransactionKind};
use super::wallet::Wallet;
use super::{ActorId, TransactionId, WalletId};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Persistence port for wallets.
///
/// Implementations are the serialization point for balance mutations: the
/// read-check-write of `apply_delta` / `apply_delta_pair` must run as one
/// atomic step so concurrent debits cannot both pass the sufficiency check
/// against a stale balance.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Creates a wallet with a store-allocated id, zero balance, and a
    /// fresh wallet number.
    async fn create(&self, owner: ActorId, name: String) -> Result<Wallet>;

    async fn get(&self, wallet_id: WalletId) -> Result<Wallet>;

    /// Persists non-balance changes after full revalidation.
    async fn update(&self, wallet: Wallet) -> Result<Wallet>;

    /// Applies a signed balance change atomically. Rejects with
    /// `InsufficientFunds`, without mutating, if the result would be
    /// negative.
    async fn apply_delta(&self, wallet_id: WalletId, delta: Decimal) -> Result<Wallet>;

    /// Applies two signed balance changes as a single atomic unit: both
    /// commit or neither does, and no reader observes a half-applied pair.
    async fn apply_delta_pair(
        &self,
        first: (WalletId, Decimal),
        second: (WalletId, Decimal),
    ) -> Result<(Wallet, Wallet)>;

    async fn delete(&self, wallet_id: WalletId) -> Result<()>;

    async fn list(&self) -> Result<Vec<Wallet>>;
}

/// Persistence port for transaction records.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a new record with a store-allocated id.
    async fn create(
        &self,
        wallet_id: WalletId,
        receiver_id: Option<WalletId>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Result<Transaction>;

    async fn get(&self, transaction_id: TransactionId) -> Result<Transaction>;

    /// Persists the in-place reclassification of a record.
    async fn update(&self, transaction: Transaction) -> Result<Transaction>;

    /// Removes every record referencing the wallet as source or receiver.
    /// Invoked only by the wallet-deletion cascade.
    async fn delete_by_wallet(&self, wallet_id: WalletId) -> Result<()>;

    async fn list(&self) -> Result<Vec<Transaction>>;
}

pub type WalletStoreBox = Box<dyn WalletStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
