use crate::domain::actor::ActorContext;
use crate::domain::policy::{self, Operation};
use crate::domain::ports::{TransactionStoreBox, WalletStoreBox};
use crate::domain::transaction::{RequestKind, Transaction, TransactionKind};
use crate::domain::wallet::{Wallet, WalletPatch};
use crate::domain::{ActorId, TransactionId, WalletId, money};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use tracing::info;

/// The transaction application and cancellation engine.
///
/// Owns the storage backends and is the only component that mutates wallet
/// balances. Every call takes the acting principal explicitly; validation
/// runs policy first, then amount, then balance, and mutations happen at
/// the store's atomic boundary.
pub struct LedgerEngine {
    wallets: WalletStoreBox,
    transactions: TransactionStoreBox,
}

impl LedgerEngine {
    pub fn new(wallets: WalletStoreBox, transactions: TransactionStoreBox) -> Self {
        Self {
            wallets,
            transactions,
        }
    }

    /// Validates and applies a transaction request, returning the settled
    /// record.
    pub async fn apply(
        &self,
        actor: &ActorContext,
        wallet_id: WalletId,
        receiver_id: Option<WalletId>,
        amount: Decimal,
        kind: RequestKind,
    ) -> Result<Transaction> {
        policy::authorize(actor, wallet_id, receiver_id, kind.kind(), Operation::Create)?;
        let amount = money::validate_amount(amount)?;

        match kind {
            RequestKind::Deposit => {
                self.wallets.apply_delta(wallet_id, amount).await?;
            }
            RequestKind::Withdraw => {
                self.wallets.apply_delta(wallet_id, -amount).await?;
            }
            RequestKind::Transfer => {
                // The policy guard already rejects a missing receiver; this
                // branch stays as a hard failure rather than the silent
                // no-op it would otherwise be.
                let receiver_id = receiver_id.ok_or(LedgerError::ReceiverRequired)?;
                self.wallets
                    .apply_delta_pair((wallet_id, -amount), (receiver_id, amount))
                    .await?;
            }
        }

        let record = self
            .transactions
            .create(wallet_id, receiver_id, amount, kind.kind())
            .await?;
        info!(
            transaction_id = record.id,
            wallet_id,
            amount = %amount,
            kind = ?record.kind,
            "transaction applied"
        );
        Ok(record)
    }

    /// Reverses exactly one previously applied transaction and reclassifies
    /// its record as a cancellation.
    ///
    /// Only admins may cancel. The reversal replays the inverse arithmetic
    /// through the same store boundary as `apply`, so a reversal that would
    /// drive any affected balance negative is rejected and nothing changes.
    pub async fn cancel(
        &self,
        transaction_id: TransactionId,
        actor: &ActorContext,
    ) -> Result<Transaction> {
        if !actor.is_admin() {
            return Err(LedgerError::AdminRequired);
        }
        let mut record = self.transactions.get(transaction_id).await?;
        policy::authorize(
            actor,
            record.wallet_id,
            None,
            TransactionKind::Cancellation,
            Operation::Modify,
        )?;

        match record.kind {
            TransactionKind::Deposit => {
                self.wallets
                    .apply_delta(record.wallet_id, -record.amount)
                    .await?;
            }
            TransactionKind::Withdraw => {
                self.wallets
                    .apply_delta(record.wallet_id, record.amount)
                    .await?;
            }
            TransactionKind::Transfer => {
                let receiver_id = record.receiver_id.ok_or(LedgerError::ReceiverRequired)?;
                self.wallets
                    .apply_delta_pair(
                        (record.wallet_id, record.amount),
                        (receiver_id, -record.amount),
                    )
                    .await?;
            }
            // Already reclassified; a record cancels at most once.
            TransactionKind::Cancellation => return Err(LedgerError::ImmutableType),
        }

        record.kind = TransactionKind::Cancellation;
        let record = self.transactions.update(record).await?;
        info!(transaction_id = record.id, "transaction cancelled");
        Ok(record)
    }

    /// Creates a wallet. Admins may create on behalf of any owner;
    /// everyone else becomes the owner no matter what they asked for.
    /// Balance always starts at 0.00.
    pub async fn create_wallet(
        &self,
        actor: &ActorContext,
        owner: Option<ActorId>,
        name: &str,
    ) -> Result<Wallet> {
        let owner = if actor.is_admin() {
            owner.unwrap_or(actor.id)
        } else {
            actor.id
        };
        let wallet = self.wallets.create(owner, name.to_string()).await?;
        info!(wallet_id = wallet.id, owner, "wallet created");
        Ok(wallet)
    }

    /// Fetches a wallet with the caller's visibility: non-admins only see
    /// wallets they own, everything else reads as missing.
    pub async fn get_wallet(&self, wallet_id: WalletId, actor: &ActorContext) -> Result<Wallet> {
        let wallet = self.wallets.get(wallet_id).await?;
        if !actor.is_admin() && wallet.owner != actor.id {
            return Err(LedgerError::WalletNotFound(wallet_id));
        }
        Ok(wallet)
    }

    pub async fn wallet_balance(
        &self,
        wallet_id: WalletId,
        actor: &ActorContext,
    ) -> Result<Decimal> {
        Ok(self.get_wallet(wallet_id, actor).await?.balance)
    }

    /// Updates a wallet's name and, for admins only, its balance.
    pub async fn update_wallet(
        &self,
        wallet_id: WalletId,
        actor: &ActorContext,
        patch: WalletPatch,
    ) -> Result<Wallet> {
        let mut wallet = self.get_wallet(wallet_id, actor).await?;
        if let Some(balance) = patch.balance {
            if !actor.is_admin() {
                return Err(LedgerError::BalanceImmutableByOwner);
            }
            money::validate_balance(balance)?;
            wallet.balance = money::to_stored_scale(balance);
        }
        if let Some(name) = patch.name {
            wallet.name = name;
        }
        self.wallets.update(wallet).await
    }

    /// Deletes a wallet and cascades to every record referencing it.
    pub async fn delete_wallet(&self, wallet_id: WalletId, actor: &ActorContext) -> Result<()> {
        let wallet = self.get_wallet(wallet_id, actor).await?;
        self.transactions.delete_by_wallet(wallet.id).await?;
        self.wallets.delete(wallet.id).await?;
        info!(wallet_id, "wallet deleted");
        Ok(())
    }

    /// All wallets for admins, the actor's own wallets otherwise.
    pub async fn list_wallets(&self, actor: &ActorContext) -> Result<Vec<Wallet>> {
        let wallets = self.wallets.list().await?;
        if actor.is_admin() {
            return Ok(wallets);
        }
        Ok(wallets.into_iter().filter(|w| w.owner == actor.id).collect())
    }

    /// All records for admins; for owners, records whose source or receiver
    /// wallet belongs to them.
    pub async fn list_transactions(&self, actor: &ActorContext) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.list().await?;
        if actor.is_admin() {
            return Ok(transactions);
        }
        let owned: Vec<WalletId> = self
            .wallets
            .list()
            .await?
            .into_iter()
            .filter(|w| w.owner == actor.id)
            .map(|w| w.id)
            .collect();
        Ok(transactions
            .into_iter()
            .filter(|tx| owned.iter().any(|id| tx.involves(*id)))
            .collect())
    }
}
