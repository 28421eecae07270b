use rust_decimal::Decimal;
use wallet_ledger::application::engine::LedgerEngine;
use wallet_ledger::domain::actor::ActorContext;
use wallet_ledger::domain::transaction::RequestKind;
use wallet_ledger::domain::wallet::Wallet;
use wallet_ledger::domain::ActorId;
use wallet_ledger::infrastructure::in_memory::{InMemoryTransactionStore, InMemoryWalletStore};

/// An engine over fresh in-memory stores.
pub fn engine() -> LedgerEngine {
    LedgerEngine::new(
        Box::new(InMemoryWalletStore::new()),
        Box::new(InMemoryTransactionStore::new()),
    )
}

/// Creates a wallet for `owner` and seeds it with an admin deposit.
pub async fn seed_wallet(engine: &LedgerEngine, owner: ActorId, balance: Decimal) -> Wallet {
    let admin = ActorContext::admin(0);
    let wallet = engine
        .create_wallet(&admin, Some(owner), "wallet")
        .await
        .unwrap();
    if balance > Decimal::ZERO {
        engine
            .apply(&admin, wallet.id, None, balance, RequestKind::Deposit)
            .await
            .unwrap();
    }
    engine.get_wallet(wallet.id, &admin).await.unwrap()
}
