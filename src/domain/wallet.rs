use super::money;
use super::{ActorId, WalletId};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account holding a non-negative decimal balance.
///
/// Balances are only ever mutated through [`Wallet::apply_delta`], which
/// enforces the non-negativity invariant before the change is visible.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Wallet {
    pub id: WalletId,
    /// The actor this wallet belongs to.
    pub owner: ActorId,
    pub name: String,
    /// Externally visible opaque token, generated at creation.
    pub wallet_number: Uuid,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    /// A fresh wallet with a zero balance and a new wallet number.
    /// Caller-supplied balances and wallet numbers are never honored.
    pub fn new(id: WalletId, owner: ActorId, name: String) -> Self {
        Self {
            id,
            owner,
            name,
            wallet_number: Uuid::new_v4(),
            balance: money::to_stored_scale(Decimal::ZERO),
            created_at: Utc::now(),
        }
    }

    /// Applies a signed balance change, rejecting any change that would
    /// drive the balance below zero. The wallet is untouched on error.
    pub fn apply_delta(&mut self, delta: Decimal) -> Result<()> {
        let next = self.balance + delta;
        if next < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds);
        }
        money::validate_balance(next)?;
        self.balance = money::to_stored_scale(next);
        Ok(())
    }

    /// Full revalidation, run before every persistence of the wallet.
    pub fn validate(&self) -> Result<()> {
        money::validate_balance(self.balance)
    }
}

/// Fields of a wallet an update request may touch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WalletPatch {
    pub name: Option<String>,
    pub balance: Option<Decimal>,
}
