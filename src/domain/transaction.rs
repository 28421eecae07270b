use super::{TransactionId, WalletId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stored transaction kinds. `Cancellation` is terminal: it only ever
/// results from reclassifying one of the other three.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
    Cancellation,
}

/// Kinds a creation request may carry. Deliberately has no `Cancellation`
/// variant, so requesting one at creation is unrepresentable.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl RequestKind {
    pub fn kind(self) -> TransactionKind {
        match self {
            Self::Deposit => TransactionKind::Deposit,
            Self::Withdraw => TransactionKind::Withdraw,
            Self::Transfer => TransactionKind::Transfer,
        }
    }
}

/// Immutable-once-settled record of an applied monetary movement.
///
/// `receiver_id` is set iff the record is (or was, before cancellation) a
/// transfer. A successful cancellation reclassifies `kind` in place; records
/// are otherwise never modified, and never deleted except by wallet-deletion
/// cascade.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub receiver_id: Option<WalletId>,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        wallet_id: WalletId,
        receiver_id: Option<WalletId>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id,
            wallet_id,
            receiver_id,
            amount,
            kind,
            created_at: Utc::now(),
        }
    }

    /// Whether this record touches the given wallet as source or receiver.
    pub fn involves(&self, wallet_id: WalletId) -> bool {
        self.wallet_id == wallet_id || self.receiver_id == Some(wallet_id)
    }
}
