use super::WalletId;
use super::actor::ActorContext;
use super::transaction::TransactionKind;
use crate::error::{LedgerError, Result};

/// Whether a request creates a new transaction or modifies an existing one.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operation {
    Create,
    Modify,
}

/// Decides whether an actor may submit or cancel a given transaction,
/// independent of any balance math.
///
/// Rules are evaluated in order; the first failing rule wins:
///
/// 1. Withdraw/transfer on a wallet the non-admin actor does not own.
/// 2. Transfer without a receiver.
/// 3. Receiver given for anything other than a transfer.
/// 4. Modification to any kind other than cancellation.
/// 5. Receiver equal to the source wallet.
pub fn authorize(
    actor: &ActorContext,
    wallet_id: WalletId,
    receiver_id: Option<WalletId>,
    kind: TransactionKind,
    operation: Operation,
) -> Result<()> {
    if matches!(kind, TransactionKind::Withdraw | TransactionKind::Transfer)
        && !actor.is_admin()
        && !actor.owns(wallet_id)
    {
        return Err(LedgerError::NotOwner);
    }
    if kind == TransactionKind::Transfer && receiver_id.is_none() {
        return Err(LedgerError::ReceiverRequired);
    }
    if receiver_id.is_some() && kind != TransactionKind::Transfer {
        return Err(LedgerError::ReceiverNotAllowed);
    }
    if operation == Operation::Modify && kind != TransactionKind::Cancellation {
        return Err(LedgerError::ImmutableType);
    }
    if receiver_id == Some(wallet_id) {
        return Err(LedgerError::SelfTransferNotAllowed);
    }
    Ok(())
}
