use crate::domain::{TransactionId, WalletId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("wallet {0} does not exist")]
    WalletNotFound(WalletId),
    #[error("transaction {0} does not exist")]
    TransactionNotFound(TransactionId),
    #[error("insufficient transfer amount, the minimum amount is 0.1")]
    InvalidAmount,
    #[error("there are not enough funds on the balance, enter a smaller amount")]
    InsufficientFunds,
    #[error("the balance should be positive")]
    InvalidBalance,
    #[error("the user must be the owner of the wallet")]
    NotOwner,
    #[error("the wallet of the recipient must be entered")]
    ReceiverRequired,
    #[error("the recipient can only be specified if the transaction type is transfer")]
    ReceiverNotAllowed,
    #[error("the recipient cannot be the sender")]
    SelfTransferNotAllowed,
    #[error("transaction types cannot be changed, only cancelled")]
    ImmutableType,
    #[error("the user cannot change the balance")]
    BalanceImmutableByOwner,
    #[error("only an administrator can cancel a transaction")]
    AdminRequired,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// The request field a validation failure is attributed to, if any.
    /// Mirrors the field-tagged errors the surrounding service layer reports.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::WalletNotFound(_) | Self::NotOwner => Some("wallet_id"),
            Self::TransactionNotFound(_) => Some("id"),
            Self::InvalidAmount | Self::InsufficientFunds => Some("amount"),
            Self::InvalidBalance | Self::BalanceImmutableByOwner => Some("balance"),
            Self::ReceiverRequired | Self::ReceiverNotAllowed | Self::SelfTransferNotAllowed => {
                Some("receiver_id")
            }
            Self::ImmutableType | Self::AdminRequired => Some("transaction_type"),
            Self::InvalidRequest(_) | Self::Csv(_) | Self::Io(_) | Self::Storage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_carry_field_tags() {
        assert_eq!(LedgerError::InvalidAmount.field(), Some("amount"));
        assert_eq!(LedgerError::NotOwner.field(), Some("wallet_id"));
        assert_eq!(LedgerError::ReceiverRequired.field(), Some("receiver_id"));
        assert_eq!(LedgerError::ImmutableType.field(), Some("transaction_type"));
        assert_eq!(LedgerError::Storage("down".into()).field(), None);
    }

    #[test]
    fn test_not_found_messages_include_ids() {
        assert_eq!(
            LedgerError::WalletNotFound(7).to_string(),
            "wallet 7 does not exist"
        );
        assert_eq!(
            LedgerError::TransactionNotFound(3).to_string(),
            "transaction 3 does not exist"
        );
    }
}
