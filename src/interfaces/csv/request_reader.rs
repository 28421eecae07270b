use crate::domain::actor::Role;
use crate::domain::{ActorId, TransactionId, WalletId};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// Operations a replay script row may request.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    CreateWallet,
    Deposit,
    Withdraw,
    Transfer,
    Cancel,
}

/// One row of the replay script.
///
/// Columns: `op, actor, role, wallet, receiver, tx, amount, name`. Which
/// columns are required depends on the op; the dispatcher reports the
/// mismatch for the rest.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct RequestRow {
    pub op: OpKind,
    pub actor: ActorId,
    pub role: Role,
    pub wallet: Option<WalletId>,
    pub receiver: Option<WalletId>,
    pub tx: Option<TransactionId>,
    pub amount: Option<Decimal>,
    pub name: Option<String>,
}

/// Reads ledger requests from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<RequestRow>`,
/// trimming whitespace and tolerating flexible record lengths so scripts
/// can omit trailing columns.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g. File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes requests,
    /// so large scripts stream without loading fully into memory.
    pub fn requests(self) -> impl Iterator<Item = Result<RequestRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
