//! Domain entities, invariants, and the store ports they are persisted through.

pub mod actor;
pub mod money;
pub mod policy;
pub mod ports;
pub mod transaction;
pub mod wallet;

/// Unique identifier of an actor (the authenticated principal).
pub type ActorId = u64;

/// Unique identifier of a wallet.
pub type WalletId = u64;

/// Unique identifier of a transaction record.
pub type TransactionId = u64;
