use super::{ActorId, WalletId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(rename = "owner", alias = "wallet_owner")]
    WalletOwner,
}

/// The authenticated principal a request is executed on behalf of.
///
/// Supplied explicitly on every core call; the engine holds no ambient
/// session state. `owned_wallet_ids` is resolved by the caller at request
/// time and is only consulted for authorization, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    pub id: ActorId,
    pub role: Role,
    pub owned_wallet_ids: HashSet<WalletId>,
}

impl ActorContext {
    pub fn new(id: ActorId, role: Role, owned_wallet_ids: impl IntoIterator<Item = WalletId>) -> Self {
        Self {
            id,
            role,
            owned_wallet_ids: owned_wallet_ids.into_iter().collect(),
        }
    }

    /// An administrator; owns no wallets of their own by default.
    pub fn admin(id: ActorId) -> Self {
        Self::new(id, Role::Admin, [])
    }

    /// An ordinary wallet owner with the given owned wallet ids.
    pub fn wallet_owner(id: ActorId, owned_wallet_ids: impl IntoIterator<Item = WalletId>) -> Self {
        Self::new(id, Role::WalletOwner, owned_wallet_ids)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn owns(&self, wallet_id: WalletId) -> bool {
        self.owned_wallet_ids.contains(&wallet_id)
    }
}
