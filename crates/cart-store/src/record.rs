//! Persisted row shape for a cart.

use common::{CartId, Money, UserId};
use serde::{Deserialize, Serialize};

/// One cart row as held by the store.
///
/// Items are kept as a JSON document next to the scalar columns; the store
/// does not interpret them. The domain layer maps this row to and from its
/// `Cart` aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Cart identifier, assigned once at insert time.
    pub id: CartId,

    /// Owning user. At most one row per user may have `completed = false`.
    pub user_id: UserId,

    /// Item list as a JSON array.
    pub items: serde_json::Value,

    /// Cart total as supplied by the last applied event.
    pub total_price: Money,

    /// Set once by the completion transition; never reverts.
    pub completed: bool,
}

impl CartRecord {
    /// Creates a new incomplete cart row.
    pub fn new(id: CartId, user_id: UserId, items: serde_json::Value, total_price: Money) -> Self {
        Self {
            id,
            user_id,
            items,
            total_price,
            completed: false,
        }
    }
}
