//! Core store trait.

use async_trait::async_trait;
use common::{CartId, UserId};

use crate::{CartRecord, Result};

/// Contract for cart persistence.
///
/// Rows are reachable by primary key and by the uniqueness predicate "the
/// incomplete cart of a user". All implementations must be thread-safe; the
/// event processor performs read-modify-write sequences against this trait
/// with no external lock, so `save` must itself reject writes that would
/// break the one-incomplete-cart-per-user invariant.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Returns the incomplete cart of a user, if one exists.
    async fn find_incomplete_by_user(&self, user_id: UserId) -> Result<Option<CartRecord>>;

    /// Returns a cart by primary key.
    async fn find_by_id(&self, id: CartId) -> Result<Option<CartRecord>>;

    /// Returns a cart by primary key, scoped to its owning user.
    async fn find_by_id_and_user(&self, id: CartId, user_id: UserId) -> Result<Option<CartRecord>>;

    /// Inserts or overwrites a cart row by primary key.
    ///
    /// Fails with [`crate::CartStoreError::UniqueViolation`] if the write
    /// would leave two incomplete carts for the same user.
    async fn save(&self, record: CartRecord) -> Result<()>;

    /// Deletes a cart row by primary key.
    ///
    /// Returns whether a row existed. Deleting an absent row is not an error.
    async fn delete_by_id(&self, id: CartId) -> Result<bool>;
}
