//! In-memory store implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CartId, UserId};
use tokio::sync::RwLock;

use crate::error::{CartStoreError, Result};
use crate::record::CartRecord;
use crate::store::CartStore;

/// In-memory cart store.
///
/// The uniqueness check runs under the same write lock as the insert, which
/// gives this implementation the atomic check-and-save the Postgres store
/// gets from its partial unique index.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    rows: Arc<RwLock<HashMap<CartId, CartRecord>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rows.
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Clears all rows.
    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_incomplete_by_user(&self, user_id: UserId) -> Result<Option<CartRecord>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|r| r.user_id == user_id && !r.completed)
            .cloned())
    }

    async fn find_by_id(&self, id: CartId) -> Result<Option<CartRecord>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_id_and_user(&self, id: CartId, user_id: UserId) -> Result<Option<CartRecord>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|r| r.user_id == user_id).cloned())
    }

    async fn save(&self, record: CartRecord) -> Result<()> {
        let mut rows = self.rows.write().await;

        if !record.completed {
            let conflict = rows
                .values()
                .any(|r| r.user_id == record.user_id && !r.completed && r.id != record.id);
            if conflict {
                return Err(CartStoreError::UniqueViolation {
                    user_id: record.user_id,
                });
            }
        }

        rows.insert(record.id, record);
        Ok(())
    }

    async fn delete_by_id(&self, id: CartId) -> Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Money;

    fn record(id: i64, user: i32) -> CartRecord {
        CartRecord::new(
            CartId::from_raw(id),
            UserId::from_raw(user),
            serde_json::json!([]),
            Money::from_cents(1000),
        )
    }

    #[tokio::test]
    async fn save_and_find_by_id() {
        let store = InMemoryCartStore::new();
        store.save(record(1, 7)).await.unwrap();

        let found = store.find_by_id(CartId::from_raw(1)).await.unwrap();
        assert_eq!(found.unwrap().user_id, UserId::from_raw(7));
        assert!(store.find_by_id(CartId::from_raw(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_incomplete_by_user_ignores_completed() {
        let store = InMemoryCartStore::new();
        let mut done = record(1, 7);
        done.completed = true;
        store.save(done).await.unwrap();

        assert!(
            store
                .find_incomplete_by_user(UserId::from_raw(7))
                .await
                .unwrap()
                .is_none()
        );

        store.save(record(2, 7)).await.unwrap();
        let found = store
            .find_incomplete_by_user(UserId::from_raw(7))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, CartId::from_raw(2));
    }

    #[tokio::test]
    async fn second_incomplete_cart_for_user_is_rejected() {
        let store = InMemoryCartStore::new();
        store.save(record(1, 7)).await.unwrap();

        let err = store.save(record(2, 7)).await.unwrap_err();
        assert!(matches!(err, CartStoreError::UniqueViolation { .. }));
        assert_eq!(store.row_count().await, 1);

        // Overwriting the same row is allowed.
        store.save(record(1, 7)).await.unwrap();
    }

    #[tokio::test]
    async fn find_by_id_and_user_scopes_to_owner() {
        let store = InMemoryCartStore::new();
        store.save(record(1, 7)).await.unwrap();

        assert!(
            store
                .find_by_id_and_user(CartId::from_raw(1), UserId::from_raw(7))
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .find_by_id_and_user(CartId::from_raw(1), UserId::from_raw(8))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let store = InMemoryCartStore::new();
        store.save(record(1, 7)).await.unwrap();

        assert!(store.delete_by_id(CartId::from_raw(1)).await.unwrap());
        assert!(!store.delete_by_id(CartId::from_raw(1)).await.unwrap());
        assert_eq!(store.row_count().await, 0);
    }
}
