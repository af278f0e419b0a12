//! PostgreSQL-backed cart store.

use async_trait::async_trait;
use common::{CartId, Money, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::{CartStoreError, Result};
use crate::record::CartRecord;
use crate::store::CartStore;

/// Name of the partial unique index enforcing one incomplete cart per user.
const INCOMPLETE_CART_INDEX: &str = "ux_carts_user_incomplete";

/// Cart store backed by PostgreSQL.
///
/// Total prices are stored as integer cents; items as a JSONB document.
/// The `ux_carts_user_incomplete` partial unique index is the real
/// enforcement point for the uniqueness invariant, so a lost insert race
/// surfaces here as [`CartStoreError::UniqueViolation`].
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    /// Creates a new store on the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_record(row: PgRow) -> Result<CartRecord> {
        Ok(CartRecord {
            id: CartId::from_raw(row.try_get("id")?),
            user_id: UserId::from_raw(row.try_get("user_id")?),
            items: row.try_get("items")?,
            total_price: Money::from_cents(row.try_get("total_price_cents")?),
            completed: row.try_get("completed")?,
        })
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    async fn find_incomplete_by_user(&self, user_id: UserId) -> Result<Option<CartRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, items, total_price_cents, completed
            FROM carts
            WHERE user_id = $1 AND completed = FALSE
            "#,
        )
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn find_by_id(&self, id: CartId) -> Result<Option<CartRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, items, total_price_cents, completed
            FROM carts
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn find_by_id_and_user(&self, id: CartId, user_id: UserId) -> Result<Option<CartRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, items, total_price_cents, completed
            FROM carts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn save(&self, record: CartRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO carts (id, user_id, items, total_price_cents, completed)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET items = EXCLUDED.items,
                total_price_cents = EXCLUDED.total_price_cents,
                completed = EXCLUDED.completed
            "#,
        )
        .bind(record.id.as_i64())
        .bind(record.user_id.as_i32())
        .bind(&record.items)
        .bind(record.total_price.cents())
        .bind(record.completed)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some(INCOMPLETE_CART_INDEX)
            {
                return CartStoreError::UniqueViolation {
                    user_id: record.user_id,
                };
            }
            CartStoreError::Database(e)
        })?;

        Ok(())
    }

    async fn delete_by_id(&self, id: CartId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
