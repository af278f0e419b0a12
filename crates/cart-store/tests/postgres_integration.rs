//! PostgreSQL integration tests.
//!
//! These need a local docker daemon, so they are `#[ignore]`d by default.
//! Run with:
//!
//! ```bash
//! cargo test -p cart-store --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use cart_store::{CartRecord, CartStore, CartStoreError, PostgresCartStore};
use common::{CartId, Money, UserId};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests.
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_carts_table.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared table.
async fn get_test_store() -> PostgresCartStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE carts")
        .execute(&pool)
        .await
        .unwrap();

    PostgresCartStore::new(pool)
}

fn record(id: i64, user: i32, cents: i64) -> CartRecord {
    CartRecord::new(
        CartId::from_raw(id),
        UserId::from_raw(user),
        serde_json::json!([{"productId": 7, "unitPrice": 10.0, "quantity": 2, "totalPrice": 20.0}]),
        Money::from_cents(cents),
    )
}

#[tokio::test]
#[ignore = "requires docker"]
#[serial]
async fn save_and_read_back_roundtrips() {
    let store = get_test_store().await;
    store.save(record(1, 7, 2000)).await.unwrap();

    let found = store.find_by_id(CartId::from_raw(1)).await.unwrap().unwrap();
    assert_eq!(found.user_id, UserId::from_raw(7));
    assert_eq!(found.total_price, Money::from_cents(2000));
    assert!(!found.completed);
    assert_eq!(found.items[0]["productId"], 7);
}

#[tokio::test]
#[ignore = "requires docker"]
#[serial]
async fn partial_index_rejects_second_incomplete_cart() {
    let store = get_test_store().await;
    store.save(record(1, 7, 2000)).await.unwrap();

    let err = store.save(record(2, 7, 500)).await.unwrap_err();
    assert!(matches!(err, CartStoreError::UniqueViolation { .. }));

    // Completing the first cart frees the slot.
    let mut done = record(1, 7, 2000);
    done.completed = true;
    store.save(done).await.unwrap();
    store.save(record(2, 7, 500)).await.unwrap();
}

#[tokio::test]
#[ignore = "requires docker"]
#[serial]
async fn find_incomplete_by_user_and_scoped_lookup() {
    let store = get_test_store().await;
    store.save(record(1, 7, 2000)).await.unwrap();

    let found = store
        .find_incomplete_by_user(UserId::from_raw(7))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, CartId::from_raw(1));

    assert!(
        store
            .find_by_id_and_user(CartId::from_raw(1), UserId::from_raw(8))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "requires docker"]
#[serial]
async fn delete_is_idempotent() {
    let store = get_test_store().await;
    store.save(record(1, 7, 2000)).await.unwrap();

    assert!(store.delete_by_id(CartId::from_raw(1)).await.unwrap());
    assert!(!store.delete_by_id(CartId::from_raw(1)).await.unwrap());
}
