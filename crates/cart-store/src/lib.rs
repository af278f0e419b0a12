//! Persistence layer for cart rows.
//!
//! The [`CartStore`] trait is the contract the event processor and the read
//! path depend on. Two implementations are provided: [`InMemoryCartStore`]
//! for tests and local runs, and [`PostgresCartStore`] backed by sqlx, where
//! a partial unique index is the real enforcement point for the
//! one-incomplete-cart-per-user invariant.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use error::{CartStoreError, Result};
pub use memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;
pub use record::CartRecord;
pub use store::CartStore;
