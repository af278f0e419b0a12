//! Domain error types.

use cart_store::CartStoreError;
use thiserror::Error;

/// Errors surfaced by the synchronous read path and record mapping.
///
/// The asynchronous command path never returns these: publish failures are
/// logged and swallowed.
#[derive(Debug, Error)]
pub enum CartError {
    /// An error occurred in the cart store.
    #[error("cart store error: {0}")]
    Store(#[from] CartStoreError),

    /// A persisted item document could not be mapped to the aggregate.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
