//! Store error types.

use common::UserId;
use thiserror::Error;

/// Errors that can occur in cart persistence.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Item payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Saving would leave more than one incomplete cart for the same user.
    #[error("an incomplete cart already exists for user {user_id}")]
    UniqueViolation { user_id: UserId },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, CartStoreError>;
