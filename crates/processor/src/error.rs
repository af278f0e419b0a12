//! Processor error types.

use cart_store::CartStoreError;
use thiserror::Error;

/// Failures a handler re-raises to the bus's redelivery mechanism.
///
/// Business-rule conflicts are not errors; they are [`crate::Outcome`]
/// values. What lands here is infrastructure trouble: a payload that does
/// not parse, or a store that cannot be reached. A permanently malformed
/// payload will be redelivered indefinitely absent a dead-letter policy.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The cart store failed.
    #[error("cart store error: {0}")]
    Store(#[from] CartStoreError),

    /// The raw payload could not be deserialized.
    #[error("malformed event payload: {0}")]
    Deserialization(#[from] serde_json::Error),
}
