//! Order error types.

use thiserror::Error;

/// Errors that can occur while requesting order creation.
///
/// The processor treats these as best-effort failures: a completed cart
/// stays completed even when order creation fails.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order backend could not be reached or rejected the request.
    #[error("order creation unavailable: {0}")]
    Unavailable(String),
}
