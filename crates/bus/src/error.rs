//! Bus error types.

use thiserror::Error;

/// Errors that can occur on the bus transport.
#[derive(Debug, Error)]
pub enum BusError {
    /// The publish call itself failed (broker unreachable, channel closed).
    #[error("publish to channel '{channel}' failed: {reason}")]
    Publish { channel: String, reason: String },
}

/// Result type for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;
