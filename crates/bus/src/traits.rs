//! Producer and consumer contracts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// Result returned by an event handler.
///
/// `Err` asks the bus to redeliver the message; `Ok` acknowledges it,
/// including the case where the handler inspected the event and chose to
/// drop it (business-rule rejections are acknowledged, not retried).
pub type HandlerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Producer side of the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one serialized payload to the named channel.
    ///
    /// Delivery is at-least-once; payloads published to the same channel are
    /// delivered in publish order.
    async fn send(&self, channel: &str, payload: String) -> Result<()>;
}

/// Handler invoked by the bus subscription machinery with the raw payload.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Processes one raw payload from the channel this handler is bound to.
    async fn handle(&self, payload: &str) -> HandlerResult;
}

/// Consumer side of the bus: explicit per-channel handler registration,
/// resolved once at startup.
pub trait EventSubscriber {
    /// Binds a handler to a channel under a consumer group.
    ///
    /// At most one handler per (channel, group); registering again replaces
    /// the previous binding.
    fn subscribe(&self, channel: &str, group: &str, handler: Arc<dyn EventHandler>);
}
