//! Event bus contracts for the cart system.
//!
//! The bus is an at-least-once, ordered-per-channel transport. Producers see
//! only [`EventPublisher`]; consumers register an [`EventHandler`] per
//! channel through [`EventSubscriber`] at startup. [`InMemoryBus`] implements
//! both sides with redelivery semantics for tests and local runs.

pub mod channel;
pub mod error;
pub mod memory;
pub mod traits;

pub use channel::Channels;
pub use error::{BusError, Result};
pub use memory::{DeliveryStats, InMemoryBus};
pub use traits::{EventHandler, EventPublisher, EventSubscriber, HandlerResult};
