//! Downstream order creation.
//!
//! The event processor hands completed carts to [`OrderUseCase`]. Order
//! creation is an at-least-once boundary: event redelivery may invoke it
//! twice for the same cart, so implementations use the cart id as an
//! idempotency key.

pub mod error;
pub mod model;
pub mod service;

pub use error::OrderError;
pub use model::{Order, OrderState};
pub use service::{FailingOrderService, InMemoryOrderService, OrderUseCase};
