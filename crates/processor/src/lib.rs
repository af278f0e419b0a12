//! The consistency core: consumes cart events and applies them to the store.
//!
//! State only changes here. Each of the four event kinds has one handler;
//! handlers are idempotent, assume no ordering across kinds, and report a
//! tagged [`Outcome`] instead of throwing on business-rule conflicts. Store
//! or payload failures are re-raised to the bus for redelivery.

pub mod error;
pub mod handlers;
pub mod outcome;
pub mod processor;

pub use error::ProcessorError;
pub use handlers::register;
pub use outcome::{Outcome, RejectReason};
pub use processor::CartEventProcessor;
