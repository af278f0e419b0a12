//! Shared types for the event-driven cart system.
//!
//! Identifier newtypes prevent mixing up cart, user and product ids, and
//! [`Money`] keeps prices in exact integer cents so that totals can be
//! compared without floating-point drift.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{CartId, ProductId, UserId};
