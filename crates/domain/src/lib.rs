//! Cart domain layer.
//!
//! This crate provides:
//! - The `Cart` aggregate and `Item` value object
//! - The four wire event payloads connecting producer and consumer
//! - [`CartCommands`], the producer side: each mutating intent becomes one
//!   published event, while reads go straight to the cart store

pub mod cart;
pub mod error;

pub use cart::{
    Cart, CartCommands, CartCompletionRequested, CartCreationRequested, CartDeletionRequested,
    CartItemsUpdateRequested, Item, ItemPayload,
};
pub use error::CartError;
