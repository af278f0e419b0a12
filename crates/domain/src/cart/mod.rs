//! Cart aggregate, wire events, and the command producer.

mod commands;
mod events;
mod model;

pub use commands::CartCommands;
pub use events::{
    CartCompletionRequested, CartCreationRequested, CartDeletionRequested,
    CartItemsUpdateRequested, ItemPayload,
};
pub use model::{Cart, Item};
