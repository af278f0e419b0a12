//! Wire event payloads, one per channel.
//!
//! These are the transient messages on the bus; nobody owns them. Field
//! names follow the wire contract (camelCase, prices as plain numbers).

use common::{CartId, Money, ProductId, UserId};
use serde::{Deserialize, Serialize};

use super::model::Item;

/// Item line as carried on the wire: the total is not transmitted, it is
/// derived by whoever applies the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub product_id: ProductId,
    pub unit_price: Money,
    pub quantity: u32,
}

impl From<&Item> for ItemPayload {
    fn from(item: &Item) -> Self {
        Self {
            product_id: item.product_id,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

impl From<ItemPayload> for Item {
    fn from(payload: ItemPayload) -> Self {
        Item::new(payload.product_id, payload.unit_price, payload.quantity)
    }
}

/// Request to create a cart for a user.
///
/// Carries no cart id: the processor, as the single writer, assigns one at
/// insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreationRequested {
    pub user_id: UserId,
    pub items: Vec<ItemPayload>,
}

/// Request to overwrite the items and total of an existing cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemsUpdateRequested {
    pub id: CartId,
    pub items: Vec<ItemPayload>,
    pub total_price: Money,
}

/// Request to finalize a cart, gated on the supplied total matching the
/// stored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCompletionRequested {
    pub id: CartId,
    pub total_price: Money,
}

/// Request to delete a cart unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDeletionRequested {
    pub id: CartId,
}
