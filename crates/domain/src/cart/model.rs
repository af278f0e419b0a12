//! Cart aggregate and item value object.

use cart_store::CartRecord;
use common::{CartId, Money, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// One line of a cart: a product, its unit price and quantity.
///
/// The item total is derived, never supplied: it is recomputed on
/// construction and on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Product identifier.
    pub product_id: ProductId,

    /// Price per unit.
    pub unit_price: Money,

    /// Quantity.
    pub quantity: u32,

    /// Derived `unit_price * quantity`.
    pub total_price: Money,
}

impl Item {
    /// Creates an item, computing its total.
    pub fn new(product_id: ProductId, unit_price: Money, quantity: u32) -> Self {
        Self {
            product_id,
            unit_price,
            quantity,
            total_price: unit_price.multiply(quantity),
        }
    }

    /// Updates price and quantity, recomputing the total.
    pub fn update(&mut self, unit_price: Money, quantity: u32) {
        self.unit_price = unit_price;
        self.quantity = quantity;
        self.total_price = unit_price.multiply(quantity);
    }
}

/// The cart aggregate.
///
/// Once persisted, the row is owned exclusively by the event processor; this
/// type is the in-memory view used by the producer's read path, the
/// processor's transitions, and the order hand-off snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique identifier, immutable once assigned.
    pub id: CartId,

    /// Owning user.
    pub user_id: UserId,

    /// Ordered item lines.
    pub items: Vec<Item>,

    /// Cart total as supplied by the last applied command.
    pub total_price: Money,

    /// Transitions once to `true`; never reverts.
    pub completed: bool,
}

impl Cart {
    /// Creates a new incomplete cart whose total is the sum of item totals.
    pub fn new(id: CartId, user_id: UserId, items: Vec<Item>) -> Self {
        let total_price = Money::sum(items.iter().map(|i| i.total_price));
        Self {
            id,
            user_id,
            items,
            total_price,
            completed: false,
        }
    }

    /// Sum of the item totals currently in the cart.
    pub fn items_total(&self) -> Money {
        Money::sum(self.items.iter().map(|i| i.total_price))
    }

    /// Maps a persisted row back to the aggregate.
    pub fn from_record(record: &CartRecord) -> Result<Self, serde_json::Error> {
        let items: Vec<Item> = serde_json::from_value(record.items.clone())?;
        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            items,
            total_price: record.total_price,
            completed: record.completed,
        })
    }

    /// Maps the aggregate to its persisted row.
    pub fn to_record(&self) -> Result<CartRecord, serde_json::Error> {
        Ok(CartRecord {
            id: self.id,
            user_id: self.user_id,
            items: serde_json::to_value(&self.items)?,
            total_price: self.total_price,
            completed: self.completed,
        })
    }
}
