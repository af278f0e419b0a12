//! Order model.

use common::CartId;
use domain::Cart;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Order creation has been requested and accepted.
    Creating,
    /// Order is being validated against stock and payment.
    Validating,
    /// Order finished successfully.
    Done,
    /// Order was rejected downstream.
    Rejected,
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderState::Creating => "CREATING",
            OrderState::Validating => "VALIDATING",
            OrderState::Done => "DONE",
            OrderState::Rejected => "REJECTED",
        };
        write!(f, "{label}")
    }
}

/// An order created from a completed cart.
///
/// The order id is the originating cart id, which doubles as the idempotency
/// key protecting against duplicate trigger invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier, equal to the cart id.
    pub id: CartId,

    /// Snapshot of the completed cart.
    pub cart: Cart,

    /// Current lifecycle state.
    pub state: OrderState,

    /// Errors collected during downstream processing, if any.
    pub errors: Vec<String>,
}

impl Order {
    /// Creates a new order from a completed cart snapshot.
    pub fn from_cart(cart: Cart) -> Self {
        Self {
            id: cart.id,
            cart,
            state: OrderState::Creating,
            errors: Vec::new(),
        }
    }
}
