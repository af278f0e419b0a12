//! Order use case contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::CartId;
use domain::Cart;
use tokio::sync::RwLock;

use crate::error::OrderError;
use crate::model::Order;

/// Contract consumed by the event processor's order trigger.
#[async_trait]
pub trait OrderUseCase: Send + Sync {
    /// Requests creation of an order from a completed cart snapshot.
    ///
    /// Must be idempotent on the cart id: a duplicate request changes
    /// nothing and is not an error.
    async fn create(&self, cart: Cart) -> Result<(), OrderError>;
}

/// In-memory order use case.
#[derive(Clone, Default)]
pub struct InMemoryOrderService {
    orders: Arc<RwLock<HashMap<CartId, Order>>>,
}

impl InMemoryOrderService {
    /// Creates a new empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders created.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Returns the order created for a cart, if any.
    pub async fn order_for(&self, cart_id: CartId) -> Option<Order> {
        self.orders.read().await.get(&cart_id).cloned()
    }
}

#[async_trait]
impl OrderUseCase for InMemoryOrderService {
    async fn create(&self, cart: Cart) -> Result<(), OrderError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&cart.id) {
            // Redelivered trigger: already created, nothing to change.
            tracing::info!(cart_id = %cart.id, "order already exists, ignoring duplicate request");
            return Ok(());
        }
        let order = Order::from_cart(cart);
        tracing::info!(order_id = %order.id, state = %order.state, "order created");
        orders.insert(order.id, order);
        Ok(())
    }
}

/// Order use case that always fails, for exercising the best-effort trigger.
#[derive(Clone, Default)]
pub struct FailingOrderService;

#[async_trait]
impl OrderUseCase for FailingOrderService {
    async fn create(&self, cart: Cart) -> Result<(), OrderError> {
        Err(OrderError::Unavailable(format!(
            "order backend down for cart {}",
            cart.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, ProductId, UserId};
    use domain::Item;

    fn completed_cart(id: i64) -> Cart {
        let mut cart = Cart::new(
            CartId::from_raw(id),
            UserId::from_raw(1),
            vec![Item::new(
                ProductId::from_raw(7),
                Money::from_major_units(10.0),
                2,
            )],
        );
        cart.completed = true;
        cart
    }

    #[tokio::test]
    async fn create_stores_one_order_per_cart() {
        let service = InMemoryOrderService::new();
        service.create(completed_cart(1)).await.unwrap();
        service.create(completed_cart(2)).await.unwrap();

        assert_eq!(service.order_count().await, 2);
        let order = service.order_for(CartId::from_raw(1)).await.unwrap();
        assert_eq!(order.cart.total_price, Money::from_cents(2000));
    }

    #[tokio::test]
    async fn duplicate_create_is_a_no_op() {
        let service = InMemoryOrderService::new();
        service.create(completed_cart(1)).await.unwrap();
        service.create(completed_cart(1)).await.unwrap();

        assert_eq!(service.order_count().await, 1);
    }

    #[tokio::test]
    async fn failing_service_reports_unavailable() {
        let service = FailingOrderService;
        let err = service.create(completed_cart(1)).await.unwrap_err();
        assert!(matches!(err, OrderError::Unavailable(_)));
    }
}
