//! Producer side: cart intents become published events.
//!
//! Mirrors the structure of the consumer: four mutating intents, one channel
//! each. Publishing is fire-and-forget; a serialization or publish failure
//! is logged and swallowed, so the caller never learns synchronously whether
//! the mutation happened. Reads bypass the bus entirely and hit the store.

use bus::{Channels, EventPublisher};
use cart_store::CartStore;
use common::{CartId, Money, UserId};
use serde::Serialize;

use crate::error::CartError;

use super::events::{
    CartCompletionRequested, CartCreationRequested, CartDeletionRequested,
    CartItemsUpdateRequested, ItemPayload,
};
use super::model::{Cart, Item};

/// Command adapter for cart mutations and reads.
///
/// Owns no state; one publish per mutating call.
pub struct CartCommands<S, P> {
    store: S,
    publisher: P,
    channels: Channels,
}

impl<S, P> CartCommands<S, P>
where
    S: CartStore,
    P: EventPublisher,
{
    /// Creates a command adapter over the given collaborators.
    pub fn new(store: S, publisher: P, channels: Channels) -> Self {
        Self {
            store,
            publisher,
            channels,
        }
    }

    /// Requests creation of a cart for a user with an initial item list.
    pub async fn create_cart(&self, user_id: UserId, items: Vec<Item>) {
        let event = CartCreationRequested {
            user_id,
            items: items.iter().map(ItemPayload::from).collect(),
        };
        self.publish(&self.channels.create, &event, "cart creation requested")
            .await;
    }

    /// Requests replacing the items of a cart; the total sent is the sum of
    /// the item totals.
    pub async fn update_items(&self, id: CartId, items: Vec<Item>) {
        let event = CartItemsUpdateRequested {
            id,
            total_price: Money::sum(items.iter().map(|i| i.total_price)),
            items: items.iter().map(ItemPayload::from).collect(),
        };
        self.publish(
            &self.channels.update_items,
            &event,
            "cart items update requested",
        )
        .await;
    }

    /// Requests completion of a cart at the given expected total.
    pub async fn complete(&self, id: CartId, total_price: Money) {
        let event = CartCompletionRequested { id, total_price };
        self.publish(&self.channels.complete, &event, "cart completion requested")
            .await;
    }

    /// Requests deletion of a cart.
    pub async fn delete(&self, id: CartId) {
        let event = CartDeletionRequested { id };
        self.publish(&self.channels.delete, &event, "cart deletion requested")
            .await;
    }

    /// Returns the current incomplete cart of a user, if any.
    ///
    /// Synchronous read; never mutates state.
    pub async fn incomplete_cart_for(&self, user_id: UserId) -> Result<Option<Cart>, CartError> {
        let record = self.store.find_incomplete_by_user(user_id).await?;
        record
            .as_ref()
            .map(Cart::from_record)
            .transpose()
            .map_err(CartError::from)
    }

    /// Returns a cart by id, scoped to its owning user.
    pub async fn cart_for(&self, id: CartId, user_id: UserId) -> Result<Option<Cart>, CartError> {
        let record = self.store.find_by_id_and_user(id, user_id).await?;
        record
            .as_ref()
            .map(Cart::from_record)
            .transpose()
            .map_err(CartError::from)
    }

    async fn publish<E: Serialize>(&self, channel: &str, event: &E, description: &str) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "error serializing {description} event");
                return;
            }
        };

        match self.publisher.send(channel, payload).await {
            Ok(()) => tracing::info!(channel, "sent {description} event"),
            Err(err) => {
                // At-most-once: no retry on the producer side.
                tracing::error!(channel, error = %err, "error sending {description} event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus::InMemoryBus;
    use cart_store::InMemoryCartStore;
    use common::ProductId;

    fn commands(
        store: InMemoryCartStore,
        bus: InMemoryBus,
    ) -> CartCommands<InMemoryCartStore, InMemoryBus> {
        CartCommands::new(store, bus, Channels::default())
    }

    fn item(product: i32, unit_major: f64, qty: u32) -> Item {
        Item::new(
            ProductId::from_raw(product),
            Money::from_major_units(unit_major),
            qty,
        )
    }

    #[tokio::test]
    async fn each_intent_publishes_to_its_channel() {
        let bus = InMemoryBus::new();
        let channels = Channels::default();
        let commands = commands(InMemoryCartStore::new(), bus.clone());

        commands
            .create_cart(UserId::from_raw(1), vec![item(7, 10.0, 2)])
            .await;
        commands
            .update_items(CartId::from_raw(5), vec![item(7, 10.0, 3)])
            .await;
        commands
            .complete(CartId::from_raw(5), Money::from_major_units(30.0))
            .await;
        commands.delete(CartId::from_raw(5)).await;

        assert_eq!(bus.pending(&channels.create).await, 1);
        assert_eq!(bus.pending(&channels.update_items).await, 1);
        assert_eq!(bus.pending(&channels.complete).await, 1);
        assert_eq!(bus.pending(&channels.delete).await, 1);
    }

    #[tokio::test]
    async fn update_items_sends_summed_total() {
        let bus = InMemoryBus::new();
        let channels = Channels::default();
        let commands = commands(InMemoryCartStore::new(), bus.clone());

        commands
            .update_items(CartId::from_raw(5), vec![item(7, 10.0, 2), item(8, 2.5, 4)])
            .await;

        // Read the published payload back through a capturing handler.
        struct Capture(tokio::sync::Mutex<Option<String>>);

        #[async_trait::async_trait]
        impl bus::EventHandler for Capture {
            async fn handle(&self, payload: &str) -> bus::HandlerResult {
                *self.0.lock().await = Some(payload.to_string());
                Ok(())
            }
        }

        let capture = std::sync::Arc::new(Capture(tokio::sync::Mutex::new(None)));
        bus::EventSubscriber::subscribe(&bus, &channels.update_items, "test", capture.clone());
        bus.deliver_pending().await;

        let payload = capture.0.lock().await.clone().unwrap();
        let event: CartItemsUpdateRequested = serde_json::from_str(&payload).unwrap();
        assert_eq!(event.total_price, Money::from_cents(3000));
    }

    #[tokio::test]
    async fn publish_failure_is_swallowed() {
        let bus = InMemoryBus::new();
        bus.set_publish_failure(true);
        let commands = commands(InMemoryCartStore::new(), bus.clone());

        // Must not panic or surface an error to the caller.
        commands.create_cart(UserId::from_raw(1), vec![]).await;
        commands.delete(CartId::from_raw(1)).await;

        assert_eq!(bus.pending(&Channels::default().create).await, 0);
    }

    #[tokio::test]
    async fn reads_bypass_the_bus() {
        let store = InMemoryCartStore::new();
        let cart = Cart::new(CartId::from_raw(9), UserId::from_raw(1), vec![item(7, 10.0, 2)]);
        cart_store::CartStore::save(&store, cart.to_record().unwrap())
            .await
            .unwrap();

        let bus = InMemoryBus::new();
        let commands = commands(store, bus.clone());

        let found = commands
            .incomplete_cart_for(UserId::from_raw(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, cart);

        let scoped = commands
            .cart_for(CartId::from_raw(9), UserId::from_raw(2))
            .await
            .unwrap();
        assert!(scoped.is_none());

        // No events were produced by reads.
        let channels = Channels::default();
        assert_eq!(bus.pending(&channels.create).await, 0);
    }
}
