//! Entry point: wires the producer, bus, processor and order use case over
//! in-memory collaborators and drives one cart lifecycle end to end.

mod config;

use std::sync::Arc;

use bus::InMemoryBus;
use cart_store::InMemoryCartStore;
use common::{Money, ProductId, UserId};
use domain::{CartCommands, Item};
use orders::InMemoryOrderService;
use processor::CartEventProcessor;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::Config;

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(?config, "starting cart event pipeline");

    // 2. Construct collaborators and register the consumer side
    let bus = InMemoryBus::new();
    let store = InMemoryCartStore::new();
    let orders = InMemoryOrderService::new();

    let event_processor = Arc::new(CartEventProcessor::new(store.clone(), orders.clone()));
    processor::register(
        &bus,
        &config.channels,
        &config.consumer_group,
        event_processor,
    );

    let commands = CartCommands::new(store, bus.clone(), config.channels.clone());

    // 3. Drive one cart through its lifecycle
    let user = UserId::from_raw(1);
    let widget = |qty| Item::new(ProductId::from_raw(7), Money::from_major_units(10.0), qty);

    commands.create_cart(user, vec![widget(2)]).await;
    bus.deliver_until_settled().await;

    let cart = commands
        .incomplete_cart_for(user)
        .await
        .expect("store read failed")
        .expect("cart should have been created");
    tracing::info!(cart_id = %cart.id, total = %cart.total_price, "cart created");

    commands.update_items(cart.id, vec![widget(3)]).await;
    bus.deliver_until_settled().await;

    commands
        .complete(cart.id, Money::from_major_units(30.0))
        .await;
    bus.deliver_until_settled().await;

    let completed = commands
        .cart_for(cart.id, user)
        .await
        .expect("store read failed")
        .expect("cart should still exist");
    let order = orders.order_for(cart.id).await;
    tracing::info!(
        cart_id = %completed.id,
        completed = completed.completed,
        order_created = order.is_some(),
        "cart lifecycle finished"
    );
}
