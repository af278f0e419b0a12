//! Raw-payload handler boundary and channel registration.
//!
//! One handler per channel, registered explicitly at startup. Each handler
//! logs the raw payload, deserializes it, delegates to the typed transition,
//! and re-raises any failure so the bus redelivers the message. Outcomes are
//! acknowledged whether applied or dropped.

use std::sync::Arc;

use async_trait::async_trait;
use bus::{Channels, EventHandler, EventSubscriber, HandlerResult};
use cart_store::CartStore;
use domain::{
    CartCompletionRequested, CartCreationRequested, CartDeletionRequested,
    CartItemsUpdateRequested,
};
use orders::OrderUseCase;
use serde::de::DeserializeOwned;

use crate::outcome::Outcome;
use crate::processor::CartEventProcessor;

fn parse<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload).inspect_err(|err| {
        tracing::error!(payload, error = %err, "error processing event");
        metrics::counter!("cart_events_failed").increment(1);
    })
}

fn track(kind: &'static str, outcome: &Outcome) {
    match outcome {
        Outcome::Applied => {
            metrics::counter!("cart_events_applied", "kind" => kind).increment(1);
        }
        Outcome::Rejected(_) => {
            metrics::counter!("cart_events_rejected", "kind" => kind).increment(1);
        }
        Outcome::NotFound => {
            metrics::counter!("cart_events_not_found", "kind" => kind).increment(1);
        }
    }
}

struct CreationHandler<S, O>(Arc<CartEventProcessor<S, O>>);

#[async_trait]
impl<S, O> EventHandler for CreationHandler<S, O>
where
    S: CartStore + 'static,
    O: OrderUseCase + 'static,
{
    async fn handle(&self, payload: &str) -> HandlerResult {
        tracing::info!(payload, "received cart creation requested event");
        let event: CartCreationRequested = parse(payload)?;
        let outcome = self.0.apply_creation(event).await.inspect_err(|err| {
            tracing::error!(payload, error = %err, "error processing event");
            metrics::counter!("cart_events_failed").increment(1);
        })?;
        track("creation", &outcome);
        Ok(())
    }
}

struct ItemsUpdateHandler<S, O>(Arc<CartEventProcessor<S, O>>);

#[async_trait]
impl<S, O> EventHandler for ItemsUpdateHandler<S, O>
where
    S: CartStore + 'static,
    O: OrderUseCase + 'static,
{
    async fn handle(&self, payload: &str) -> HandlerResult {
        tracing::info!(payload, "received cart items update requested event");
        let event: CartItemsUpdateRequested = parse(payload)?;
        let outcome = self.0.apply_items_update(event).await.inspect_err(|err| {
            tracing::error!(payload, error = %err, "error processing event");
            metrics::counter!("cart_events_failed").increment(1);
        })?;
        track("items_update", &outcome);
        Ok(())
    }
}

struct CompletionHandler<S, O>(Arc<CartEventProcessor<S, O>>);

#[async_trait]
impl<S, O> EventHandler for CompletionHandler<S, O>
where
    S: CartStore + 'static,
    O: OrderUseCase + 'static,
{
    async fn handle(&self, payload: &str) -> HandlerResult {
        tracing::info!(payload, "received cart completion requested event");
        let event: CartCompletionRequested = parse(payload)?;
        let outcome = self.0.apply_completion(event).await.inspect_err(|err| {
            tracing::error!(payload, error = %err, "error processing event");
            metrics::counter!("cart_events_failed").increment(1);
        })?;
        track("completion", &outcome);
        Ok(())
    }
}

struct DeletionHandler<S, O>(Arc<CartEventProcessor<S, O>>);

#[async_trait]
impl<S, O> EventHandler for DeletionHandler<S, O>
where
    S: CartStore + 'static,
    O: OrderUseCase + 'static,
{
    async fn handle(&self, payload: &str) -> HandlerResult {
        tracing::info!(payload, "received cart deletion requested event");
        let event: CartDeletionRequested = parse(payload)?;
        let outcome = self.0.apply_deletion(event).await.inspect_err(|err| {
            tracing::error!(payload, error = %err, "error processing event");
            metrics::counter!("cart_events_failed").increment(1);
        })?;
        track("deletion", &outcome);
        Ok(())
    }
}

/// Binds the four channel handlers to the bus under one consumer group.
///
/// Called once at startup; the bindings are the complete consumer surface
/// of the processor.
pub fn register<B, S, O>(
    bus: &B,
    channels: &Channels,
    group: &str,
    processor: Arc<CartEventProcessor<S, O>>,
) where
    B: EventSubscriber + ?Sized,
    S: CartStore + 'static,
    O: OrderUseCase + 'static,
{
    bus.subscribe(
        &channels.create,
        group,
        Arc::new(CreationHandler(Arc::clone(&processor))),
    );
    bus.subscribe(
        &channels.update_items,
        group,
        Arc::new(ItemsUpdateHandler(Arc::clone(&processor))),
    );
    bus.subscribe(
        &channels.complete,
        group,
        Arc::new(CompletionHandler(Arc::clone(&processor))),
    );
    bus.subscribe(
        &channels.delete,
        group,
        Arc::new(DeletionHandler(processor)),
    );
}
