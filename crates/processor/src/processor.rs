//! Event application against the cart store.

use cart_store::{CartStore, CartStoreError};
use common::CartId;
use domain::{
    Cart, CartCompletionRequested, CartCreationRequested, CartDeletionRequested,
    CartItemsUpdateRequested, Item,
};
use orders::OrderUseCase;

use crate::error::ProcessorError;
use crate::outcome::{Outcome, RejectReason};

/// Applies cart events to the store under the idempotency and conflict
/// rules, and triggers order creation on completion.
///
/// The processor is the single writer: every precondition is checked against
/// the store at read time because no ordering holds across event kinds for
/// the same cart. Concurrent workers are safe because each transition
/// tolerates duplicate delivery and the store enforces the uniqueness
/// invariant on insert.
pub struct CartEventProcessor<S, O> {
    store: S,
    orders: O,
}

impl<S, O> CartEventProcessor<S, O>
where
    S: CartStore,
    O: OrderUseCase,
{
    /// Creates a processor over the given collaborators.
    pub fn new(store: S, orders: O) -> Self {
        Self { store, orders }
    }

    /// Handles a creation request: insert a new incomplete cart unless the
    /// user already has one.
    #[tracing::instrument(skip(self, event), fields(user_id = %event.user_id))]
    pub async fn apply_creation(
        &self,
        event: CartCreationRequested,
    ) -> Result<Outcome, ProcessorError> {
        if let Some(existing) = self.store.find_incomplete_by_user(event.user_id).await? {
            tracing::error!(
                existing_id = %existing.id,
                "can't create cart: an incomplete cart already exists"
            );
            return Ok(Outcome::Rejected(RejectReason::DuplicateIncompleteCart {
                user_id: event.user_id,
            }));
        }

        let items: Vec<Item> = event.items.into_iter().map(Item::from).collect();
        let cart = Cart::new(CartId::generate(), event.user_id, items);
        let record = cart.to_record()?;

        match self.store.save(record).await {
            Ok(()) => {
                tracing::info!(cart_id = %cart.id, total = %cart.total_price, "cart saved");
                Ok(Outcome::Applied)
            }
            // Lost the race to a concurrent creation; same rejection as the
            // application-level check.
            Err(CartStoreError::UniqueViolation { user_id }) => {
                tracing::error!("can't create cart: an incomplete cart already exists");
                Ok(Outcome::Rejected(RejectReason::DuplicateIncompleteCart {
                    user_id,
                }))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Handles an items update: overwrite items and total while the cart is
    /// still incomplete.
    #[tracing::instrument(skip(self, event), fields(cart_id = %event.id))]
    pub async fn apply_items_update(
        &self,
        event: CartItemsUpdateRequested,
    ) -> Result<Outcome, ProcessorError> {
        let Some(mut record) = self.store.find_by_id(event.id).await? else {
            tracing::error!("no cart found to update items");
            return Ok(Outcome::NotFound);
        };

        if record.completed {
            tracing::error!("can't update items on a completed cart");
            return Ok(Outcome::Rejected(RejectReason::AlreadyCompleted {
                id: event.id,
            }));
        }

        // Per-item totals are derived here; the cart total is taken from the
        // event as supplied, to be validated (not recomputed) at completion.
        let items: Vec<Item> = event.items.into_iter().map(Item::from).collect();
        record.items = serde_json::to_value(&items)?;
        record.total_price = event.total_price;
        self.store.save(record).await?;

        tracing::info!(total = %event.total_price, "cart items updated");
        Ok(Outcome::Applied)
    }

    /// Handles a completion request: flip the completed flag when the
    /// supplied total matches the stored one, then trigger order creation.
    #[tracing::instrument(skip(self, event), fields(cart_id = %event.id))]
    pub async fn apply_completion(
        &self,
        event: CartCompletionRequested,
    ) -> Result<Outcome, ProcessorError> {
        let Some(mut record) = self.store.find_by_id(event.id).await? else {
            tracing::error!("no cart found to complete");
            return Ok(Outcome::NotFound);
        };

        if record.completed {
            // Redelivery of an applied completion: idempotent no-op.
            tracing::info!("cart already completed");
            return Ok(Outcome::Rejected(RejectReason::AlreadyCompleted {
                id: event.id,
            }));
        }

        if record.total_price != event.total_price {
            tracing::error!(
                stored = %record.total_price,
                supplied = %event.total_price,
                "cart total price differs from supplied price"
            );
            return Ok(Outcome::Rejected(RejectReason::PriceMismatch {
                id: event.id,
                stored: record.total_price,
                supplied: event.total_price,
            }));
        }

        record.completed = true;
        self.store.save(record.clone()).await?;
        tracing::info!("cart completed");

        // Completion is committed; order creation is best-effort and must
        // not roll it back. The order side dedupes on the cart id.
        match Cart::from_record(&record) {
            Ok(cart) => {
                if let Err(err) = self.orders.create(cart).await {
                    tracing::warn!(error = %err, "order creation failed; cart stays completed");
                } else {
                    tracing::info!("requested order creation for cart");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored cart could not be mapped for order creation");
            }
        }

        Ok(Outcome::Applied)
    }

    /// Handles a deletion request: remove the row if present.
    #[tracing::instrument(skip(self, event), fields(cart_id = %event.id))]
    pub async fn apply_deletion(
        &self,
        event: CartDeletionRequested,
    ) -> Result<Outcome, ProcessorError> {
        if self.store.delete_by_id(event.id).await? {
            tracing::info!("cart deleted");
            Ok(Outcome::Applied)
        } else {
            tracing::info!("no cart to delete");
            Ok(Outcome::NotFound)
        }
    }
}
