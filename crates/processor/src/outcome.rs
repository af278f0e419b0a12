//! Tagged handler outcomes.

use common::{CartId, Money, UserId};

/// Why an event was dropped without being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A creation arrived while the user already has an incomplete cart.
    DuplicateIncompleteCart { user_id: UserId },

    /// The target cart is already completed.
    AlreadyCompleted { id: CartId },

    /// The supplied completion total does not match the stored total.
    PriceMismatch {
        id: CartId,
        stored: Money,
        supplied: Money,
    },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::DuplicateIncompleteCart { user_id } => {
                write!(f, "incomplete cart already exists for user {user_id}")
            }
            RejectReason::AlreadyCompleted { id } => {
                write!(f, "cart {id} is already completed")
            }
            RejectReason::PriceMismatch {
                id,
                stored,
                supplied,
            } => write!(
                f,
                "cart {id} total price is {stored} but {supplied} was supplied"
            ),
        }
    }
}

/// What happened when a handler applied one event.
///
/// All three variants acknowledge the event to the bus; only infrastructure
/// failures (see [`crate::ProcessorError`]) request redelivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transition was applied and persisted.
    Applied,

    /// A precondition failed; the event was logged and dropped.
    Rejected(RejectReason),

    /// The target row does not exist; the event was logged and dropped.
    NotFound,
}

impl Outcome {
    /// Returns true if the event changed persisted state.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
