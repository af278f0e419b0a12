//! Logical channel names for the four cart event kinds.

/// The channel name bound to each cart event kind.
///
/// One independently ordered stream per kind. Names are configuration, not
/// code: the binary loads them from the environment and passes them to both
/// the producer and the consumer registration so the two sides always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channels {
    /// Channel carrying creation requests.
    pub create: String,
    /// Channel carrying item update requests.
    pub update_items: String,
    /// Channel carrying completion requests.
    pub complete: String,
    /// Channel carrying deletion requests.
    pub delete: String,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            create: "cart.create".to_string(),
            update_items: "cart.update-items".to_string(),
            complete: "cart.complete".to_string(),
            delete: "cart.delete".to_string(),
        }
    }
}
