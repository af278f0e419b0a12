//! Application configuration loaded from environment variables.

use bus::Channels;

/// Runtime configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `CART_CREATE_CHANNEL`: creation channel (default: `"cart.create"`)
/// - `CART_UPDATE_ITEMS_CHANNEL`: items update channel (default: `"cart.update-items"`)
/// - `CART_COMPLETE_CHANNEL`: completion channel (default: `"cart.complete"`)
/// - `CART_DELETE_CHANNEL`: deletion channel (default: `"cart.delete"`)
/// - `CONSUMER_GROUP`: shared consumer group id (default: `"purchases-consumer"`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub channels: Channels,
    pub consumer_group: String,
    pub log_level: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Channels::default();
        Self {
            channels: Channels {
                create: env_or("CART_CREATE_CHANNEL", &defaults.create),
                update_items: env_or("CART_UPDATE_ITEMS_CHANNEL", &defaults.update_items),
                complete: env_or("CART_COMPLETE_CHANNEL", &defaults.complete),
                delete: env_or("CART_DELETE_CHANNEL", &defaults.delete),
            },
            consumer_group: env_or("CONSUMER_GROUP", "purchases-consumer"),
            log_level: env_or("RUST_LOG", "info"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channels: Channels::default(),
            consumer_group: "purchases-consumer".to_string(),
            log_level: "info".to_string(),
        }
    }
}
