use serde::{Deserialize, Serialize};

/// Unique identifier for a cart.
///
/// Wraps the epoch-millisecond value assigned by the owning domain when the
/// cart row is first persisted. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(i64);

impl CartId {
    /// Creates a cart ID from an existing raw value.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Generates a new cart ID from the current wall clock, in milliseconds.
    ///
    /// Strictly increasing within the process: two generations in the same
    /// millisecond cannot collide.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicI64, Ordering};
        static LAST: AtomicI64 = AtomicI64::new(0);

        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = LAST.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match LAST.compare_exchange_weak(prev, next, Ordering::SeqCst, Ordering::Relaxed) {
                Ok(_) => return Self(next),
                Err(observed) => prev = observed,
            }
        }
    }

    /// Returns the underlying raw value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CartId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<CartId> for i64 {
    fn from(id: CartId) -> Self {
        id.0
    }
}

/// Identifier of the user owning a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Creates a user ID from an existing raw value.
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the underlying raw value.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Identifier of a product referenced by a cart item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Creates a product ID from an existing raw value.
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the underlying raw value.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProductId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<ProductId> for i32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_id_roundtrips_raw_value() {
        let id = CartId::from_raw(1_700_000_000_000);
        assert_eq!(id.as_i64(), 1_700_000_000_000);
        assert_eq!(i64::from(id), 1_700_000_000_000);
    }

    #[test]
    fn cart_id_generate_never_collides() {
        let a = CartId::generate();
        let b = CartId::generate();
        assert!(b.as_i64() > a.as_i64());
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&CartId::from_raw(42)).unwrap();
        assert_eq!(json, "42");
        let json = serde_json::to_string(&UserId::from_raw(7)).unwrap();
        assert_eq!(json, "7");
        let back: ProductId = serde_json::from_str("13").unwrap();
        assert_eq!(back, ProductId::from_raw(13));
    }
}
