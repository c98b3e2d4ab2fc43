use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal identifier for a persisted order.
///
/// Rendered as exactly 24 lowercase hexadecimal characters. The shape is
/// load-bearing: tracking lookups distinguish an internal id from a
/// human-facing order number purely by this 24-hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

/// Error returned when a string is not a valid order id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIdParseError;

impl std::fmt::Display for OrderIdParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order id must be exactly 24 hexadecimal characters")
    }
}

impl std::error::Error for OrderIdParseError {}

impl OrderId {
    /// Number of hex characters in an order id.
    pub const LEN: usize = 24;

    /// Generates a new random order id from UUID v4 entropy.
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let mut hex = String::with_capacity(Self::LEN);
        for byte in &bytes[..Self::LEN / 2] {
            use std::fmt::Write;
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// Parses an order id, requiring the exact 24-hex shape.
    pub fn parse(s: &str) -> Result<Self, OrderIdParseError> {
        if Self::matches_shape(s) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(OrderIdParseError)
        }
    }

    /// Returns true if the string has the 24-hex order id shape.
    pub fn matches_shape(s: &str) -> bool {
        s.len() == Self::LEN && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Client-supplied correlation id for a checkout attempt.
///
/// Retries of the same attempt reuse the same correlation id; order creation
/// is idempotent on it, so a double submit cannot create two orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Creates a new random correlation id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a correlation id from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<CorrelationId> for Uuid {
    fn from(id: CorrelationId) -> Self {
        id.0
    }
}
