//! Shared identifier types used across the marketplace checkout system.

pub mod types;

pub use types::{CorrelationId, OrderId, OrderIdParseError};
