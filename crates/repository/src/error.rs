//! Repository error types.

use common::OrderId;
use domain::OrderStatus;
use thiserror::Error;

/// Errors that can occur during order persistence operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No order matches the given key. A normal outcome for lookups
    /// (mistyped tracking codes), not a system fault.
    #[error("order not found: {key}")]
    NotFound { key: String },

    /// The requested status change is not legal from the current status.
    #[error("invalid transition: {from} -> {to} for order {order_id}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for repository results.
pub type Result<T> = std::result::Result<T, RepositoryError>;
