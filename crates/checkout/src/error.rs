//! Checkout error types.

use common::OrderId;
use domain::{PricingError, ValidationErrors};
use repository::RepositoryError;
use thiserror::Error;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Shipping details failed validation; no side effects have occurred.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Checkout was attempted with nothing to buy.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Pricing rejected the inputs (e.g. an unknown coupon code).
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The payment gateway declined or errored. The order stays pending
    /// and the attempt can be resumed with the same correlation ID.
    #[error("payment failed: {0}")]
    Payment(String),

    /// Loyalty redemption failed after payment was confirmed. The order
    /// stays confirmed; no points were deducted.
    #[error("loyalty redemption failed: {0}")]
    Loyalty(String),

    /// A resubmitted attempt resolved to an order that was cancelled in
    /// the meantime; a fresh checkout needs a new correlation ID.
    #[error("order {0} was cancelled")]
    OrderCancelled(OrderId),

    /// Order persistence error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
