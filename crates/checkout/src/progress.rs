//! Resumable checkout progress.

use common::OrderId;
use serde::{Deserialize, Serialize};

/// How far a checkout attempt got before it stopped.
///
/// Keyed by correlation ID in the orchestrator; a retry with the same
/// correlation ID picks up the order and payment intent recorded here
/// instead of creating new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutProgress {
    /// The pending order this attempt created.
    pub order_id: OrderId,
    /// The payment intent, once one has been created at the gateway.
    pub payment_intent_id: Option<String>,
}

impl CheckoutProgress {
    /// Progress with an order but no payment intent yet.
    pub fn order_created(order_id: OrderId) -> Self {
        Self {
            order_id,
            payment_intent_id: None,
        }
    }

    /// Records the payment intent for this attempt.
    pub fn with_intent(mut self, intent_id: impl Into<String>) -> Self {
        self.payment_intent_id = Some(intent_id.into());
        self
    }
}
