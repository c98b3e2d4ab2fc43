//! Payment gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::{Money, PaymentMethod};
use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

/// Lifecycle of a payment intent at the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Created,
    Confirmed,
}

/// A payment intent held at the gateway for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// The intent ID assigned by the gateway.
    pub intent_id: String,
    pub order_id: OrderId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: IntentStatus,
}

/// Trait for payment gateway operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a payment intent for an order.
    async fn create_intent(
        &self,
        order_id: &OrderId,
        amount: Money,
        method: PaymentMethod,
    ) -> Result<PaymentIntent, CheckoutError>;

    /// Confirms an existing intent for the given order. Fails when the
    /// intent was created for a different order; confirming an
    /// already-confirmed intent succeeds without charging again.
    async fn confirm(
        &self,
        intent_id: &str,
        order_id: &OrderId,
    ) -> Result<PaymentIntent, CheckoutError>;
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    intents: HashMap<String, PaymentIntent>,
    next_id: u32,
    fail_on_create: bool,
    fail_on_confirm: bool,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail intent creation.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Configures the gateway to fail confirmation.
    pub fn set_fail_on_confirm(&self, fail: bool) {
        self.state.write().unwrap().fail_on_confirm = fail;
    }

    /// Returns the number of intents ever created.
    pub fn intent_count(&self) -> usize {
        self.state.read().unwrap().intents.len()
    }

    /// Returns true if an intent exists with the given ID.
    pub fn has_intent(&self, intent_id: &str) -> bool {
        self.state.read().unwrap().intents.contains_key(intent_id)
    }

    /// Returns the current status of an intent, if it exists.
    pub fn intent_status(&self, intent_id: &str) -> Option<IntentStatus> {
        self.state
            .read()
            .unwrap()
            .intents
            .get(intent_id)
            .map(|i| i.status)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_intent(
        &self,
        order_id: &OrderId,
        amount: Money,
        method: PaymentMethod,
    ) -> Result<PaymentIntent, CheckoutError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(CheckoutError::Payment(
                "gateway rejected intent".to_string(),
            ));
        }

        state.next_id += 1;
        let intent = PaymentIntent {
            intent_id: format!("PI-{:04}", state.next_id),
            order_id: order_id.clone(),
            amount,
            method,
            status: IntentStatus::Created,
        };
        state.intents.insert(intent.intent_id.clone(), intent.clone());

        Ok(intent)
    }

    async fn confirm(
        &self,
        intent_id: &str,
        order_id: &OrderId,
    ) -> Result<PaymentIntent, CheckoutError> {
        let mut state = self.state.write().unwrap();

        let Some(intent) = state.intents.get(intent_id).cloned() else {
            return Err(CheckoutError::Payment(format!(
                "unknown payment intent: {intent_id}"
            )));
        };

        if intent.order_id != *order_id {
            return Err(CheckoutError::Payment(format!(
                "payment intent {intent_id} does not belong to order {order_id}"
            )));
        }

        if intent.status == IntentStatus::Confirmed {
            return Ok(intent);
        }

        if state.fail_on_confirm {
            return Err(CheckoutError::Payment("payment declined".to_string()));
        }

        let confirmed = PaymentIntent {
            status: IntentStatus::Confirmed,
            ..intent
        };
        state
            .intents
            .insert(confirmed.intent_id.clone(), confirmed.clone());
        Ok(confirmed)
    }
}
