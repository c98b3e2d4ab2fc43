//! Loyalty ledger trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::CustomerId;

use crate::error::CheckoutError;

/// Trait for loyalty point redemption.
///
/// `redeem` is compare-and-swap on the balance: it fails instead of
/// overdrawing when the balance changed since the caller last read it.
#[async_trait]
pub trait LoyaltyLedger: Send + Sync {
    /// Deducts `points` from the customer's balance, or fails if the
    /// current balance no longer covers them.
    async fn redeem(&self, customer_id: CustomerId, points: i64) -> Result<i64, CheckoutError>;

    /// Returns the customer's current balance.
    async fn balance(&self, customer_id: CustomerId) -> Result<i64, CheckoutError>;
}

/// In-memory loyalty ledger for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoyaltyLedger {
    balances: Arc<RwLock<HashMap<CustomerId, i64>>>,
}

impl InMemoryLoyaltyLedger {
    /// Creates a new in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a customer's balance, creating the account if needed.
    pub fn set_balance(&self, customer_id: CustomerId, points: i64) {
        self.balances.write().unwrap().insert(customer_id, points);
    }
}

#[async_trait]
impl LoyaltyLedger for InMemoryLoyaltyLedger {
    async fn redeem(&self, customer_id: CustomerId, points: i64) -> Result<i64, CheckoutError> {
        if points == 0 {
            return self.balance(customer_id).await;
        }
        if points < 0 {
            return Err(CheckoutError::Loyalty(format!(
                "cannot redeem a negative point amount: {points}"
            )));
        }

        let mut balances = self.balances.write().unwrap();
        let balance = balances.entry(customer_id).or_insert(0);
        if *balance < points {
            return Err(CheckoutError::Loyalty(format!(
                "insufficient balance: have {balance}, asked for {points}"
            )));
        }
        *balance -= points;
        Ok(*balance)
    }

    async fn balance(&self, customer_id: CustomerId) -> Result<i64, CheckoutError> {
        Ok(self
            .balances
            .read()
            .unwrap()
            .get(&customer_id)
            .copied()
            .unwrap_or(0))
    }
}
