//! Checkout orchestrator.
//!
//! Drives the place-order saga: validate shipping, normalize the request,
//! price it, create a pending order, create and confirm a payment intent,
//! then confirm the order and redeem loyalty points. Every step is keyed
//! by the client's correlation ID so a retry resumes instead of repeating
//! side effects.

use std::collections::HashMap;
use std::sync::Arc;

use common::CorrelationId;
use domain::{
    CartSession, CartStore, Order, OrderDraft, OrderStatus, PaymentInfo, PricingBreakdown, price,
};
use repository::OrderRepository;
use tokio::sync::RwLock;

use crate::error::{CheckoutError, Result};
use crate::gateway::PaymentGateway;
use crate::loyalty::LoyaltyLedger;
use crate::progress::CheckoutProgress;
use crate::request::{CheckoutInput, CheckoutRequest};

/// The result of a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    /// The confirmed order.
    pub order: Order,
    /// The gateway intent that paid for it. `None` only when a duplicate
    /// submit replayed an order whose attempt record was already gone.
    pub payment_intent_id: Option<String>,
    /// The totals the customer was charged against.
    pub breakdown: PricingBreakdown,
    /// True when the caller should clear the source cart. Direct buys
    /// never touch the cart.
    pub clear_cart: bool,
}

/// Orchestrates the checkout saga across the repository, the payment
/// gateway, and the loyalty ledger.
pub struct CheckoutOrchestrator<R, G, L>
where
    R: OrderRepository,
    G: PaymentGateway,
    L: LoyaltyLedger,
{
    repository: R,
    gateway: G,
    loyalty: L,
    progress: Arc<RwLock<HashMap<CorrelationId, CheckoutProgress>>>,
}

impl<R, G, L> CheckoutOrchestrator<R, G, L>
where
    R: OrderRepository,
    G: PaymentGateway,
    L: LoyaltyLedger,
{
    /// Creates a new orchestrator.
    pub fn new(repository: R, gateway: G, loyalty: L) -> Self {
        Self {
            repository,
            gateway,
            loyalty,
            progress: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Places an order.
    ///
    /// Retries with the same correlation ID are safe: they reuse the
    /// pending order and payment intent from the earlier attempt, and a
    /// correlation ID whose order already confirmed replays that order
    /// without charging again.
    #[tracing::instrument(skip(self, request, input), fields(correlation_id = %input.correlation_id))]
    pub async fn checkout(
        &self,
        request: &CheckoutRequest,
        input: &CheckoutInput,
    ) -> Result<CheckoutOutcome> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let checkout_start = std::time::Instant::now();

        // 1. Validate shipping before any side effects.
        input.shipping.validate()?;

        // 2. Normalize the request into lines and price them.
        let lines = request.normalize()?;
        let breakdown = price(
            &lines,
            input.coupon.as_deref(),
            input.requested_points,
            input.identity.loyalty_balance,
        )?;

        // 3. Create the pending order. The repository is idempotent on the
        // correlation ID, so a resumed attempt gets its earlier order back.
        let draft = OrderDraft {
            correlation_id: input.correlation_id,
            customer_id: input.identity.id,
            items: lines.into_iter().map(Into::into).collect(),
            shipping: input.shipping.clone(),
            payment: PaymentInfo {
                method: input.payment_method,
            },
            subtotal: breakdown.subtotal,
            shipping_fee: breakdown.shipping_fee,
            tax: breakdown.tax,
            total: breakdown.total,
        };
        let order = self.repository.create(draft).await?;

        // A confirmed (or further along) order means a previous attempt
        // with this correlation ID already went through. Replay it; a
        // cancelled order is a refusal, not a success.
        if order.status != OrderStatus::Pending {
            if order.status == OrderStatus::Cancelled {
                metrics::counter!("checkout_cancelled_replays_total").increment(1);
                tracing::warn!(order_id = %order.id, "duplicate submit hit a cancelled order");
                return Err(CheckoutError::OrderCancelled(order.id));
            }
            let intent_id = {
                let progress = self.progress.read().await;
                progress
                    .get(&input.correlation_id)
                    .and_then(|p| p.payment_intent_id.clone())
            };
            metrics::counter!("checkout_replays_total").increment(1);
            tracing::info!(order_id = %order.id, "duplicate submit replayed existing order");
            return Ok(CheckoutOutcome {
                order,
                payment_intent_id: intent_id,
                breakdown,
                clear_cart: request.is_cart_mode(),
            });
        }

        self.progress
            .write()
            .await
            .entry(input.correlation_id)
            .or_insert_with(|| CheckoutProgress::order_created(order.id.clone()));

        // 4. Create or reuse the payment intent for the effective total.
        let existing_intent = {
            let progress = self.progress.read().await;
            progress
                .get(&input.correlation_id)
                .and_then(|p| p.payment_intent_id.clone())
        };
        let intent_id = match existing_intent {
            Some(id) => {
                tracing::info!(intent_id = %id, "resuming with existing payment intent");
                id
            }
            None => {
                let intent = self
                    .gateway
                    .create_intent(&order.id, breakdown.effective_total, input.payment_method)
                    .await?;
                let mut progress = self.progress.write().await;
                progress.insert(
                    input.correlation_id,
                    CheckoutProgress::order_created(order.id.clone())
                        .with_intent(&intent.intent_id),
                );
                intent.intent_id
            }
        };

        // 5. Confirm the intent. On failure the order stays pending and the
        // progress record keeps the intent for the next attempt.
        if let Err(e) = self.gateway.confirm(&intent_id, &order.id).await {
            metrics::counter!("checkout_payment_failures_total").increment(1);
            tracing::warn!(order_id = %order.id, intent_id = %intent_id, error = %e,
                "payment confirmation failed, order left pending");
            return Err(e);
        }

        // 6. Payment is in; confirm the order.
        let confirmed = self
            .repository
            .update_status(&order.id, OrderStatus::Confirmed)
            .await?;

        // 7. Redeem loyalty points. The gateway will not charge this intent
        // again, so the attempt record can go regardless of the outcome.
        if breakdown.points_applied.is_positive() {
            let redeemed = self
                .loyalty
                .redeem(input.identity.id, breakdown.points_applied.cents())
                .await;
            if let Err(e) = redeemed {
                self.progress.write().await.remove(&input.correlation_id);
                metrics::counter!("checkout_loyalty_failures_total").increment(1);
                tracing::warn!(order_id = %confirmed.id, error = %e,
                    "loyalty redemption failed after payment, order stays confirmed");
                return Err(e);
            }
        }

        self.progress.write().await.remove(&input.correlation_id);

        let duration = checkout_start.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        metrics::counter!("checkout_completed_total").increment(1);
        tracing::info!(order_id = %confirmed.id, order_number = %confirmed.order_number,
            total = %breakdown.effective_total, "checkout completed");

        Ok(CheckoutOutcome {
            order: confirmed,
            payment_intent_id: Some(intent_id),
            breakdown,
            clear_cart: request.is_cart_mode(),
        })
    }

    /// Checks out a cart session and clears it on success.
    ///
    /// On any failure the cart is left exactly as it was.
    pub async fn checkout_cart<S: CartStore>(
        &self,
        session: &mut CartSession<S>,
        input: &CheckoutInput,
    ) -> Result<CheckoutOutcome> {
        let request = CheckoutRequest::Cart {
            snapshot: session.snapshot(),
        };
        let outcome = self.checkout(&request, input).await?;
        if outcome.clear_cart {
            session.clear();
        }
        Ok(outcome)
    }

    /// Returns the progress record for a correlation ID, if an attempt is
    /// still in flight.
    pub async fn progress(&self, correlation_id: &CorrelationId) -> Option<CheckoutProgress> {
        self.progress.read().await.get(correlation_id).cloned()
    }

    /// Returns the underlying order repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }
}
