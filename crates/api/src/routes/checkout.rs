//! Checkout endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use checkout_core::{CheckoutError, CheckoutInput, CheckoutRequest};
use common::CorrelationId;
use domain::{CustomerIdentity, PaymentMethod, PricingBreakdown, ShippingInfo};
use repository::OrderRepository;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

/// POST /checkout request body.
///
/// The `mode` tag selects cart or direct-buy entry; the rest is the
/// customer context the storefront already resolved.
#[derive(Deserialize)]
pub struct CheckoutBody {
    #[serde(flatten)]
    pub request: CheckoutRequest,
    pub customer: CustomerIdentity,
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub coupon: Option<String>,
    #[serde(default)]
    pub requested_points: i64,
    pub correlation_id: CorrelationId,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_id: String,
    pub order_number: String,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub breakdown: PricingBreakdown,
    /// True when the storefront should clear the customer's cart.
    pub clear_cart: bool,
}

/// POST /checkout — place an order.
#[tracing::instrument(skip(state, body), fields(correlation_id = %body.correlation_id))]
pub async fn place<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Json(body): Json<CheckoutBody>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let input = CheckoutInput {
        identity: body.customer,
        shipping: body.shipping,
        payment_method: body.payment_method,
        coupon: body.coupon,
        requested_points: body.requested_points,
        correlation_id: body.correlation_id,
    };

    match state.orchestrator.checkout(&body.request, &input).await {
        Ok(outcome) => Ok((
            StatusCode::CREATED,
            Json(CheckoutResponse {
                order_id: outcome.order.id.to_string(),
                order_number: outcome.order.order_number.to_string(),
                status: outcome.order.status.as_str().to_string(),
                payment_intent_id: outcome.payment_intent_id,
                breakdown: outcome.breakdown,
                clear_cart: outcome.clear_cart,
            }),
        )),
        Err(CheckoutError::Payment(message)) => {
            // Hand the client what it needs to retry the same attempt
            let progress = state.orchestrator.progress(&body.correlation_id).await;
            Err(ApiError::PaymentRequired {
                message,
                order_id: progress.as_ref().map(|p| p.order_id.to_string()),
                payment_intent_id: progress.and_then(|p| p.payment_intent_id),
            })
        }
        Err(e) => Err(e.into()),
    }
}
