//! Order read and status-advance endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::OrderId;
use domain::{CustomerId, Order, OrderStatus, TimelineEntry};
use repository::OrderRepository;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::AppState;

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub subtotal_cents: i64,
    pub shipping_fee_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub timeline: Vec<TimelineEntry>,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let items = order
            .items
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.to_string(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price.cents(),
            })
            .collect();

        Self {
            id: order.id.to_string(),
            order_number: order.order_number.to_string(),
            status: order.status.as_str().to_string(),
            items,
            subtotal_cents: order.subtotal.cents(),
            shipping_fee_cents: order.shipping_fee.cents(),
            tax_cents: order.tax.cents(),
            total_cents: order.total.cents(),
            timeline: order.timeline,
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// GET /orders/:id — load an order by its internal ID.
#[tracing::instrument(skip(state))]
pub async fn get<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.repository.get(&order_id).await?;
    Ok(Json(order.into()))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub customer_id: uuid::Uuid,
}

/// GET /orders?customer_id=… — list a customer's orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let customer_id = CustomerId::from_uuid(params.customer_id);
    let orders = state.repository.list_for_customer(customer_id).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

#[derive(Deserialize)]
pub struct StatusChangeRequest {
    pub status: OrderStatus,
}

/// POST /orders/:id/status — advance an order's status.
///
/// Invalid transitions (skips, moves out of a terminal state, a cancel
/// after confirmation window closed) come back as 409.
#[tracing::instrument(skip(state, req))]
pub async fn set_status<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.repository.update_status(&order_id, req.status).await?;
    Ok(Json(order.into()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    OrderId::parse(id).map_err(|e| ApiError::BadRequest(format!("invalid order ID: {e}")))
}
