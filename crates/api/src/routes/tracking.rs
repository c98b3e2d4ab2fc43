//! Anonymous tracking endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use repository::OrderRepository;
use tracking_core::TrackingView;

use crate::error::ApiError;
use crate::routes::AppState;

/// GET /track/:key — look up an order by internal ID or order number.
#[tracing::instrument(skip(state))]
pub async fn track<R: OrderRepository + Clone + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(key): Path<String>,
) -> Result<Json<TrackingView>, ApiError> {
    let view = state.tracker.track(&key).await?;
    Ok(Json(view))
}
