//! HTTP API server for the marketplace checkout system.
//!
//! REST endpoints for checkout, order reads, status advances, and
//! anonymous tracking, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout_core::{CheckoutOrchestrator, InMemoryLoyaltyLedger, InMemoryPaymentGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use repository::{InMemoryOrderRepository, OrderRepository};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracking_core::TrackingReader;

pub use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: OrderRepository + Clone + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/checkout", post(routes::checkout::place::<R>))
        .route("/orders", get(routes::orders::list::<R>))
        .route("/orders/{id}", get(routes::orders::get::<R>))
        .route("/orders/{id}/status", post(routes::orders::set_status::<R>))
        .route("/track/{key}", get(routes::tracking::track::<R>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over the given repository, wiring in the
/// in-memory payment gateway and loyalty ledger.
pub fn create_state<R: OrderRepository + Clone + 'static>(repository: R) -> Arc<AppState<R>> {
    let gateway = InMemoryPaymentGateway::new();
    let loyalty = InMemoryLoyaltyLedger::new();

    let orchestrator =
        CheckoutOrchestrator::new(repository.clone(), gateway.clone(), loyalty.clone());
    let tracker = TrackingReader::new(repository.clone());

    Arc::new(AppState {
        orchestrator,
        repository,
        tracker,
        gateway,
        loyalty,
    })
}

/// Creates application state over an in-memory order repository.
pub fn create_default_state() -> Arc<AppState<InMemoryOrderRepository>> {
    create_state(InMemoryOrderRepository::new())
}
