//! HTTP route handlers.

pub mod checkout;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod tracking;

use checkout_core::{CheckoutOrchestrator, InMemoryLoyaltyLedger, InMemoryPaymentGateway};
use repository::OrderRepository;
use tracking_core::TrackingReader;

/// Shared application state accessible from all handlers.
pub struct AppState<R: OrderRepository + Clone> {
    pub orchestrator: CheckoutOrchestrator<R, InMemoryPaymentGateway, InMemoryLoyaltyLedger>,
    pub repository: R,
    pub tracker: TrackingReader<R>,
    pub gateway: InMemoryPaymentGateway,
    pub loyalty: InMemoryLoyaltyLedger,
}
