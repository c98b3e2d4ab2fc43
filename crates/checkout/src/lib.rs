//! Checkout orchestration for the marketplace storefront.
//!
//! The [`CheckoutOrchestrator`] turns a cart (or a single direct buy) into
//! a confirmed order, coordinating shipping validation, pricing, order
//! persistence, the payment gateway, and the loyalty ledger. Attempts are
//! idempotent per correlation ID and resumable after payment failures.

pub mod error;
pub mod gateway;
pub mod loyalty;
pub mod orchestrator;
pub mod progress;
pub mod request;

pub use error::{CheckoutError, Result};
pub use gateway::{InMemoryPaymentGateway, IntentStatus, PaymentGateway, PaymentIntent};
pub use loyalty::{InMemoryLoyaltyLedger, LoyaltyLedger};
pub use orchestrator::{CheckoutOrchestrator, CheckoutOutcome};
pub use progress::CheckoutProgress;
pub use request::{CheckoutInput, CheckoutRequest};
