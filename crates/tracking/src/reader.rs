//! Order tracking reader.
//!
//! Customers paste either the internal order ID or the human-facing order
//! number into the tracking box. The two shapes never collide: internal
//! IDs are exactly 24 hex characters, order numbers carry an `ORD-`
//! prefix, so a single string disambiguates cleanly.

use common::OrderId;
use domain::{Money, Order, OrderNumber, OrderStatus, TimelineEntry};
use chrono::{DateTime, Utc};
use repository::{OrderRepository, RepositoryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from tracking lookups.
///
/// A miss is an expected outcome here (typos, guesses), not a fault.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// No order matched the key.
    #[error("no order found for: {key}")]
    NotFound { key: String },

    /// Order persistence error.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for TrackingError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { key } => TrackingError::NotFound { key },
            other => TrackingError::Repository(other),
        }
    }
}

/// How a raw tracking string is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// A 24-hex internal order ID.
    ById(OrderId),
    /// Anything else is treated as an order number.
    ByNumber(OrderNumber),
}

impl LookupKey {
    /// Classifies a raw string by shape.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match OrderId::parse(trimmed) {
            Ok(id) => LookupKey::ById(id),
            Err(_) => LookupKey::ByNumber(OrderNumber::new(trimmed)),
        }
    }
}

/// The customer-facing view of an order's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingView {
    pub order_number: OrderNumber,
    pub status: OrderStatus,
    /// Status history in the order it happened.
    pub timeline: Vec<TimelineEntry>,
    pub placed_at: DateTime<Utc>,
    pub total: Money,
    pub item_count: u32,
}

impl From<Order> for TrackingView {
    fn from(order: Order) -> Self {
        let item_count = order.item_count();
        Self {
            order_number: order.order_number,
            status: order.status,
            timeline: order.timeline,
            placed_at: order.created_at,
            total: order.total,
            item_count,
        }
    }
}

/// Read-side tracking lookups over the order repository.
pub struct TrackingReader<R: OrderRepository> {
    repository: R,
}

impl<R: OrderRepository> TrackingReader<R> {
    /// Creates a reader over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Looks up an order by a raw tracking string.
    #[tracing::instrument(skip(self))]
    pub async fn track(&self, raw: &str) -> Result<TrackingView, TrackingError> {
        metrics::counter!("tracking_lookups_total").increment(1);

        let order = match LookupKey::parse(raw) {
            LookupKey::ById(id) => self.repository.get(&id).await,
            LookupKey::ByNumber(number) => self.repository.get_by_number(&number).await,
        };

        match order {
            Ok(order) => Ok(TrackingView::from(order)),
            Err(RepositoryError::NotFound { key }) => {
                // Misses are routine; log at info, not error
                tracing::info!(%key, "tracking lookup found no order");
                metrics::counter!("tracking_misses_total").increment(1);
                Err(TrackingError::NotFound { key })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Looks up an order by its internal ID.
    pub async fn get_by_id(&self, id: &OrderId) -> Result<TrackingView, TrackingError> {
        let order = self.repository.get(id).await?;
        Ok(TrackingView::from(order))
    }
}
