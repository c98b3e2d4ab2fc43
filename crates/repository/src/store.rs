//! Order repository trait.

use async_trait::async_trait;
use common::OrderId;
use domain::{CustomerId, Order, OrderDraft, OrderNumber, OrderStatus};

use crate::error::Result;

/// Persistence boundary for orders.
///
/// Orders are created once and never deleted; the only permitted mutation
/// is a status transition, which appends to the order's timeline.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a draft as a new `Pending` order, assigning its id and
    /// order number.
    ///
    /// Idempotent on the draft's correlation id: creating twice with the
    /// same correlation id returns the already-persisted order instead of
    /// a duplicate, so a double submit converges on one order.
    async fn create(&self, draft: OrderDraft) -> Result<Order>;

    /// Fetches an order by internal id.
    async fn get(&self, id: &OrderId) -> Result<Order>;

    /// Fetches an order by human-facing order number.
    async fn get_by_number(&self, number: &OrderNumber) -> Result<Order>;

    /// Transitions an order to `status`, enforcing the status machine and
    /// appending a timeline entry. Returns the updated order.
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order>;

    /// Lists a customer's orders, newest first.
    async fn list_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>>;
}
