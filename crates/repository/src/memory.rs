//! In-memory order repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CorrelationId, OrderId};
use domain::{CustomerId, Order, OrderDraft, OrderNumber, OrderStatus, TimelineEntry};
use tokio::sync::RwLock;

use crate::error::{RepositoryError, Result};
use crate::store::OrderRepository;

/// In-memory order repository for tests and embedded use.
///
/// Provides the same interface and invariants as the PostgreSQL
/// implementation; the correlation-id map stands in for the unique
/// constraint.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    state: Arc<RwLock<State>>,
}

#[derive(Default)]
struct State {
    orders: HashMap<OrderId, Order>,
    by_correlation: HashMap<CorrelationId, OrderId>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.orders.clear();
        state.by_correlation.clear();
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, draft: OrderDraft) -> Result<Order> {
        let mut state = self.state.write().await;

        if let Some(existing_id) = state.by_correlation.get(&draft.correlation_id) {
            let existing = state
                .orders
                .get(existing_id)
                .cloned()
                .ok_or_else(|| RepositoryError::NotFound {
                    key: existing_id.to_string(),
                })?;
            tracing::info!(
                order_id = %existing.id,
                correlation_id = %draft.correlation_id,
                "create replayed for known correlation id"
            );
            return Ok(existing);
        }

        let mut order = Order::from_draft(draft);
        // Mirrors the unique index on order_number in postgres.
        while state.orders.values().any(|o| o.order_number == order.order_number) {
            order.order_number = OrderNumber::generate();
        }
        state.by_correlation.insert(order.correlation_id, order.id.clone());
        state.orders.insert(order.id.clone(), order.clone());
        metrics::counter!("orders_created_total").increment(1);
        Ok(order)
    }

    async fn get(&self, id: &OrderId) -> Result<Order> {
        self.state
            .read()
            .await
            .orders
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound { key: id.to_string() })
    }

    async fn get_by_number(&self, number: &OrderNumber) -> Result<Order> {
        self.state
            .read()
            .await
            .orders
            .values()
            .find(|o| &o.order_number == number)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                key: number.to_string(),
            })
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound { key: id.to_string() })?;

        if !order.status.can_transition_to(status) {
            return Err(RepositoryError::InvalidTransition {
                order_id: id.clone(),
                from: order.status,
                to: status,
            });
        }

        order.status = status;
        order.timeline.push(TimelineEntry::now(status));
        Ok(order.clone())
    }

    async fn list_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, OrderLine, PaymentInfo, PaymentMethod, ShippingInfo};

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            address: "14 Lakeview Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            zip: "560001".to_string(),
            country: "IN".to_string(),
        }
    }

    fn draft(customer_id: CustomerId, correlation_id: CorrelationId) -> OrderDraft {
        OrderDraft {
            correlation_id,
            customer_id,
            items: vec![OrderLine::new("SKU-001", "Clay Mug", 2, Money::from_cents(450))],
            shipping: shipping(),
            payment: PaymentInfo {
                method: PaymentMethod::Card,
            },
            subtotal: Money::from_cents(900),
            shipping_fee: Money::from_cents(99),
            tax: Money::from_cents(162),
            total: Money::from_cents(1161),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let repo = InMemoryOrderRepository::new();
        let order = repo
            .create(draft(CustomerId::new(), CorrelationId::new()))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_number.as_str().starts_with("ORD-"));
        assert_eq!(repo.order_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_is_idempotent_on_correlation_id() {
        let repo = InMemoryOrderRepository::new();
        let correlation = CorrelationId::new();
        let customer = CustomerId::new();

        let first = repo.create(draft(customer, correlation)).await.unwrap();
        let second = repo.create(draft(customer, correlation)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.order_number, second.order_number);
        assert_eq!(repo.order_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_keeps_order_numbers_distinct() {
        let repo = InMemoryOrderRepository::new();
        let mut numbers = std::collections::HashSet::new();

        for _ in 0..50 {
            let order = repo
                .create(draft(CustomerId::new(), CorrelationId::new()))
                .await
                .unwrap();
            assert!(numbers.insert(order.order_number));
        }
        assert_eq!(repo.order_count().await, 50);
    }

    #[tokio::test]
    async fn test_get_by_id_and_number() {
        let repo = InMemoryOrderRepository::new();
        let order = repo
            .create(draft(CustomerId::new(), CorrelationId::new()))
            .await
            .unwrap();

        let by_id = repo.get(&order.id).await.unwrap();
        assert_eq!(by_id.id, order.id);

        let by_number = repo.get_by_number(&order.order_number).await.unwrap();
        assert_eq!(by_number.id, order.id);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = InMemoryOrderRepository::new();
        let result = repo.get(&OrderId::generate()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_status_walks_forward_and_appends_timeline() {
        let repo = InMemoryOrderRepository::new();
        let order = repo
            .create(draft(CustomerId::new(), CorrelationId::new()))
            .await
            .unwrap();

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            let updated = repo.update_status(&order.id, status).await.unwrap();
            assert_eq!(updated.status, status);
        }

        let final_order = repo.get(&order.id).await.unwrap();
        assert_eq!(final_order.timeline.len(), 6);
        assert_eq!(final_order.timeline[0].status, OrderStatus::Pending);
        assert_eq!(final_order.timeline[5].status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_update_status_rejects_illegal_transition() {
        let repo = InMemoryOrderRepository::new();
        let order = repo
            .create(draft(CustomerId::new(), CorrelationId::new()))
            .await
            .unwrap();

        let result = repo.update_status(&order.id, OrderStatus::Shipped).await;
        assert!(matches!(
            result,
            Err(RepositoryError::InvalidTransition { .. })
        ));

        // Order untouched
        let unchanged = repo.get(&order.id).await.unwrap();
        assert_eq!(unchanged.status, OrderStatus::Pending);
        assert_eq!(unchanged.timeline.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_from_pending() {
        let repo = InMemoryOrderRepository::new();
        let order = repo
            .create(draft(CustomerId::new(), CorrelationId::new()))
            .await
            .unwrap();

        let cancelled = repo
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // Terminal: nothing further
        let result = repo.update_status(&order.id, OrderStatus::Confirmed).await;
        assert!(matches!(
            result,
            Err(RepositoryError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_for_customer_newest_first() {
        let repo = InMemoryOrderRepository::new();
        let customer = CustomerId::new();

        let first = repo.create(draft(customer, CorrelationId::new())).await.unwrap();
        let second = repo.create(draft(customer, CorrelationId::new())).await.unwrap();
        repo.create(draft(CustomerId::new(), CorrelationId::new()))
            .await
            .unwrap();

        let orders = repo.list_for_customer(customer).await.unwrap();
        assert_eq!(orders.len(), 2);
        let ids: Vec<_> = orders.iter().map(|o| o.id.clone()).collect();
        assert!(ids.contains(&first.id));
        assert!(ids.contains(&second.id));
        assert!(orders[0].created_at >= orders[1].created_at);
    }
}
