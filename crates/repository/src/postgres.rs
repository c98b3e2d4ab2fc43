//! PostgreSQL-backed order repository.

use async_trait::async_trait;
use common::{CorrelationId, OrderId};
use domain::{
    CustomerId, Order, OrderDraft, OrderNumber, OrderStatus, PaymentInfo, ShippingInfo,
    TimelineEntry,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::error::{RepositoryError, Result};
use crate::store::OrderRepository;

/// PostgreSQL order repository.
///
/// The `unique_order_correlation` index backs idempotent creation; the
/// status machine is enforced in a row-locking transaction so concurrent
/// transitions cannot interleave.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let id = OrderId::parse(row.try_get::<&str, _>("id")?).map_err(|e| {
            RepositoryError::Serialization(serde_json::Error::io(std::io::Error::other(e)))
        })?;
        let status_text: String = row.try_get("status")?;
        let status: OrderStatus =
            serde_json::from_value(serde_json::Value::String(status_text))?;
        let items: Vec<domain::OrderLine> = serde_json::from_value(row.try_get("items")?)?;
        let shipping: ShippingInfo = serde_json::from_value(row.try_get("shipping")?)?;
        let payment: PaymentInfo = serde_json::from_value(row.try_get("payment")?)?;
        let timeline: Vec<TimelineEntry> = serde_json::from_value(row.try_get("timeline")?)?;

        Ok(Order {
            id,
            order_number: OrderNumber::new(row.try_get::<String, _>("order_number")?),
            correlation_id: CorrelationId::from_uuid(row.try_get::<Uuid, _>("correlation_id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            items,
            shipping,
            payment,
            subtotal: domain::Money::from_cents(row.try_get("subtotal")?),
            shipping_fee: domain::Money::from_cents(row.try_get("shipping_fee")?),
            tax: domain::Money::from_cents(row.try_get("tax")?),
            total: domain::Money::from_cents(row.try_get("total")?),
            status,
            timeline,
            created_at: row.try_get("created_at")?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, order_number, correlation_id, customer_id, items, shipping, \
     payment, subtotal, shipping_fee, tax, total, status, timeline, created_at";

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, draft: OrderDraft) -> Result<Order> {
        let order = Order::from_draft(draft);

        let insert = sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, correlation_id, customer_id, items, shipping,
                                payment, subtotal, shipping_fee, tax, total, status, timeline, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(order.id.as_str())
        .bind(order.order_number.as_str())
        .bind(order.correlation_id.as_uuid())
        .bind(order.customer_id.as_uuid())
        .bind(serde_json::to_value(&order.items)?)
        .bind(serde_json::to_value(&order.shipping)?)
        .bind(serde_json::to_value(&order.payment)?)
        .bind(order.subtotal.cents())
        .bind(order.shipping_fee.cents())
        .bind(order.tax.cents())
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(serde_json::to_value(&order.timeline)?)
        .bind(order.created_at)
        .execute(&self.pool)
        .await;

        match insert {
            Ok(_) => {
                metrics::counter!("orders_created_total").increment(1);
                Ok(order)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some("unique_order_correlation") =>
            {
                // Replay of a known checkout attempt: hand back the
                // already-persisted order.
                let row = sqlx::query(&format!(
                    "SELECT {SELECT_COLUMNS} FROM orders WHERE correlation_id = $1"
                ))
                .bind(order.correlation_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;
                let existing = Self::row_to_order(&row)?;
                tracing::info!(
                    order_id = %existing.id,
                    correlation_id = %existing.correlation_id,
                    "create replayed for known correlation id"
                );
                Ok(existing)
            }
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    async fn get(&self, id: &OrderId) -> Result<Order> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_order(&row),
            None => Err(RepositoryError::NotFound { key: id.to_string() }),
        }
    }

    async fn get_by_number(&self, number: &OrderNumber) -> Result<Order> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(number.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_order(&row),
            None => Err(RepositoryError::NotFound {
                key: number.to_string(),
            }),
        }
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let mut order = match row {
            Some(row) => Self::row_to_order(&row)?,
            None => return Err(RepositoryError::NotFound { key: id.to_string() }),
        };

        if !order.status.can_transition_to(status) {
            return Err(RepositoryError::InvalidTransition {
                order_id: id.clone(),
                from: order.status,
                to: status,
            });
        }

        order.status = status;
        order.timeline.push(TimelineEntry::now(status));

        sqlx::query("UPDATE orders SET status = $1, timeline = $2 WHERE id = $3")
            .bind(order.status.as_str())
            .bind(serde_json::to_value(&order.timeline)?)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    async fn list_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_order).collect()
    }
}
