//! Order record and related types.
//!
//! An order is a repository-owned record: created once, never deleted, and
//! mutated only by status transitions (which append to its timeline).

mod status;

pub use status::OrderStatus;

use chrono::{DateTime, Utc};
use common::{CorrelationId, OrderId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::CartLine;
use crate::identity::CustomerId;
use crate::money::Money;
use crate::product::ProductId;
use crate::shipping::ShippingInfo;

/// Human-facing order number, distinct from the internal id.
///
/// Generated once at creation and immutable. The `ORD-` prefix keeps it
/// visually distinct from ids, and it never matches the 24-hex id shape
/// used by tracking lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generates a new order number from UUID v4 entropy.
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        // 10 hex chars: unique enough for a storefront, short enough to
        // read over the phone.
        Self(format!("ORD-{}", simple[..10].to_ascii_uppercase()))
    }

    /// Wraps an existing order number string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the order number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Upi,
    Netbanking,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Returns the wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Netbanking => "netbanking",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment details captured on the order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
}

/// One purchased line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this line.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

impl From<CartLine> for OrderLine {
    fn from(line: CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// One status change on an order's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
}

impl TimelineEntry {
    /// Records a status at the current instant.
    pub fn now(status: OrderStatus) -> Self {
        Self {
            status,
            at: Utc::now(),
        }
    }
}

/// Input for creating an order; id, number, status, and timeline are
/// assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub correlation_id: CorrelationId,
    pub customer_id: CustomerId,
    pub items: Vec<OrderLine>,
    pub shipping: ShippingInfo,
    pub payment: PaymentInfo,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub tax: Money,
    pub total: Money,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub correlation_id: CorrelationId,
    pub customer_id: CustomerId,
    pub items: Vec<OrderLine>,
    pub shipping: ShippingInfo,
    pub payment: PaymentInfo,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub tax: Money,
    pub total: Money,
    pub status: OrderStatus,
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Materializes a draft into a new `Pending` order.
    pub fn from_draft(draft: OrderDraft) -> Self {
        let created_at = Utc::now();
        Self {
            id: OrderId::generate(),
            order_number: OrderNumber::generate(),
            correlation_id: draft.correlation_id,
            customer_id: draft.customer_id,
            items: draft.items,
            shipping: draft.shipping,
            payment: draft.payment,
            subtotal: draft.subtotal,
            shipping_fee: draft.shipping_fee,
            tax: draft.tax,
            total: draft.total,
            status: OrderStatus::Pending,
            timeline: vec![TimelineEntry {
                status: OrderStatus::Pending,
                at: created_at,
            }],
            created_at,
        }
    }

    /// Returns the total quantity across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> OrderDraft {
        OrderDraft {
            correlation_id: CorrelationId::new(),
            customer_id: CustomerId::new(),
            items: vec![OrderLine::new("SKU-001", "Clay Mug", 2, Money::from_cents(450))],
            shipping: ShippingInfo {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
                address: "14 Lakeview Road".to_string(),
                city: "Bengaluru".to_string(),
                state: "KA".to_string(),
                zip: "560001".to_string(),
                country: "IN".to_string(),
            },
            payment: PaymentInfo {
                method: PaymentMethod::Card,
            },
            subtotal: Money::from_cents(900),
            shipping_fee: Money::from_cents(99),
            tax: Money::from_cents(162),
            total: Money::from_cents(1161),
        }
    }

    #[test]
    fn test_order_number_shape() {
        let number = OrderNumber::generate();
        assert!(number.as_str().starts_with("ORD-"));
        assert_eq!(number.as_str().len(), 14);
        // Never collides with the 24-hex internal id shape
        assert!(!common::OrderId::matches_shape(number.as_str()));
    }

    #[test]
    fn test_order_numbers_are_unique() {
        let a = OrderNumber::generate();
        let b = OrderNumber::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_draft_starts_pending_with_seeded_timeline() {
        let order = Order::from_draft(draft());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.timeline.len(), 1);
        assert_eq!(order.timeline[0].status, OrderStatus::Pending);
        assert_eq!(order.timeline[0].at, order.created_at);
    }

    #[test]
    fn test_from_draft_copies_totals() {
        let d = draft();
        let order = Order::from_draft(d.clone());
        assert_eq!(order.subtotal, d.subtotal);
        assert_eq!(order.shipping_fee, d.shipping_fee);
        assert_eq!(order.tax, d.tax);
        assert_eq!(order.total, d.total);
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn test_order_line_from_cart_line() {
        use crate::cart::Cart;
        use crate::product::Product;

        let mut cart = Cart::new();
        let product =
            Product::new("SKU-001", "Clay Mug", Money::from_cents(450), "Mud&Fire", "kitchen");
        cart.add_item(&product, 3).unwrap();

        let line: OrderLine = cart.snapshot().lines.remove(0).into();
        assert_eq!(line.product_id.as_str(), "SKU-001");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total().cents(), 1350);
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = Order::from_draft(draft());
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
