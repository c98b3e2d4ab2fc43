//! Order status machine.

use serde::{Deserialize, Serialize};

/// The status of an order after creation.
///
/// Legal transitions:
/// ```text
/// Pending ──► Confirmed ──► Processing ──► Shipped ──► OutForDelivery ──► Delivered
///    │            │
///    └────────────┴──► Cancelled
/// ```
///
/// Forward movement follows the sequence exactly, no skipping; `Cancelled`
/// is reachable only from `Pending` or `Confirmed` (a shipped order goes
/// through a return flow instead, out of scope here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, payment not yet confirmed.
    #[default]
    Pending,

    /// Payment confirmed.
    Confirmed,

    /// Vendor is preparing the order.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// On the last leg to the customer.
    OutForDelivery,

    /// Delivered (terminal state).
    Delivered,

    /// Cancelled before fulfilment started (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns the next status in the forward sequence, if any.
    pub fn next_in_sequence(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Returns true if the order can be cancelled from this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns true if `next` is a legal transition from this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if next == OrderStatus::Cancelled {
            return self.can_cancel();
        }
        self.next_in_sequence() == Some(next)
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a wire name into a status.
    pub fn parse(s: &str) -> Option<OrderStatus> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "out_for_delivery" => Some(OrderStatus::OutForDelivery),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
