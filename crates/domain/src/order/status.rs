//! Order status lifecycle.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Confirmed ──► InProgress ──► Shipped ──► Delivered
///     │             │
///     └─────────────┴──► Cancelled
/// ```
///
/// Cancellation is only legal before the order leaves the warehouse;
/// `Shipped` and `Delivered` orders stay where they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order accepted, not yet picked (initial status).
    #[default]
    Confirmed,

    /// Order is being picked and packed.
    InProgress,

    /// Order has left the warehouse.
    Shipped,

    /// Order reached the customer (terminal status).
    Delivered,

    /// Order was cancelled (terminal status).
    Cancelled,
}

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Confirmed,
        OrderStatus::InProgress,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Maps a wire name to a status.
    ///
    /// Total over the five fixed names (exact case); anything else is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "IN_PROGRESS" => Some(OrderStatus::InProgress),
            "SHIPPED" => Some(OrderStatus::Shipped),
            "DELIVERED" => Some(OrderStatus::Delivered),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if the order can be cancelled from this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::InProgress)
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
