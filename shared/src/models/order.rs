//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::station::StationId;

/// Order preparation state
///
/// ```text
/// pending ──▶ in_progress ──▶ ready ──▶ delivered ──▶ refunded
///    │  ▲         │  ▲
///    ▼  │         ▼  │
///    paused ◀─────┘  │   (resume returns to the paused-from state)
///    │               │
///    └──▶ cancelled ◀┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Paused,
    Ready,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Terminal for the kitchen workflow (excluded from queues).
    ///
    /// `Delivered` still admits `refund`, which is driven by the sales side.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    /// Open orders are the ones a kitchen display still shows
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// All states a kitchen display can see
    pub const OPEN: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Paused,
        OrderStatus::Ready,
    ];
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "paused" => Ok(Self::Paused),
            "ready" => Ok(Self::Ready),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            _ => Err(format!("Invalid order status: {s}")),
        }
    }
}

/// Product kind of an order item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Dish,
    Beverage,
}

/// Order item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    /// Product reference (catalog key)
    pub product_id: String,
    /// Product name at the time the order was taken
    pub product_name: String,
    #[serde(default)]
    pub kind: ProductKind,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl OrderItem {
    /// quantity × unit price
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// One committed state change (audit trail)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Originating actor (staff member / terminal)
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<StationId>,
    pub at: i64,
}

/// Order record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub table_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub kitchen_id: String,
    /// Turn/shift tag stamped at creation (reporting only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
    /// Epoch millis (UTC)
    pub ordered_at: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub comments: String,
    pub total: f64,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub is_deleted: bool,
    /// State the order was in when it was paused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_from: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub history: Vec<TransitionRecord>,
}

impl Order {
    /// Items that have not been soft-removed
    pub fn active_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|i| !i.is_deleted)
    }

    /// Number of active item lines
    pub fn item_count(&self) -> usize {
        self.active_items().count()
    }

    /// Append a tagged note, keeping every earlier comment
    pub fn append_comment(&mut self, tag: &str, note: &str) {
        let note = note.trim();
        if note.is_empty() {
            return;
        }
        if !self.comments.is_empty() {
            self.comments.push('\n');
        }
        self.comments.push_str(&format!("[{}] {}", tag, note));
    }
}

/// Item input for order intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub kind: ProductKind,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Order intake payload (produced by the external "create order" flow)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub table_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub kitchen_id: String,
    #[serde(default)]
    pub shift_id: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    pub items: Vec<NewOrderItem>,
}
