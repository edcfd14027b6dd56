//! Kitchen display records: priority tiers, queue views, order detail, stats

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::order::{Order, OrderStatus};
use super::station::{Station, StationId};
use crate::util::DAY_MILLIS;

/// Urgency tier derived from order age (display only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        };
        f.write_str(s)
    }
}

/// Queue query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueFilter {
    #[serde(default)]
    pub station: Option<StationId>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub kitchen_id: Option<String>,
}

impl QueueFilter {
    pub fn station(station: impl Into<StationId>) -> Self {
        Self {
            station: Some(station.into()),
            ..Default::default()
        }
    }
}

/// Station routing of one order item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRoute {
    pub item_id: String,
    pub product_name: String,
    pub quantity: u32,
    /// Every matching station (empty = unrouted)
    pub stations: BTreeSet<StationId>,
    /// First match in configured station order
    pub primary: Option<StationId>,
}

/// One order as shown on a kitchen display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub order_id: String,
    pub table_id: String,
    pub kitchen_id: String,
    pub status: OrderStatus,
    pub ordered_at: i64,
    pub minutes_elapsed: i64,
    pub priority: Priority,
    pub eta: i64,
    pub comments: String,
    pub items: Vec<ItemRoute>,
    /// Union of item stations
    pub stations: BTreeSet<StationId>,
}

impl QueueEntry {
    /// True when no item routes to any station
    pub fn is_unrouted(&self) -> bool {
        self.stations.is_empty()
    }
}

/// Station header of a station-filtered queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLoad {
    pub station: Station,
    /// pending + in_progress orders routed here
    pub load: usize,
    pub over_capacity: bool,
}

/// Live kitchen queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<StationLoad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitchen_id: Option<String>,
    pub pending: Vec<QueueEntry>,
    pub in_progress: Vec<QueueEntry>,
    pub ready: Vec<QueueEntry>,
    pub paused: Vec<QueueEntry>,
    /// pending count × per-order wait constant
    pub estimated_wait_minutes: u32,
    pub generated_at: i64,
}

impl QueueView {
    /// Every entry across buckets
    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.pending
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.ready.iter())
            .chain(self.paused.iter())
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.entries().any(|e| e.order_id == order_id)
    }
}

/// Order plus computed fields, returned by detail queries and every transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub priority: Priority,
    pub eta: i64,
    pub minutes_elapsed: i64,
    pub items: Vec<ItemRoute>,
    pub stations: BTreeSet<StationId>,
}

/// Rolling statistics window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl StatsPeriod {
    /// Window length in milliseconds
    pub fn window_millis(&self) -> i64 {
        match self {
            Self::Day => DAY_MILLIS,
            Self::Week => 7 * DAY_MILLIS,
            Self::Month => 30 * DAY_MILLIS,
        }
    }
}

impl std::str::FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(format!("Invalid stats period: {s}")),
        }
    }
}

/// Order counts over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenStats {
    pub period: StatsPeriod,
    pub from: i64,
    pub to: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kitchen_id: Option<String>,
    pub total: usize,
    /// ready + delivered
    pub completed: usize,
    /// pending + in_progress + paused
    pub pending: usize,
    pub cancelled: usize,
    pub refunded: usize,
    /// completed / total × 100
    pub completion_rate: f64,
}
