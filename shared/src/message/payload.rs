use serde::{Deserialize, Serialize};

use crate::models::{OrderStatus, Priority, StationId};

/// `order-status-update` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdatePayload {
    pub order_id: String,
    pub kitchen_id: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<StationId>,
    pub at: i64,
}

/// `station-assignment` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAssignmentPayload {
    pub station: StationId,
    /// None = station released
    pub staff_id: Option<String>,
    pub actor_id: String,
    pub at: i64,
}

/// `priority-escalated` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityEscalatedPayload {
    pub order_id: String,
    pub kitchen_id: String,
    /// Last announced tier (None on first sighting)
    pub from: Option<Priority>,
    pub to: Priority,
    pub minutes_elapsed: i64,
    pub at: i64,
}
