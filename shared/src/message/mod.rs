//! 消息总线消息类型定义
//!
//! 这些类型在 kitchen-server 和厨房显示端之间共享。
//! Every message is addressed to one topic; subscribers filter by topic.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

use crate::models::StationId;

pub mod payload;
pub use payload::*;

/// Realtime event types published to display topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KitchenEventType {
    /// Order changed state
    OrderStatusUpdate,
    /// Staff assigned to (or released from) a station
    StationAssignment,
    /// Order crossed into a higher priority tier
    PriorityEscalated,
}

impl fmt::Display for KitchenEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KitchenEventType::OrderStatusUpdate => write!(f, "order-status-update"),
            KitchenEventType::StationAssignment => write!(f, "station-assignment"),
            KitchenEventType::PriorityEscalated => write!(f, "priority-escalated"),
        }
    }
}

/// Broadcast topic
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// `order-<id>`
    Order(String),
    /// `kitchen-<id>`
    Kitchen(String),
    /// `station-<id>`
    Station(StationId),
}

impl Topic {
    pub fn order(id: impl Into<String>) -> Self {
        Self::Order(id.into())
    }

    pub fn kitchen(id: impl Into<String>) -> Self {
        Self::Kitchen(id.into())
    }

    pub fn station(id: impl Into<StationId>) -> Self {
        Self::Station(id.into())
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Order(id) => write!(f, "order-{}", id),
            Topic::Kitchen(id) => write!(f, "kitchen-{}", id),
            Topic::Station(id) => write!(f, "station-{}", id),
        }
    }
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub topic: String,
    pub event_type: KitchenEventType,
    /// JSON-encoded payload
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(topic: &Topic, event_type: KitchenEventType, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            topic: topic.to_string(),
            event_type,
            payload,
        }
    }

    /// Serialize a typed payload into a message for `topic`
    pub fn with_payload<T: Serialize>(
        topic: &Topic,
        event_type: KitchenEventType,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(topic, event_type, serde_json::to_vec(payload)?))
    }

    /// Decode the payload
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    pub fn is_for(&self, topic: &Topic) -> bool {
        self.topic == topic.to_string()
    }
}
