//! Realtime notifier
//!
//! Turns committed workflow changes into bus messages. Publishing is
//! fire-and-forget: failures (including "no subscribers") are logged at warn
//! and discarded, never surfaced to the caller.

use std::sync::Arc;

use serde::Serialize;
use shared::message::{
    BusMessage, KitchenEventType, OrderStatusUpdatePayload, PriorityEscalatedPayload,
    StationAssignmentPayload, Topic,
};
use shared::models::{Order, StationId};

use super::bus::MessageBus;

#[derive(Debug, Clone)]
pub struct RealtimeNotifier {
    bus: Arc<MessageBus>,
}

impl RealtimeNotifier {
    pub fn new(bus: Arc<MessageBus>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    /// Publish one payload to one topic
    pub fn publish<T: Serialize>(&self, topic: &Topic, event_type: KitchenEventType, payload: &T) {
        let msg = match BusMessage::with_payload(topic, event_type, payload) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(topic = %topic, event = %event_type, error = %e, "Failed to encode event payload");
                return;
            }
        };
        match self.bus.publish(msg) {
            Ok(receivers) => {
                tracing::debug!(topic = %topic, event = %event_type, receivers, "Event published");
            }
            Err(e) => {
                tracing::warn!(topic = %topic, event = %event_type, error = %e, "Event not delivered");
            }
        }
    }

    /// `order-status-update` to `order-<id>`, `kitchen-<id>` and the named station
    pub fn order_status_update(&self, payload: &OrderStatusUpdatePayload) {
        let mut topics = vec![
            Topic::order(payload.order_id.clone()),
            Topic::kitchen(payload.kitchen_id.clone()),
        ];
        if let Some(station) = &payload.station {
            topics.push(Topic::station(station.clone()));
        }
        for topic in &topics {
            self.publish(topic, KitchenEventType::OrderStatusUpdate, payload);
        }
    }

    /// Publish the last transition recorded on `order`
    pub fn transition(&self, order: &Order) {
        let Some(record) = order.history.last() else {
            return;
        };
        self.order_status_update(&OrderStatusUpdatePayload {
            order_id: order.id.clone(),
            kitchen_id: order.kitchen_id.clone(),
            from: record.from,
            to: record.to,
            actor_id: record.actor_id.clone(),
            station: record.station.clone(),
            at: record.at,
        });
    }

    /// `station-assignment` to `station-<id>` and the kitchen topic
    pub fn station_assignment(&self, kitchen_id: &str, payload: &StationAssignmentPayload) {
        let station: &StationId = &payload.station;
        self.publish(
            &Topic::station(station.clone()),
            KitchenEventType::StationAssignment,
            payload,
        );
        self.publish(
            &Topic::kitchen(kitchen_id),
            KitchenEventType::StationAssignment,
            payload,
        );
    }

    /// `priority-escalated` to `order-<id>` and `kitchen-<id>`
    pub fn priority_escalated(&self, payload: &PriorityEscalatedPayload) {
        self.publish(
            &Topic::order(payload.order_id.clone()),
            KitchenEventType::PriorityEscalated,
            payload,
        );
        self.publish(
            &Topic::kitchen(payload.kitchen_id.clone()),
            KitchenEventType::PriorityEscalated,
            payload,
        );
    }
}
