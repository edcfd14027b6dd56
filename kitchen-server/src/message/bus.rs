//! 消息总线核心实现
//!
//! # 架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     MessageBus                           │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │  broadcast::Sender<BusMessage>                    │  │
//! │  └───────────────────────────────────────────────────┘  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//!          ┌───────────────┼────────────────┐
//!          ▼               ▼                ▼
//!   TopicSubscriber  TopicSubscriber   subscribe()
//!   (order-42)       (kitchen-main)    (全部消息)
//! ```
//!
//! 发布是同步且非阻塞的; 没有订阅者时返回错误, 由调用方记录后丢弃。
//! 慢订阅者会丢失旧消息 (at-most-once)。

use shared::message::{BusMessage, Topic};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

/// Default capacity of the broadcast channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("No subscribers for topic {0}")]
    NoSubscribers(String),
}

/// 消息总线 - 负责把事件广播给订阅者
#[derive(Debug, Clone)]
pub struct MessageBus {
    /// 服务器到订阅者的广播通道
    server_tx: broadcast::Sender<BusMessage>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    /// 创建默认容量的消息总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (server_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            server_tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 发布消息 (服务器 -> 所有订阅者)
    ///
    /// Returns the number of receivers that got the message.
    pub fn publish(&self, msg: BusMessage) -> Result<usize, PublishError> {
        let topic = msg.topic.clone();
        self.server_tx
            .send(msg)
            .map_err(|_| PublishError::NoSubscribers(topic))
    }

    /// 订阅全部广播
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.server_tx.subscribe()
    }

    /// 订阅单个 topic
    pub fn subscribe_topic(&self, topic: &Topic) -> TopicSubscriber {
        TopicSubscriber {
            topic: topic.to_string(),
            rx: self.server_tx.subscribe(),
            shutdown: self.shutdown_token.clone(),
        }
    }

    /// Current number of receivers
    pub fn subscriber_count(&self) -> usize {
        self.server_tx.receiver_count()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭消息总线, 所有 TopicSubscriber 的 recv 返回 None
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

/// Receiver that only yields messages of one topic
#[derive(Debug)]
pub struct TopicSubscriber {
    topic: String,
    rx: broadcast::Receiver<BusMessage>,
    shutdown: CancellationToken,
}

impl TopicSubscriber {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next message for this topic; `None` once the bus is closed or shut down
    pub async fn recv(&mut self) -> Option<BusMessage> {
        loop {
            let result = tokio::select! {
                _ = self.shutdown.cancelled() => return None,
                r = self.rx.recv() => r,
            };
            match result {
                Ok(msg) if msg.topic == self.topic => return Some(msg),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %self.topic, skipped, "Subscriber lagged, messages dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of `recv`
    pub fn try_recv(&mut self) -> Option<BusMessage> {
        loop {
            match self.rx.try_recv() {
                Ok(msg) if msg.topic == self.topic => return Some(msg),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %self.topic, skipped, "Subscriber lagged, messages dropped");
                }
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::KitchenEventType;

    fn msg(topic: &Topic) -> BusMessage {
        BusMessage::new(topic, KitchenEventType::OrderStatusUpdate, b"{}".to_vec())
    }

    #[test]
    fn test_publish_without_subscribers_fails() {
        let bus = MessageBus::new();
        let err = bus.publish(msg(&Topic::order("1"))).unwrap_err();
        assert!(matches!(err, PublishError::NoSubscribers(t) if t == "order-1"));
    }

    #[tokio::test]
    async fn test_topic_subscriber_filters() {
        let bus = MessageBus::new();
        let mut kitchen = bus.subscribe_topic(&Topic::kitchen("main"));

        bus.publish(msg(&Topic::order("1"))).unwrap();
        bus.publish(msg(&Topic::kitchen("main"))).unwrap();

        let received = kitchen.recv().await.unwrap();
        assert_eq!(received.topic, "kitchen-main");
        assert!(kitchen.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_subscriber_ends_on_shutdown() {
        let bus = MessageBus::new();
        let mut sub = bus.subscribe_topic(&Topic::order("1"));
        bus.shutdown();
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber_keeps_newest() {
        let bus = MessageBus::with_capacity(2);
        let mut sub = bus.subscribe_topic(&Topic::order("1"));
        for _ in 0..5 {
            bus.publish(msg(&Topic::order("1"))).unwrap();
        }
        // oldest messages are gone, the rest is still delivered
        assert!(sub.recv().await.is_some());
    }
}
