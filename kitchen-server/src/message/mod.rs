//! 实时消息: 广播总线与工作流事件发布

pub mod bus;
pub mod notifier;

pub use bus::{MessageBus, PublishError, TopicSubscriber};
pub use notifier::RealtimeNotifier;

// Re-export shared message types
pub use shared::message::{BusMessage, KitchenEventType, Topic};
