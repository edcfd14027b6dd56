//! Data models
//!
//! Plain records shared by the orchestrator and kitchen display clients.

pub mod kitchen;
pub mod order;
pub mod station;

pub use kitchen::{
    ItemRoute, KitchenStats, OrderDetail, Priority, QueueEntry, QueueFilter, QueueView,
    StationLoad, StatsPeriod,
};
pub use order::{
    NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, ProductKind, TransitionRecord,
};
pub use station::{Station, StationId};
