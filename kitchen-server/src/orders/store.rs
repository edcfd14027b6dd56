//! Order store seam
//!
//! The workflow only needs these operations from persistence. The conditional
//! state update is mandatory: an implementation must check `expected` and
//! write in one atomic step.

use async_trait::async_trait;
use shared::models::{Order, OrderItem, OrderStatus, StationId, TransitionRecord};
use thiserror::Error;

/// Store errors seen by the workflow
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order item not found: {0}")]
    ItemNotFound(String),

    /// Conditional update lost: the persisted state is no longer `expected`
    #[error("Order state changed concurrently (current: {current})")]
    StateConflict { current: OrderStatus },

    #[error("Order is not pending (current: {current})")]
    NotPending { current: OrderStatus },

    /// Removing the item would leave the order without active items
    #[error("Order {0} has only one active item left")]
    LastItem(String),

    #[error("Duplicate order id: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Sort direction by `ordered_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Order listing filter (soft-deleted orders are never listed)
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub statuses: Option<Vec<OrderStatus>>,
    pub kitchen_id: Option<String>,
    /// Inclusive lower bound on `ordered_at`
    pub ordered_after: Option<i64>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if order.is_deleted {
            return false;
        }
        if let Some(statuses) = &self.statuses
            && !statuses.contains(&order.status)
        {
            return false;
        }
        if let Some(kitchen_id) = &self.kitchen_id
            && &order.kitchen_id != kitchen_id
        {
            return false;
        }
        if let Some(after) = self.ordered_after
            && order.ordered_at < after
        {
            return false;
        }
        true
    }
}

/// `list_orders` query
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: OrderFilter,
    pub sort: SortOrder,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Non-terminal orders, oldest first
    pub fn open_orders(kitchen_id: Option<String>) -> Self {
        Self {
            filter: OrderFilter {
                statuses: Some(OrderStatus::OPEN.to_vec()),
                kitchen_id,
                ordered_after: None,
            },
            ..Default::default()
        }
    }

    /// Orders placed since `from`, any state
    pub fn since(from: i64, kitchen_id: Option<String>) -> Self {
        Self {
            filter: OrderFilter {
                statuses: None,
                kitchen_id,
                ordered_after: Some(from),
            },
            ..Default::default()
        }
    }

    /// Sort, then page the matching orders
    pub fn apply(&self, mut orders: Vec<Order>) -> Vec<Order> {
        orders.retain(|o| self.filter.matches(o));
        orders.sort_by(|a, b| a.ordered_at.cmp(&b.ordered_at).then_with(|| a.id.cmp(&b.id)));
        if self.sort == SortOrder::Desc {
            orders.reverse();
        }
        let iter = orders.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

/// Tagged note appended to the order comments
#[derive(Debug, Clone, PartialEq)]
pub struct CommentNote {
    pub tag: String,
    pub note: String,
}

/// Fields written together with a state change
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdate {
    pub actor_id: String,
    pub at: i64,
    pub station: Option<StationId>,
    pub comment: Option<CommentNote>,
    /// New value of `Order.paused_from`
    pub paused_from: Option<OrderStatus>,
    /// `history.len()` the change was planned against; checked with the state
    pub expected_revision: Option<usize>,
}

impl OrderUpdate {
    pub fn new(actor_id: impl Into<String>, at: i64) -> Self {
        Self {
            actor_id: actor_id.into(),
            at,
            station: None,
            comment: None,
            paused_from: None,
            expected_revision: None,
        }
    }

    pub fn expecting_revision(mut self, revision: usize) -> Self {
        self.expected_revision = Some(revision);
        self
    }

    /// `true` when the persisted order is still the one the change was planned on
    pub fn matches(&self, order: &Order, expected: OrderStatus) -> bool {
        order.status == expected
            && self
                .expected_revision
                .is_none_or(|revision| revision == order.history.len())
    }

    /// Apply the change to an order already known to be in `from`
    pub fn apply(&self, order: &mut Order, from: OrderStatus, to: OrderStatus) {
        order.status = to;
        order.paused_from = self.paused_from;
        if let Some(c) = &self.comment {
            order.append_comment(&c.tag, &c.note);
        }
        order.updated_by = Some(self.actor_id.clone());
        order.updated_at = Some(self.at);
        order.history.push(TransitionRecord {
            from,
            to,
            actor_id: self.actor_id.clone(),
            station: self.station.clone(),
            at: self.at,
        });
    }
}

/// Persistent order store
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Order by id, soft-deleted included
    async fn find_order(&self, order_id: &str) -> StoreResult<Option<Order>>;

    async fn list_orders(&self, query: &ListQuery) -> StoreResult<Vec<Order>>;

    /// Conditional update: succeeds only if the persisted state equals `expected`
    /// and, when `update.expected_revision` is set, no other transition was
    /// committed since the plan was built
    async fn update_order_state(
        &self,
        order_id: &str,
        expected: OrderStatus,
        new: OrderStatus,
        update: OrderUpdate,
    ) -> StoreResult<Order>;

    /// Active items of an order
    async fn list_order_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>>;

    async fn create_order(&self, order: Order) -> StoreResult<Order>;

    /// Soft-remove one item, only while the order is pending and another
    /// active item remains
    async fn remove_item(
        &self,
        order_id: &str,
        item_id: &str,
        actor_id: &str,
        at: i64,
    ) -> StoreResult<Order>;
}
