//! WorkflowManager - kitchen workflow facade
//!
//! This module handles:
//! - Queue and order detail queries (priority, ETA, station routing attached)
//! - State transitions through the action handlers
//! - Conditional persistence through the `OrderStore`
//! - Post-commit side effects (kitchen ticket, receipt, table release)
//! - Realtime fan-out via `RealtimeNotifier`
//!
//! # Transition Flow
//!
//! ```text
//! transition(action)
//!     ├─ 1. Load order (find_order)
//!     ├─ 2. Action validates state and builds TransitionPlan
//!     │     (complete at a station: the station must be routed)
//!     ├─ 3. Conditional update (expected state + revision) in the store
//!     ├─ 4. Route items (catalog + classifier)
//!     ├─ 5. Side effects (print / release table)
//!     ├─ 6. Publish order-status-update
//!     └─ 7. Return OrderDetail
//! ```
//!
//! A side-effect error after step 3 is returned to the caller, but the
//! transition stays committed and is still published.

mod error;
pub use error::*;

use std::sync::Arc;

use parking_lot::RwLock;
use shared::message::StationAssignmentPayload;
use shared::models::{
    KitchenStats, NewOrder, Order, OrderDetail, OrderItem, OrderStatus, QueueFilter, QueueView,
    Station, StationId, StatsPeriod,
};
use shared::util::{new_id, now_millis};

use crate::core::WorkflowConfig;
use crate::kitchen;
use crate::message::{MessageBus, RealtimeNotifier};
use crate::orders::actions::{
    ActionContext, CancelAction, CompleteAction, DeliverAction, PauseAction, RefundAction,
    ResumeAction, SideEffect, StartAction, TransitionAction, WorkflowAction,
};
use crate::orders::{ListQuery, OrderStore, StoreError};
use crate::services::{
    CatalogService, KitchenTicket, LogPrinter, PrintService, ProductCatalog, TableRegistry,
    TableService,
};
use crate::stations::{ItemRouter, RoutedOrder, StationClassifier, StationRegistry};
use crate::utils::validation::{MAX_ID_LEN, validate_new_order, validate_required_text};

/// Order id placeholder for errors of queries that span many orders
const ANY_ORDER: &str = "*";

/// Kitchen workflow facade - the only mutator of order state
pub struct WorkflowManager {
    config: WorkflowConfig,
    store: Arc<dyn OrderStore>,
    router: ItemRouter,
    stations: StationRegistry,
    notifier: RealtimeNotifier,
    tables: Arc<dyn TableService>,
    printer: Arc<dyn PrintService>,
    /// 当前班次 (新订单打标)
    active_shift: RwLock<Option<String>>,
}

impl std::fmt::Debug for WorkflowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowManager")
            .field("config", &self.config)
            .field("store", &"<OrderStore>")
            .field("stations", &self.stations)
            .finish()
    }
}

impl WorkflowManager {
    /// Create a manager with an empty catalog, the in-memory table registry
    /// and the log printer
    pub fn new(config: WorkflowConfig, store: Arc<dyn OrderStore>, bus: Arc<MessageBus>) -> Self {
        let router = ItemRouter::new(
            StationClassifier::new(&config.stations),
            Arc::new(CatalogService::new()),
        );
        let stations = StationRegistry::new(&config.stations);
        Self {
            config,
            store,
            router,
            stations,
            notifier: RealtimeNotifier::new(bus),
            tables: Arc::new(TableRegistry::new()),
            printer: Arc::new(LogPrinter),
            active_shift: RwLock::new(None),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn ProductCatalog>) -> Self {
        self.router = ItemRouter::new(StationClassifier::new(&self.config.stations), catalog);
        self
    }

    pub fn with_tables(mut self, tables: Arc<dyn TableService>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_printer(mut self, printer: Arc<dyn PrintService>) -> Self {
        self.printer = printer;
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn notifier(&self) -> &RealtimeNotifier {
        &self.notifier
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        self.notifier.bus()
    }

    /// Stations in configured order
    pub fn stations(&self) -> Vec<Station> {
        self.stations.list()
    }

    /// Shift tag stamped on orders created from now on
    pub fn set_active_shift(&self, shift_id: Option<String>) {
        tracing::info!(shift_id = ?shift_id, "Active shift changed");
        *self.active_shift.write() = shift_id;
    }

    // ========== Queries ==========

    /// Live kitchen queue
    pub async fn get_queue(&self, filter: QueueFilter) -> WorkflowResult<QueueView> {
        let station = match &filter.station {
            Some(id) => Some(
                self.stations
                    .get(id)
                    .ok_or_else(|| ValidationError::UnknownStation(id.clone()))?,
            ),
            None => None,
        };

        let orders = self
            .store
            .list_orders(&ListQuery::open_orders(filter.kitchen_id.clone()))
            .await
            .map_err(|e| WorkflowError::upstream("get_queue", ANY_ORDER, e))?;
        let routed = self
            .router
            .route_all(orders)
            .await
            .map_err(|e| WorkflowError::upstream("get_queue", ANY_ORDER, e))?;

        Ok(kitchen::build_queue(
            routed,
            &filter,
            station,
            &self.config,
            now_millis(),
        ))
    }

    /// Order with priority, ETA, routing and transition history
    pub async fn get_order_detail(&self, order_id: &str) -> WorkflowResult<OrderDetail> {
        let order = self.load_order("get_order_detail", order_id).await?;
        self.detail("get_order_detail", order).await
    }

    /// Order counts over a rolling window ending now
    pub async fn get_stats(
        &self,
        period: StatsPeriod,
        kitchen_id: Option<String>,
    ) -> WorkflowResult<KitchenStats> {
        let now = now_millis();
        let (from, _) = kitchen::stats::window(period, now);
        let orders = self
            .store
            .list_orders(&ListQuery::since(from, kitchen_id.clone()))
            .await
            .map_err(|e| WorkflowError::upstream("get_stats", ANY_ORDER, e))?;
        Ok(kitchen::compute_stats(
            &orders,
            period,
            kitchen_id.as_deref(),
            now,
        ))
    }

    /// Non-terminal orders of every kitchen, oldest first
    pub async fn list_open_orders(&self) -> WorkflowResult<Vec<Order>> {
        self.store
            .list_orders(&ListQuery::open_orders(None))
            .await
            .map_err(|e| WorkflowError::upstream("list_open_orders", ANY_ORDER, e))
    }

    // ========== Intake ==========

    /// Store a new pending order
    pub async fn create_order(&self, input: NewOrder, actor_id: &str) -> WorkflowResult<OrderDetail> {
        validate_required_text(actor_id, "actor_id", MAX_ID_LEN)?;
        validate_new_order(&input)?;

        let now = now_millis();
        let items: Vec<OrderItem> = input
            .items
            .into_iter()
            .map(|i| OrderItem {
                id: new_id(),
                product_id: i.product_id,
                product_name: i.product_name,
                kind: i.kind,
                quantity: i.quantity,
                unit_price: i.unit_price,
                comment: i.comment,
                is_deleted: false,
            })
            .collect();
        let order = Order {
            id: new_id(),
            table_id: input.table_id,
            customer_id: input.customer_id,
            kitchen_id: input.kitchen_id,
            shift_id: input.shift_id.or_else(|| self.active_shift.read().clone()),
            ordered_at: now,
            status: OrderStatus::Pending,
            comments: input.comments.unwrap_or_default(),
            total: items.iter().map(OrderItem::subtotal).sum(),
            items,
            is_deleted: false,
            paused_from: None,
            updated_by: Some(actor_id.to_string()),
            updated_at: Some(now),
            history: Vec::new(),
        };

        let order_id = order.id.clone();
        let order = self
            .store
            .create_order(order)
            .await
            .map_err(|e| WorkflowError::upstream("create_order", &order_id, e))?;
        tracing::info!(
            order_id = %order.id,
            table_id = %order.table_id,
            kitchen_id = %order.kitchen_id,
            items = order.item_count(),
            "Order created"
        );

        // 入单即占桌; 失败时订单已保存
        if let Err(e) = self.tables.occupy_table(&order.table_id).await {
            tracing::error!(order_id = %order.id, table_id = %order.table_id, error = %e, "Table occupy failed");
            return Err(WorkflowError::upstream("occupy_table", &order.id, e));
        }
        self.detail("create_order", order).await
    }

    /// Soft-remove one item of a pending order
    pub async fn remove_item(
        &self,
        order_id: &str,
        item_id: &str,
        actor_id: &str,
    ) -> WorkflowResult<OrderDetail> {
        validate_required_text(actor_id, "actor_id", MAX_ID_LEN)?;

        let order = self
            .store
            .remove_item(order_id, item_id, actor_id, now_millis())
            .await
            .map_err(|e| match e {
                StoreError::NotFound(id) => WorkflowError::not_found(Resource::Order, id),
                StoreError::ItemNotFound(id) => WorkflowError::not_found(Resource::OrderItem, id),
                StoreError::LastItem(id) => ValidationError::OrderEmpty { order_id: id }.into(),
                StoreError::NotPending { current } => ValidationError::Malformed(format!(
                    "items can only be removed while the order is pending (order {order_id} is {current})"
                ))
                .into(),
                other => WorkflowError::upstream("remove_item", order_id, other),
            })?;
        tracing::info!(order_id = %order_id, item_id = %item_id, actor_id = %actor_id, "Order item removed");
        self.detail("remove_item", order).await
    }

    // ========== Transitions ==========

    /// pending -> in_progress
    pub async fn start(&self, order_id: &str, staff_id: &str) -> WorkflowResult<OrderDetail> {
        self.transition(WorkflowAction::Start(StartAction {
            order_id: order_id.to_string(),
            staff_id: staff_id.to_string(),
        }))
        .await
    }

    /// in_progress -> ready
    pub async fn complete(
        &self,
        order_id: &str,
        staff_id: &str,
        notes: Option<String>,
        station: Option<StationId>,
    ) -> WorkflowResult<OrderDetail> {
        self.transition(WorkflowAction::Complete(CompleteAction {
            order_id: order_id.to_string(),
            staff_id: staff_id.to_string(),
            notes,
            station,
        }))
        .await
    }

    /// pending | in_progress -> paused
    pub async fn pause(
        &self,
        order_id: &str,
        comment: Option<String>,
        staff_id: &str,
    ) -> WorkflowResult<OrderDetail> {
        self.transition(WorkflowAction::Pause(PauseAction {
            order_id: order_id.to_string(),
            staff_id: staff_id.to_string(),
            comment,
        }))
        .await
    }

    /// paused -> paused-from state
    pub async fn resume(&self, order_id: &str, staff_id: &str) -> WorkflowResult<OrderDetail> {
        self.transition(WorkflowAction::Resume(ResumeAction {
            order_id: order_id.to_string(),
            staff_id: staff_id.to_string(),
        }))
        .await
    }

    /// pending | in_progress -> cancelled
    pub async fn cancel(&self, order_id: &str, staff_id: &str) -> WorkflowResult<OrderDetail> {
        self.transition(WorkflowAction::Cancel(CancelAction {
            order_id: order_id.to_string(),
            staff_id: staff_id.to_string(),
        }))
        .await
    }

    /// ready -> delivered
    pub async fn deliver(&self, order_id: &str, staff_id: &str) -> WorkflowResult<OrderDetail> {
        self.transition(WorkflowAction::Deliver(DeliverAction {
            order_id: order_id.to_string(),
            staff_id: staff_id.to_string(),
        }))
        .await
    }

    /// delivered -> refunded (inside the refund window)
    pub async fn refund(&self, order_id: &str, staff_id: &str) -> WorkflowResult<OrderDetail> {
        self.transition(WorkflowAction::Refund(RefundAction {
            order_id: order_id.to_string(),
            staff_id: staff_id.to_string(),
        }))
        .await
    }

    /// Execute one transition action
    pub async fn transition(&self, action: WorkflowAction) -> WorkflowResult<OrderDetail> {
        let operation = action.kind().name();
        let order_id = action.order_id().to_string();
        validate_required_text(action.actor_id(), "actor_id", MAX_ID_LEN)?;

        // 1. Load
        let order = self.load_order(operation, &order_id).await?;

        // 2. Validate
        let now = now_millis();
        let ctx = ActionContext {
            config: &self.config,
            now,
        };
        let plan = action.plan(&order, &ctx)?;
        if let WorkflowAction::Complete(CompleteAction {
            station: Some(station),
            ..
        }) = &action
        {
            self.ensure_routed(operation, &order, station).await?;
        }

        // 3. Conditional update
        let updated = self
            .store
            .update_order_state(&order_id, plan.from, plan.to, plan.update.clone())
            .await
            .map_err(|e| WorkflowError::from_store(operation, &order_id, plan.to, e))?;
        tracing::info!(
            order_id = %order_id,
            from = %plan.from,
            to = %plan.to,
            actor_id = %plan.update.actor_id,
            "Order transition committed"
        );

        // 4. Route
        let detail = self
            .router
            .route(updated.clone())
            .await
            .map(|routed| kitchen::order_detail(routed, &self.config, now));

        // 5. Side effects
        let mut failure: Option<WorkflowError> = None;
        for effect in &plan.side_effects {
            match effect {
                SideEffect::KitchenTicket => match &detail {
                    Ok(detail) => {
                        let ticket = KitchenTicket::from_detail(detail);
                        if let Err(e) = self.printer.print_kitchen_ticket(&ticket).await {
                            tracing::warn!(order_id = %order_id, error = %e, "Kitchen ticket print failed");
                        }
                    }
                    Err(_) => {
                        tracing::warn!(order_id = %order_id, "Kitchen ticket skipped, items could not be routed");
                    }
                },
                SideEffect::PrintReceipt => {
                    if let Err(e) = self.printer.print_receipt(&updated).await {
                        tracing::warn!(order_id = %order_id, error = %e, "Receipt print failed");
                    }
                }
                SideEffect::ReleaseTable => {
                    if let Err(e) = self.tables.release_table(&updated.table_id).await {
                        tracing::error!(order_id = %order_id, table_id = %updated.table_id, error = %e, "Table release failed");
                        failure.get_or_insert(WorkflowError::upstream(
                            "release_table",
                            &order_id,
                            e,
                        ));
                    }
                }
            }
        }

        // 6. Publish
        self.notifier.transition(&updated);

        // 7. Respond
        if let Some(e) = failure {
            return Err(e);
        }
        detail.map_err(|e| WorkflowError::upstream(operation, &order_id, e))
    }

    // ========== Stations ==========

    /// Assign (or clear with `None`) the staff member working a station
    pub fn assign_station(
        &self,
        station_id: &StationId,
        staff_id: Option<String>,
        actor_id: &str,
    ) -> WorkflowResult<Station> {
        validate_required_text(actor_id, "actor_id", MAX_ID_LEN)?;
        if let Some(staff) = &staff_id {
            validate_required_text(staff, "staff_id", MAX_ID_LEN)?;
        }

        let station = self
            .stations
            .assign_staff(station_id, staff_id.clone())
            .ok_or_else(|| ValidationError::UnknownStation(station_id.clone()))?;
        tracing::info!(station = %station_id, staff_id = ?staff_id, actor_id = %actor_id, "Station assignment changed");

        self.notifier.station_assignment(
            &self.config.default_kitchen_id,
            &StationAssignmentPayload {
                station: station_id.clone(),
                staff_id,
                actor_id: actor_id.to_string(),
                at: now_millis(),
            },
        );
        Ok(station)
    }

    // ========== Internal ==========

    async fn load_order(&self, operation: &'static str, order_id: &str) -> WorkflowResult<Order> {
        match self.store.find_order(order_id).await {
            Ok(Some(order)) if !order.is_deleted => Ok(order),
            Ok(_) => Err(WorkflowError::not_found(Resource::Order, order_id)),
            Err(e) => Err(WorkflowError::upstream(operation, order_id, e)),
        }
    }

    /// The station must receive at least one active item of the order
    async fn ensure_routed(
        &self,
        operation: &'static str,
        order: &Order,
        station: &StationId,
    ) -> WorkflowResult<()> {
        let routed = self
            .router
            .route(order.clone())
            .await
            .map_err(|e| WorkflowError::upstream(operation, &order.id, e))?;
        if !routed.routes_to(station) {
            return Err(ValidationError::StationNotRouted {
                order_id: order.id.clone(),
                station: station.clone(),
            }
            .into());
        }
        Ok(())
    }

    async fn detail(&self, operation: &'static str, order: Order) -> WorkflowResult<OrderDetail> {
        let order_id = order.id.clone();
        let routed: RoutedOrder = self
            .router
            .route(order)
            .await
            .map_err(|e| WorkflowError::upstream(operation, &order_id, e))?;
        Ok(kitchen::order_detail(routed, &self.config, now_millis()))
    }
}

#[cfg(test)]
mod tests;
