//! Kitchen queue aggregator
//!
//! Builds the live queue from routed open orders. Buckets are FIFO by
//! `ordered_at`; priority is attached for display and never reorders.

use shared::models::{
    OrderDetail, OrderStatus, QueueEntry, QueueFilter, QueueView, Station, StationLoad,
};

use crate::core::WorkflowConfig;
use crate::stations::RoutedOrder;
use crate::workflow::priority;

/// Queue entry for a routed order
pub fn queue_entry(routed: &RoutedOrder, config: &WorkflowConfig, now: i64) -> QueueEntry {
    let order = &routed.order;
    QueueEntry {
        order_id: order.id.clone(),
        table_id: order.table_id.clone(),
        kitchen_id: order.kitchen_id.clone(),
        status: order.status,
        ordered_at: order.ordered_at,
        minutes_elapsed: priority::minutes_elapsed(order, now),
        priority: priority::priority(order, now),
        eta: priority::eta(order, config.base_prep_minutes),
        comments: order.comments.clone(),
        items: routed.items.clone(),
        stations: routed.stations.clone(),
    }
}

/// Order detail with computed fields
pub fn order_detail(routed: RoutedOrder, config: &WorkflowConfig, now: i64) -> OrderDetail {
    let RoutedOrder {
        order,
        items,
        stations,
    } = routed;
    OrderDetail {
        priority: priority::priority(&order, now),
        eta: priority::eta(&order, config.base_prep_minutes),
        minutes_elapsed: priority::minutes_elapsed(&order, now),
        items,
        stations,
        order,
    }
}

/// Whether a routed order passes the queue filter
pub fn matches_filter(routed: &RoutedOrder, filter: &QueueFilter) -> bool {
    let order = &routed.order;
    if order.is_deleted || order.status.is_terminal() {
        return false;
    }
    if let Some(status) = filter.status
        && order.status != status
    {
        return false;
    }
    if let Some(kitchen_id) = &filter.kitchen_id
        && &order.kitchen_id != kitchen_id
    {
        return false;
    }
    if let Some(station) = &filter.station
        && !routed.routes_to(station)
    {
        return false;
    }
    true
}

/// Assemble the queue view
///
/// `station` is the resolved station of `filter.station`; the caller rejects
/// unknown stations before building.
pub fn build_queue(
    orders: Vec<RoutedOrder>,
    filter: &QueueFilter,
    station: Option<Station>,
    config: &WorkflowConfig,
    now: i64,
) -> QueueView {
    let mut selected: Vec<RoutedOrder> = orders
        .into_iter()
        .filter(|o| matches_filter(o, filter))
        .collect();
    selected.sort_by(|a, b| {
        a.order
            .ordered_at
            .cmp(&b.order.ordered_at)
            .then_with(|| a.order.id.cmp(&b.order.id))
    });

    let mut view = QueueView {
        station: None,
        kitchen_id: filter.kitchen_id.clone(),
        pending: Vec::new(),
        in_progress: Vec::new(),
        ready: Vec::new(),
        paused: Vec::new(),
        estimated_wait_minutes: 0,
        generated_at: now,
    };

    for routed in &selected {
        let entry = queue_entry(routed, config, now);
        match entry.status {
            OrderStatus::Pending => view.pending.push(entry),
            OrderStatus::InProgress => view.in_progress.push(entry),
            OrderStatus::Ready => view.ready.push(entry),
            OrderStatus::Paused => view.paused.push(entry),
            // excluded by matches_filter
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Refunded => {}
        }
    }

    let pending = u32::try_from(view.pending.len()).unwrap_or(u32::MAX);
    view.estimated_wait_minutes = pending.saturating_mul(config.wait_per_order_minutes);

    view.station = station.map(|station| {
        let load = view.pending.len() + view.in_progress.len();
        StationLoad {
            over_capacity: load > station.capacity as usize,
            station,
            load,
        }
    });

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ItemRoute, Order, StationId};
    use shared::util::MINUTE_MILLIS;
    use std::collections::BTreeSet;

    fn routed(id: &str, status: OrderStatus, ordered_at: i64, stations: &[&str]) -> RoutedOrder {
        let stations: BTreeSet<StationId> = stations.iter().map(|s| StationId::from(*s)).collect();
        RoutedOrder {
            order: Order {
                id: id.to_string(),
                table_id: "t-1".to_string(),
                customer_id: None,
                kitchen_id: "main".to_string(),
                shift_id: None,
                ordered_at,
                status,
                comments: String::new(),
                total: 0.0,
                items: vec![],
                is_deleted: false,
                paused_from: None,
                updated_by: None,
                updated_at: None,
                history: vec![],
            },
            items: vec![ItemRoute {
                item_id: format!("{id}-item"),
                product_name: "x".to_string(),
                quantity: 1,
                primary: stations.iter().next().cloned(),
                stations: stations.clone(),
            }],
            stations,
        }
    }

    fn grill() -> Station {
        Station {
            id: StationId::from("grill"),
            name: "Parrilla".to_string(),
            assigned_staff: None,
            capacity: 2,
        }
    }

    #[test]
    fn test_buckets_are_fifo() {
        let config = WorkflowConfig::default();
        let orders = vec![
            routed("late", OrderStatus::Pending, 300, &["grill"]),
            routed("early", OrderStatus::Pending, 100, &["grill"]),
            routed("mid", OrderStatus::InProgress, 200, &["salad"]),
            routed("p", OrderStatus::Paused, 50, &[]),
            routed("r", OrderStatus::Ready, 10, &["grill"]),
        ];
        // the oldest order is urgent but still queued by age only
        let view = build_queue(orders, &QueueFilter::default(), None, &config, 40 * MINUTE_MILLIS);

        let pending: Vec<&str> = view.pending.iter().map(|e| e.order_id.as_str()).collect();
        assert_eq!(pending, vec!["early", "late"]);
        assert_eq!(view.in_progress.len(), 1);
        assert_eq!(view.ready.len(), 1);
        assert_eq!(view.paused.len(), 1);
        assert_eq!(view.estimated_wait_minutes, 30);
        assert!(view.station.is_none());
    }

    #[test]
    fn test_station_filter_membership() {
        let config = WorkflowConfig::default();
        let orders = vec![
            routed("combo", OrderStatus::Pending, 1, &["grill", "beverage"]),
            routed("salad", OrderStatus::Pending, 2, &["salad"]),
            routed("unrouted", OrderStatus::Pending, 3, &[]),
        ];

        let view = build_queue(
            orders.clone(),
            &QueueFilter::station("grill"),
            Some(grill()),
            &config,
            0,
        );
        assert!(view.contains("combo"));
        assert!(!view.contains("salad"));
        assert!(!view.contains("unrouted"));

        let view = build_queue(orders.clone(), &QueueFilter::station("beverage"), None, &config, 0);
        assert!(view.contains("combo"));

        // unrouted orders only show in the all-stations view
        let view = build_queue(orders, &QueueFilter::default(), None, &config, 0);
        assert!(view.contains("unrouted"));
    }

    #[test]
    fn test_station_load_and_capacity() {
        let config = WorkflowConfig::default();
        let orders = vec![
            routed("a", OrderStatus::Pending, 1, &["grill"]),
            routed("b", OrderStatus::InProgress, 2, &["grill"]),
            routed("c", OrderStatus::InProgress, 3, &["grill"]),
            routed("d", OrderStatus::Ready, 4, &["grill"]),
        ];
        let view = build_queue(orders, &QueueFilter::station("grill"), Some(grill()), &config, 0);

        let load = view.station.unwrap();
        assert_eq!(load.load, 3);
        assert!(load.over_capacity);
        assert_eq!(view.estimated_wait_minutes, 15);
    }

    #[test]
    fn test_terminal_and_deleted_excluded() {
        let config = WorkflowConfig::default();
        let mut deleted = routed("deleted", OrderStatus::Pending, 1, &["grill"]);
        deleted.order.is_deleted = true;
        let orders = vec![
            deleted,
            routed("done", OrderStatus::Delivered, 2, &["grill"]),
            routed("gone", OrderStatus::Cancelled, 3, &["grill"]),
        ];
        let view = build_queue(orders, &QueueFilter::default(), None, &config, 0);
        assert_eq!(view.entries().count(), 0);
        assert_eq!(view.estimated_wait_minutes, 0);
    }

    #[test]
    fn test_status_filter() {
        let config = WorkflowConfig::default();
        let orders = vec![
            routed("a", OrderStatus::Pending, 1, &["grill"]),
            routed("b", OrderStatus::Ready, 2, &["grill"]),
        ];
        let filter = QueueFilter {
            status: Some(OrderStatus::Ready),
            ..Default::default()
        };
        let view = build_queue(orders, &filter, None, &config, 0);
        assert!(view.pending.is_empty());
        assert_eq!(view.ready.len(), 1);
    }
}
