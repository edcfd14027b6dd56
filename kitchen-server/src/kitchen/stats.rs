//! Kitchen statistics over a rolling window

use shared::models::{KitchenStats, Order, OrderStatus, StatsPeriod};

/// Window `[now - period, now]`
pub fn window(period: StatsPeriod, now: i64) -> (i64, i64) {
    (now - period.window_millis(), now)
}

/// Count orders placed inside the window
pub fn compute_stats(
    orders: &[Order],
    period: StatsPeriod,
    kitchen_id: Option<&str>,
    now: i64,
) -> KitchenStats {
    let (from, to) = window(period, now);
    let mut stats = KitchenStats {
        period,
        from,
        to,
        kitchen_id: kitchen_id.map(str::to_string),
        total: 0,
        completed: 0,
        pending: 0,
        cancelled: 0,
        refunded: 0,
        completion_rate: 0.0,
    };

    let in_window = orders.iter().filter(|o| {
        !o.is_deleted
            && o.ordered_at >= from
            && o.ordered_at <= to
            && kitchen_id.is_none_or(|k| o.kitchen_id == k)
    });

    for order in in_window {
        stats.total += 1;
        match order.status {
            OrderStatus::Ready | OrderStatus::Delivered => stats.completed += 1,
            OrderStatus::Pending | OrderStatus::InProgress | OrderStatus::Paused => {
                stats.pending += 1
            }
            OrderStatus::Cancelled => stats.cancelled += 1,
            OrderStatus::Refunded => stats.refunded += 1,
        }
    }

    if stats.total > 0 {
        stats.completion_rate = stats.completed as f64 / stats.total as f64 * 100.0;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::DAY_MILLIS;

    fn order(kitchen: &str, status: OrderStatus, ordered_at: i64) -> Order {
        Order {
            id: format!("{kitchen}-{ordered_at}"),
            table_id: "t".to_string(),
            customer_id: None,
            kitchen_id: kitchen.to_string(),
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
        }
    }

    #[test]
    fn test_empty_window() {
        let stats = compute_stats(&[], StatsPeriod::Day, None, 10 * DAY_MILLIS);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.to - stats.from, DAY_MILLIS);
    }

    #[test]
    fn test_counts_by_bucket() {
        let now = 10 * DAY_MILLIS;
        let orders = vec![
            order("main", OrderStatus::Ready, now - 1),
            order("main", OrderStatus::Delivered, now - 2),
            order("main", OrderStatus::Paused, now - 3),
            order("main", OrderStatus::Pending, now - 4),
            order("main", OrderStatus::Cancelled, now - 5),
            order("main", OrderStatus::Refunded, now - 6),
            // outside the day window
            order("main", OrderStatus::Delivered, now - 2 * DAY_MILLIS),
        ];
        let stats = compute_stats(&orders, StatsPeriod::Day, None, now);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.refunded, 1);
        assert!((stats.completion_rate - 100.0 / 3.0).abs() < 1e-9);

        let week = compute_stats(&orders, StatsPeriod::Week, None, now);
        assert_eq!(week.total, 7);
    }

    #[test]
    fn test_kitchen_filter() {
        let now = DAY_MILLIS;
        let orders = vec![
            order("main", OrderStatus::Ready, now - 1),
            order("bar", OrderStatus::Ready, now - 1),
        ];
        let stats = compute_stats(&orders, StatsPeriod::Day, Some("bar"), now);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.kitchen_id.as_deref(), Some("bar"));
        assert_eq!(stats.completion_rate, 100.0);
    }
}
