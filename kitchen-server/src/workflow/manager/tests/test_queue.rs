use super::*;
use crate::services::ProductInfo;
use shared::models::Priority;
use shared::util::DAY_MILLIS;

#[tokio::test]
async fn test_station_queue_membership() {
    let h = create_test_harness();
    insert_order(&h, "burger", OrderStatus::Pending, minutes_ago(5), &["Hamburguesa"]).await;
    insert_order(&h, "salad", OrderStatus::Pending, minutes_ago(4), &["Ensalada césar"]).await;
    insert_order(
        &h,
        "combo",
        OrderStatus::InProgress,
        minutes_ago(3),
        &["Pollo frito", "Limonada"],
    )
    .await;

    let grill = h.manager.get_queue(QueueFilter::station("grill")).await.unwrap();
    assert!(grill.contains("burger"));
    assert!(grill.contains("combo"));
    assert!(!grill.contains("salad"));

    let header = grill.station.unwrap();
    assert_eq!(header.station.name, "Parrilla");
    assert_eq!(header.load, 2);
    assert!(!header.over_capacity);

    let beverage = h
        .manager
        .get_queue(QueueFilter::station("beverage"))
        .await
        .unwrap();
    assert!(beverage.contains("combo"));
    assert_eq!(beverage.entries().count(), 1);
}

#[tokio::test]
async fn test_queue_fifo_with_priority_attached() {
    let h = create_test_harness();
    insert_order(&h, "new", OrderStatus::Pending, minutes_ago(2), &["Pizza"]).await;
    insert_order(&h, "old", OrderStatus::Pending, minutes_ago(35), &["Pizza"]).await;
    insert_order(&h, "mid", OrderStatus::Pending, minutes_ago(15), &["Pizza"]).await;

    let view = h.manager.get_queue(QueueFilter::default()).await.unwrap();
    let ids: Vec<&str> = view.pending.iter().map(|e| e.order_id.as_str()).collect();
    assert_eq!(ids, vec!["old", "mid", "new"]);
    assert_eq!(view.pending[0].priority, Priority::Urgent);
    assert_eq!(view.pending[1].priority, Priority::Medium);
    assert_eq!(view.pending[2].priority, Priority::Low);
    assert_eq!(view.estimated_wait_minutes, 45);
}

#[tokio::test]
async fn test_queue_excludes_terminal_orders() {
    let h = create_test_harness();
    let order_id = create_burger_order(&h, "t-1").await;
    h.manager.cancel(&order_id, "waiter-1").await.unwrap();
    insert_order(&h, "paused", OrderStatus::Paused, minutes_ago(1), &["Flan"]).await;

    let view = h.manager.get_queue(QueueFilter::default()).await.unwrap();
    assert!(!view.contains(&order_id));
    assert_eq!(view.paused.len(), 1);
    // paused orders do not count towards the wait
    assert_eq!(view.estimated_wait_minutes, 0);
}

#[tokio::test]
async fn test_queue_unknown_station() {
    let h = create_test_harness();
    let err = h
        .manager
        .get_queue(QueueFilter::station("sushi"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::UnknownStation(_))
    ));
}

#[tokio::test]
async fn test_queue_kitchen_filter() {
    let h = create_test_harness();
    let mut input = new_order("b-1", vec![new_item("p-1", "Cerveza", 3.0, 1)]);
    input.kitchen_id = "bar".to_string();
    let bar_id = h.manager.create_order(input, "waiter-1").await.unwrap().order.id;
    let main_id = create_burger_order(&h, "t-1").await;

    let filter = QueueFilter {
        kitchen_id: Some("bar".to_string()),
        ..Default::default()
    };
    let view = h.manager.get_queue(filter).await.unwrap();
    assert!(view.contains(&bar_id));
    assert!(!view.contains(&main_id));
}

#[tokio::test]
async fn test_catalog_mapping_routes_item() {
    let h = create_test_harness();
    // without the mapping "Especial de la casa" matches no keyword
    h.catalog.upsert_product(
        "p-0",
        ProductInfo::new("Especial de la casa", "Especiales").with_station("pizza"),
    );
    let order = insert_order(&h, "house", OrderStatus::Pending, minutes_ago(1), &["Especial de la casa"]).await;
    assert_eq!(order.items[0].product_id, "p-0");

    let detail = h.manager.get_order_detail("house").await.unwrap();
    assert_eq!(detail.items[0].primary, Some(StationId::from("pizza")));

    let pizza = h.manager.get_queue(QueueFilter::station("pizza")).await.unwrap();
    assert!(pizza.contains("house"));
}

#[tokio::test]
async fn test_stats_windows() {
    let h = create_test_harness();
    let now = now_millis();
    insert_order(&h, "a", OrderStatus::Delivered, now - 60_000, &["Pizza"]).await;
    insert_order(&h, "b", OrderStatus::Ready, now - 120_000, &["Pizza"]).await;
    insert_order(&h, "c", OrderStatus::Pending, now - 180_000, &["Pizza"]).await;
    insert_order(&h, "d", OrderStatus::Cancelled, now - 240_000, &["Pizza"]).await;
    insert_order(&h, "e", OrderStatus::Refunded, now - 3 * DAY_MILLIS, &["Pizza"]).await;

    let day = h.manager.get_stats(StatsPeriod::Day, None).await.unwrap();
    assert_eq!(day.total, 4);
    assert_eq!(day.completed, 2);
    assert_eq!(day.pending, 1);
    assert_eq!(day.cancelled, 1);
    assert_eq!(day.refunded, 0);
    assert_eq!(day.completion_rate, 50.0);

    let week = h.manager.get_stats(StatsPeriod::Week, None).await.unwrap();
    assert_eq!(week.total, 5);
    assert_eq!(week.refunded, 1);

    let other = h
        .manager
        .get_stats(StatsPeriod::Month, Some("bar".to_string()))
        .await
        .unwrap();
    assert_eq!(other.total, 0);
    assert_eq!(other.completion_rate, 0.0);
}
