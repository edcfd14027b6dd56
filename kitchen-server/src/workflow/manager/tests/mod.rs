use super::*;
use crate::orders::OrderStorage;
use crate::services::{PrintError, TableError};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{NewOrderItem, ProductKind};
use shared::util::MINUTE_MILLIS;

// ========================================================================
// 测试替身
// ========================================================================

/// Printer that records what was printed
#[derive(Default)]
struct RecordingPrinter {
    tickets: Mutex<Vec<KitchenTicket>>,
    receipts: Mutex<Vec<String>>,
}

#[async_trait]
impl PrintService for RecordingPrinter {
    async fn print_kitchen_ticket(&self, ticket: &KitchenTicket) -> Result<(), PrintError> {
        self.tickets.lock().push(ticket.clone());
        Ok(())
    }

    async fn print_receipt(&self, order: &Order) -> Result<(), PrintError> {
        self.receipts.lock().push(order.id.clone());
        Ok(())
    }
}

/// Printer that always fails
struct JammedPrinter;

#[async_trait]
impl PrintService for JammedPrinter {
    async fn print_kitchen_ticket(&self, _: &KitchenTicket) -> Result<(), PrintError> {
        Err(PrintError::Failed("paper jam".to_string()))
    }

    async fn print_receipt(&self, _: &Order) -> Result<(), PrintError> {
        Err(PrintError::Failed("paper jam".to_string()))
    }
}

/// Seating service that is down
struct OfflineTables;

#[async_trait]
impl TableService for OfflineTables {
    async fn occupy_table(&self, _: &str) -> Result<(), TableError> {
        Err(TableError::Unavailable("seating service offline".to_string()))
    }

    async fn release_table(&self, _: &str) -> Result<(), TableError> {
        Err(TableError::Unavailable("seating service offline".to_string()))
    }
}

/// Seats guests but never frees a table
struct StuckTables;

#[async_trait]
impl TableService for StuckTables {
    async fn occupy_table(&self, _: &str) -> Result<(), TableError> {
        Ok(())
    }

    async fn release_table(&self, _: &str) -> Result<(), TableError> {
        Err(TableError::Unavailable("table release timed out".to_string()))
    }
}

struct Harness {
    manager: WorkflowManager,
    storage: Arc<OrderStorage>,
    bus: Arc<MessageBus>,
    printer: Arc<RecordingPrinter>,
    tables: Arc<TableRegistry>,
    catalog: Arc<CatalogService>,
}

fn create_test_harness() -> Harness {
    let storage = Arc::new(OrderStorage::open_in_memory().unwrap());
    let bus = Arc::new(MessageBus::new());
    let printer = Arc::new(RecordingPrinter::default());
    let tables = Arc::new(TableRegistry::new());
    let catalog = Arc::new(CatalogService::new());
    let manager = WorkflowManager::new(WorkflowConfig::default(), storage.clone(), bus.clone())
        .with_catalog(catalog.clone())
        .with_tables(tables.clone())
        .with_printer(printer.clone());
    Harness {
        manager,
        storage,
        bus,
        printer,
        tables,
        catalog,
    }
}

fn new_item(product_id: &str, name: &str, price: f64, quantity: u32) -> NewOrderItem {
    NewOrderItem {
        product_id: product_id.to_string(),
        product_name: name.to_string(),
        kind: ProductKind::Dish,
        quantity,
        unit_price: price,
        comment: None,
    }
}

fn new_order(table_id: &str, items: Vec<NewOrderItem>) -> NewOrder {
    NewOrder {
        table_id: table_id.to_string(),
        customer_id: None,
        kitchen_id: "main".to_string(),
        shift_id: None,
        comments: None,
        items,
    }
}

/// Create a 2-item order (grill + beverage) through the facade
async fn create_burger_order(h: &Harness, table_id: &str) -> String {
    let detail = h
        .manager
        .create_order(
            new_order(
                table_id,
                vec![
                    new_item("p-burger", "Hamburguesa doble", 11.5, 1),
                    new_item("p-juice", "Jugo de naranja", 3.0, 2),
                ],
            ),
            "waiter-1",
        )
        .await
        .unwrap();
    detail.order.id
}

/// Store an order directly, bypassing intake (old timestamps, any state)
async fn insert_order(
    h: &Harness,
    id: &str,
    status: OrderStatus,
    ordered_at: i64,
    products: &[&str],
) -> Order {
    let items = products
        .iter()
        .enumerate()
        .map(|(i, name)| OrderItem {
            id: format!("{id}-item-{i}"),
            product_id: format!("p-{i}"),
            product_name: name.to_string(),
            kind: ProductKind::Dish,
            quantity: 1,
            unit_price: 5.0,
            comment: None,
            is_deleted: false,
        })
        .collect();
    let order = Order {
        id: id.to_string(),
        table_id: format!("table-{id}"),
        customer_id: None,
        kitchen_id: "main".to_string(),
        shift_id: None,
        ordered_at,
        status,
        comments: String::new(),
        total: 5.0 * products.len() as f64,
        items,
        is_deleted: false,
        paused_from: None,
        updated_by: None,
        updated_at: None,
        history: vec![],
    };
    h.storage.create_order(order).await.unwrap()
}

fn minutes_ago(minutes: i64) -> i64 {
    now_millis() - minutes * MINUTE_MILLIS
}

mod test_queue;
