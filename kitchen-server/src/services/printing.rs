//! Kitchen/receipt printing types and the print collaborator
//!
//! 物理打印不在本服务内: `LogPrinter` 只输出结构化日志。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderDetail, StationId};
use thiserror::Error;

/// 厨房单菜品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenTicketItem {
    pub product_name: String,
    pub quantity: u32,
    pub comment: Option<String>,
    /// 目标工位 (空 = 未分配)
    pub stations: Vec<StationId>,
}

/// 厨房单 (start 时打印)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenTicket {
    pub order_id: String,
    pub table_id: String,
    pub kitchen_id: String,
    pub ordered_at: i64,
    pub comments: String,
    pub items: Vec<KitchenTicketItem>,
}

impl KitchenTicket {
    pub fn from_detail(detail: &OrderDetail) -> Self {
        let order = &detail.order;
        let items = order
            .active_items()
            .map(|item| KitchenTicketItem {
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                comment: item.comment.clone(),
                stations: detail
                    .items
                    .iter()
                    .find(|r| r.item_id == item.id)
                    .map(|r| r.stations.iter().cloned().collect())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            order_id: order.id.clone(),
            table_id: order.table_id.clone(),
            kitchen_id: order.kitchen_id.clone(),
            ordered_at: order.ordered_at,
            comments: order.comments.clone(),
            items,
        }
    }

    /// Ticket header time (UTC, MM-DD HH:mm)
    pub fn time_label(&self) -> String {
        format_timestamp(self.ordered_at)
    }
}

fn format_timestamp(ts: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(ts) {
        Some(dt) => dt.format("%m-%d %H:%M").to_string(),
        None => "时间未知".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Print failed: {0}")]
    Failed(String),
}

pub type PrintResult<T> = Result<T, PrintError>;

/// Print service
#[async_trait]
pub trait PrintService: Send + Sync {
    async fn print_kitchen_ticket(&self, ticket: &KitchenTicket) -> PrintResult<()>;

    async fn print_receipt(&self, order: &Order) -> PrintResult<()>;
}

/// Printer that writes one log line per document
#[derive(Debug, Default, Clone)]
pub struct LogPrinter;

#[async_trait]
impl PrintService for LogPrinter {
    async fn print_kitchen_ticket(&self, ticket: &KitchenTicket) -> PrintResult<()> {
        tracing::info!(
            order_id = %ticket.order_id,
            table_id = %ticket.table_id,
            ordered = %ticket.time_label(),
            items = ticket.items.len(),
            "Kitchen ticket printed"
        );
        Ok(())
    }

    async fn print_receipt(&self, order: &Order) -> PrintResult<()> {
        tracing::info!(
            order_id = %order.id,
            table_id = %order.table_id,
            total = order.total,
            "Receipt printed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ItemRoute, OrderItem, OrderStatus, Priority, ProductKind};
    use std::collections::BTreeSet;

    fn detail() -> OrderDetail {
        let item = |id: &str, name: &str, deleted: bool| OrderItem {
            id: id.to_string(),
            product_id: format!("p-{id}"),
            product_name: name.to_string(),
            kind: ProductKind::Dish,
            quantity: 2,
            unit_price: 4.0,
            comment: None,
            is_deleted: deleted,
        };
        let grill: BTreeSet<StationId> = [StationId::from("grill")].into();
        OrderDetail {
            order: Order {
                id: "o-1".to_string(),
                table_id: "t-3".to_string(),
                customer_id: None,
                kitchen_id: "main".to_string(),
                shift_id: None,
                ordered_at: 0,
                status: OrderStatus::InProgress,
                comments: String::new(),
                total: 16.0,
                items: vec![item("a", "Pollo", false), item("b", "Pan", false), item("c", "Agua", true)],
                is_deleted: false,
                paused_from: None,
                updated_by: None,
                updated_at: None,
                history: vec![],
            },
            priority: Priority::Low,
            eta: 0,
            minutes_elapsed: 0,
            items: vec![ItemRoute {
                item_id: "a".to_string(),
                product_name: "Pollo".to_string(),
                quantity: 2,
                stations: grill.clone(),
                primary: Some(StationId::from("grill")),
            }],
            stations: grill,
        }
    }

    #[test]
    fn test_ticket_skips_removed_items() {
        let ticket = KitchenTicket::from_detail(&detail());
        assert_eq!(ticket.items.len(), 2);
        assert_eq!(ticket.items[0].stations, vec![StationId::from("grill")]);
        assert!(ticket.items[1].stations.is_empty());
    }

    #[test]
    fn test_time_label() {
        let mut ticket = KitchenTicket::from_detail(&detail());
        assert_eq!(ticket.time_label(), "01-01 00:00");
        // 2024-03-05 12:30 UTC
        ticket.ordered_at = 1_709_641_800_000;
        assert_eq!(ticket.time_label(), "03-05 12:30");
    }

    #[tokio::test]
    async fn test_log_printer_never_fails() {
        let printer = LogPrinter;
        let detail = detail();
        printer
            .print_kitchen_ticket(&KitchenTicket::from_detail(&detail))
            .await
            .unwrap();
        printer.print_receipt(&detail.order).await.unwrap();
    }
}
