//! Table/seating collaborator

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Free,
    Occupied,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table service unavailable: {0}")]
    Unavailable(String),
}

/// Seating service as seen by the workflow
#[async_trait]
pub trait TableService: Send + Sync {
    /// Seat an order at the table (order intake)
    async fn occupy_table(&self, table_id: &str) -> Result<(), TableError>;

    async fn release_table(&self, table_id: &str) -> Result<(), TableError>;
}

/// In-memory table status map
///
/// Tables are registered on first use, releasing an unknown table registers it free.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: DashMap<String, TableStatus>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, table_id: &str) -> Option<TableStatus> {
        self.tables.get(table_id).map(|s| *s.value())
    }
}

#[async_trait]
impl TableService for TableRegistry {
    async fn occupy_table(&self, table_id: &str) -> Result<(), TableError> {
        let previous = self.tables.insert(table_id.to_string(), TableStatus::Occupied);
        if previous == Some(TableStatus::Occupied) {
            // 同桌加单
            tracing::debug!(table_id = %table_id, "Table already occupied");
        }
        Ok(())
    }

    async fn release_table(&self, table_id: &str) -> Result<(), TableError> {
        let previous = self.tables.insert(table_id.to_string(), TableStatus::Free);
        tracing::debug!(table_id = %table_id, ?previous, "Table released");
        Ok(())
    }
}
