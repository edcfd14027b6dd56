//! redb-based order storage
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | Order records |
//! | `open_orders` | `order_id` | `()` | Non-terminal order index |
//!
//! # Conditional update
//!
//! redb allows a single write transaction at a time, so reading the current
//! state and writing the new one inside the same `WriteTransaction` is an
//! atomic compare-and-set.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{Order, OrderItem, OrderStatus};
use thiserror::Error;

use super::store::{ListQuery, OrderStore, OrderUpdate, StoreError, StoreResult};

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for non-terminal orders: key = order_id, value = empty (existence check)
const OPEN_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("open_orders");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => StoreError::NotFound(id),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for OrderStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStorage").finish_non_exhaustive()
    }
}

impl OrderStorage {
    /// Open or create the database at the given path
    ///
    /// Commits are durable as soon as `commit()` returns.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, ephemeral kitchens)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(OPEN_ORDERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Order Operations ==========

    /// Store an order and keep the open-order index in sync (within transaction)
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;

        let mut open = txn.open_table(OPEN_ORDERS_TABLE)?;
        if order.status.is_open() && !order.is_deleted {
            open.insert(order.id.as_str(), ())?;
        } else {
            open.remove(order.id.as_str())?;
        }
        Ok(())
    }

    /// Get an order by ID
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by ID (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all orders
    pub fn get_all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            orders.push(serde_json::from_slice(value.value())?);
        }
        Ok(orders)
    }

    /// Get all non-terminal orders via the index
    pub fn get_open_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(OPEN_ORDERS_TABLE)?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in index.iter()? {
            let (key, _) = result?;
            if let Some(value) = table.get(key.value())? {
                orders.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(orders)
    }

    /// Compare-and-set the order state
    ///
    /// Returns `Ok(Err(current))` when the persisted state is not `expected`
    /// or the order history moved past `update.expected_revision`;
    /// nothing is written in that case.
    pub fn compare_and_set_status(
        &self,
        order_id: &str,
        expected: OrderStatus,
        new: OrderStatus,
        update: &OrderUpdate,
    ) -> StorageResult<Result<Order, OrderStatus>> {
        let txn = self.begin_write()?;
        let mut order = match self.get_order_txn(&txn, order_id)? {
            Some(o) if !o.is_deleted => o,
            _ => return Err(StorageError::OrderNotFound(order_id.to_string())),
        };

        if !update.matches(&order, expected) {
            // Dropping the transaction aborts it
            return Ok(Err(order.status));
        }

        update.apply(&mut order, expected, new);
        self.store_order(&txn, &order)?;
        txn.commit()?;
        Ok(Ok(order))
    }

    /// Insert a new order; `Ok(false)` when the id is already taken
    pub fn insert_order(&self, order: &Order) -> StorageResult<bool> {
        let txn = self.begin_write()?;
        if self.get_order_txn(&txn, &order.id)?.is_some() {
            return Ok(false);
        }
        self.store_order(&txn, order)?;
        txn.commit()?;
        Ok(true)
    }

    /// Get the number of stored orders
    pub fn count_orders(&self) -> StorageResult<u64> {
        use redb::ReadableTableMetadata;
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        Ok(table.len()?)
    }
}

#[async_trait]
impl OrderStore for OrderStorage {
    async fn find_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        Ok(self.get_order(order_id)?)
    }

    async fn list_orders(&self, query: &ListQuery) -> StoreResult<Vec<Order>> {
        let only_open = query
            .filter
            .statuses
            .as_ref()
            .is_some_and(|s| s.iter().all(OrderStatus::is_open));
        let orders = if only_open {
            self.get_open_orders()?
        } else {
            self.get_all_orders()?
        };
        Ok(query.apply(orders))
    }

    async fn update_order_state(
        &self,
        order_id: &str,
        expected: OrderStatus,
        new: OrderStatus,
        update: OrderUpdate,
    ) -> StoreResult<Order> {
        match self.compare_and_set_status(order_id, expected, new, &update)? {
            Ok(order) => Ok(order),
            Err(current) => Err(StoreError::StateConflict { current }),
        }
    }

    async fn list_order_items(&self, order_id: &str) -> StoreResult<Vec<OrderItem>> {
        match self.get_order(order_id)? {
            Some(order) if !order.is_deleted => {
                Ok(order.items.into_iter().filter(|i| !i.is_deleted).collect())
            }
            _ => Err(StoreError::NotFound(order_id.to_string())),
        }
    }

    async fn create_order(&self, order: Order) -> StoreResult<Order> {
        if !self.insert_order(&order)? {
            return Err(StoreError::Duplicate(order.id));
        }
        Ok(order)
    }

    async fn remove_item(
        &self,
        order_id: &str,
        item_id: &str,
        actor_id: &str,
        at: i64,
    ) -> StoreResult<Order> {
        let txn = self.begin_write().map_err(StoreError::from)?;
        let mut order = match self.get_order_txn(&txn, order_id)? {
            Some(o) if !o.is_deleted => o,
            _ => return Err(StoreError::NotFound(order_id.to_string())),
        };
        if order.status != OrderStatus::Pending {
            return Err(StoreError::NotPending {
                current: order.status,
            });
        }

        let idx = order
            .items
            .iter()
            .position(|i| i.id == item_id && !i.is_deleted)
            .ok_or_else(|| StoreError::ItemNotFound(item_id.to_string()))?;
        if order.active_items().count() == 1 {
            return Err(StoreError::LastItem(order_id.to_string()));
        }
        order.items[idx].is_deleted = true;

        order.total = order.active_items().map(OrderItem::subtotal).sum();
        order.updated_by = Some(actor_id.to_string());
        order.updated_at = Some(at);

        self.store_order(&txn, &order)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(order)
    }
}
