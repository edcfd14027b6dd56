//! Catalog Service - product and category names with in-memory caching
//!
//! The classifier needs the product name and its category name, plus the
//! explicit station when the catalog carries one.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{ProductKind, StationId};
use thiserror::Error;

/// Product metadata used for station routing
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub name: String,
    pub category_name: String,
    pub kind: ProductKind,
    /// Explicit station mapping (overrides keyword rules)
    pub station: Option<StationId>,
}

impl ProductInfo {
    pub fn new(name: impl Into<String>, category_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_name: category_name.into(),
            kind: ProductKind::Dish,
            station: None,
        }
    }

    pub fn with_kind(mut self, kind: ProductKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_station(mut self, station: impl Into<StationId>) -> Self {
        self.station = Some(station.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Product lookup by product reference
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get_product(&self, product_id: &str) -> Result<Option<ProductInfo>, CatalogError>;
}

/// In-memory product cache
#[derive(Debug, Default)]
pub struct CatalogService {
    products: RwLock<HashMap<String, ProductInfo>>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk load (replaces the cache)
    pub fn load(&self, products: impl IntoIterator<Item = (String, ProductInfo)>) {
        let mut cache = self.products.write();
        cache.clear();
        cache.extend(products);
        tracing::info!(count = cache.len(), "Catalog loaded");
    }

    pub fn upsert_product(&self, product_id: impl Into<String>, info: ProductInfo) {
        self.products.write().insert(product_id.into(), info);
    }

    pub fn remove_product(&self, product_id: &str) -> Option<ProductInfo> {
        self.products.write().remove(product_id)
    }

    pub fn get(&self, product_id: &str) -> Option<ProductInfo> {
        self.products.read().get(product_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

#[async_trait]
impl ProductCatalog for CatalogService {
    async fn get_product(&self, product_id: &str) -> Result<Option<ProductInfo>, CatalogError> {
        Ok(self.get(product_id))
    }
}
