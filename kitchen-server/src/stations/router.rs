//! Item router - resolves catalog products and classifies each item

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use shared::models::{ItemRoute, Order, StationId};

use super::classifier::StationClassifier;
use crate::services::{CatalogError, ProductCatalog, ProductInfo};

/// Order with station membership attached
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedOrder {
    pub order: Order,
    pub items: Vec<ItemRoute>,
    /// Union of item stations
    pub stations: BTreeSet<StationId>,
}

impl RoutedOrder {
    pub fn routes_to(&self, station: &StationId) -> bool {
        self.stations.contains(station)
    }
}

#[derive(Clone)]
pub struct ItemRouter {
    classifier: StationClassifier,
    catalog: Arc<dyn ProductCatalog>,
}

impl std::fmt::Debug for ItemRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRouter")
            .field("classifier", &self.classifier)
            .field("catalog", &"<ProductCatalog>")
            .finish()
    }
}

impl ItemRouter {
    pub fn new(classifier: StationClassifier, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { classifier, catalog }
    }

    pub fn classifier(&self) -> &StationClassifier {
        &self.classifier
    }

    /// Route every active item of `order`
    ///
    /// A product missing from the catalog is classified by its name snapshot
    /// with an empty category.
    pub async fn route(&self, order: Order) -> Result<RoutedOrder, CatalogError> {
        let mut products: HashMap<&str, Option<ProductInfo>> = HashMap::new();
        for item in order.active_items() {
            if !products.contains_key(item.product_id.as_str()) {
                let info = self.catalog.get_product(&item.product_id).await?;
                products.insert(item.product_id.as_str(), info);
            }
        }

        let mut stations = BTreeSet::new();
        let items: Vec<ItemRoute> = order
            .active_items()
            .map(|item| {
                let item_stations = match products.get(item.product_id.as_str()).and_then(Option::as_ref) {
                    Some(info) => self.classifier.classify_with_mapping(
                        &info.name,
                        &info.category_name,
                        info.station.as_ref(),
                    ),
                    None => self.classifier.classify(&item.product_name, ""),
                };
                stations.extend(item_stations.iter().cloned());
                ItemRoute {
                    item_id: item.id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    primary: self.classifier.primary(&item_stations),
                    stations: item_stations,
                }
            })
            .collect();
        drop(products);

        Ok(RoutedOrder {
            order,
            items,
            stations,
        })
    }

    /// Route several orders, stopping at the first catalog failure
    pub async fn route_all(&self, orders: Vec<Order>) -> Result<Vec<RoutedOrder>, CatalogError> {
        let mut routed = Vec::with_capacity(orders.len());
        for order in orders {
            routed.push(self.route(order).await?);
        }
        Ok(routed)
    }
}
