//! Station classifier
//!
//! Routes an order item to kitchen stations. An explicit station on the
//! catalog product wins; otherwise keyword rules are applied to the product
//! and category names, and every station with a matching keyword is returned.

use std::collections::BTreeSet;

use shared::models::StationId;

use crate::core::StationConfig;

#[derive(Debug, Clone)]
struct StationRule {
    id: StationId,
    keywords: Vec<String>,
}

/// Keyword-based station classifier
#[derive(Debug, Clone)]
pub struct StationClassifier {
    /// Configured order = single-station priority order
    rules: Vec<StationRule>,
}

impl StationClassifier {
    pub fn new(stations: &[StationConfig]) -> Self {
        let rules = stations
            .iter()
            .map(|s| StationRule {
                id: s.id.clone(),
                keywords: s.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Keyword classification of a product/category name pair
    pub fn classify(&self, product_name: &str, category_name: &str) -> BTreeSet<StationId> {
        let product = product_name.to_lowercase();
        let category = category_name.to_lowercase();

        self.rules
            .iter()
            .filter(|rule| {
                rule.keywords
                    .iter()
                    .any(|k| product.contains(k.as_str()) || category.contains(k.as_str()))
            })
            .map(|rule| rule.id.clone())
            .collect()
    }

    /// Classification honoring an explicit catalog mapping
    ///
    /// An explicit station that is not configured is ignored and the keyword
    /// rules apply.
    pub fn classify_with_mapping(
        &self,
        product_name: &str,
        category_name: &str,
        explicit: Option<&StationId>,
    ) -> BTreeSet<StationId> {
        if let Some(id) = explicit {
            if self.is_known(id) {
                return BTreeSet::from([id.clone()]);
            }
            tracing::warn!(station = %id, product = %product_name, "Catalog maps product to unknown station, using keyword rules");
        }
        self.classify(product_name, category_name)
    }

    /// First station of `stations` in configured priority order
    pub fn primary(&self, stations: &BTreeSet<StationId>) -> Option<StationId> {
        self.rules
            .iter()
            .find(|rule| stations.contains(&rule.id))
            .map(|rule| rule.id.clone())
    }

    pub fn is_known(&self, id: &StationId) -> bool {
        self.rules.iter().any(|rule| &rule.id == id)
    }
}
