//! Station registry - configured stations and their staff assignment

use dashmap::DashMap;
use shared::models::{Station, StationId};

use crate::core::StationConfig;

/// In-memory station registry
///
/// The station set is fixed at construction; only the staff assignment changes.
#[derive(Debug)]
pub struct StationRegistry {
    stations: DashMap<StationId, Station>,
    /// Configured order
    order: Vec<StationId>,
}

impl StationRegistry {
    pub fn new(config: &[StationConfig]) -> Self {
        let stations = DashMap::new();
        let mut order = Vec::with_capacity(config.len());
        for s in config {
            order.push(s.id.clone());
            stations.insert(
                s.id.clone(),
                Station {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    assigned_staff: None,
                    capacity: s.capacity,
                },
            );
        }
        Self { stations, order }
    }

    pub fn get(&self, id: &StationId) -> Option<Station> {
        self.stations.get(id).map(|s| s.value().clone())
    }

    /// All stations in configured order
    pub fn list(&self) -> Vec<Station> {
        self.order.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Set or clear the staff member on a station; `None` if the station is unknown
    pub fn assign_staff(&self, id: &StationId, staff_id: Option<String>) -> Option<Station> {
        let mut entry = self.stations.get_mut(id)?;
        entry.assigned_staff = staff_id;
        Some(entry.value().clone())
    }
}
