//! Kitchen stations: item routing and staff assignment

pub mod classifier;
pub mod registry;
pub mod router;

pub use classifier::StationClassifier;
pub use registry::StationRegistry;
pub use router::{ItemRouter, RoutedOrder};
