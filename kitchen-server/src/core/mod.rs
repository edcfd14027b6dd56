pub mod config;

pub use config::{Config, StationConfig, WorkflowConfig};
