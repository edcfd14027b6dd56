//! Kitchen workflow: facade, errors, priority and ETA

pub mod manager;
pub mod priority;

pub use manager::{Resource, ValidationError, WorkflowError, WorkflowManager, WorkflowResult};
