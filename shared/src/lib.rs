//! Shared types for the kitchen workflow
//!
//! Data records exchanged between kitchen-server and its display clients:
//! orders, stations, bus messages and the unified error system.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, KitchenEventType, Topic};

pub use error::{AppError, ErrorCode};
