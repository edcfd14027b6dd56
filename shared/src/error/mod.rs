//! Unified error system for the kitchen workflow
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::InvalidTransition, "order is ready")
//!     .with_detail("current", "ready");
//!
//! assert_eq!(err.code.code(), 4002);
//! assert_eq!(err.to_string(), "order is ready");
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::AppError;
