use shared::error::{AppError, ErrorCode};
use shared::models::{OrderStatus, StationId};
use thiserror::Error;

use crate::orders::StoreError;

/// Validation failures of a workflow request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unknown station: {0}")]
    UnknownStation(StationId),

    #[error(
        "Refund window exceeded for order {order_id}: {days_elapsed} days elapsed, window is {window_days} days"
    )]
    RefundWindowExceeded {
        order_id: String,
        days_elapsed: i64,
        window_days: u32,
    },

    #[error("Order {order_id} has no items routed to station {station}")]
    StationNotRouted { order_id: String, station: StationId },

    #[error("Order {order_id} must keep at least one item")]
    OrderEmpty { order_id: String },

    #[error("{0}")]
    Malformed(String),
}

/// Kind of record a lookup failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Order,
    OrderItem,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Order => "order",
            Resource::OrderItem => "order item",
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            Resource::Order => ErrorCode::OrderNotFound,
            Resource::OrderItem => ErrorCode::OrderItemNotFound,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow errors
///
/// Each facade call yields a success payload or exactly one of these.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Not found: {resource} {id}")]
    NotFound { resource: Resource, id: String },

    #[error("Invalid transition for order {order_id}: {current} -> {attempted}")]
    InvalidTransition {
        order_id: String,
        current: OrderStatus,
        attempted: OrderStatus,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Upstream unavailable during {operation} (order {order_id}): {message}")]
    UpstreamUnavailable {
        operation: &'static str,
        order_id: String,
        message: String,
    },
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    pub fn not_found(resource: Resource, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn invalid_transition(
        order_id: impl Into<String>,
        current: OrderStatus,
        attempted: OrderStatus,
    ) -> Self {
        Self::InvalidTransition {
            order_id: order_id.into(),
            current,
            attempted,
        }
    }

    pub fn upstream(
        operation: &'static str,
        order_id: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::UpstreamUnavailable {
            operation,
            order_id: order_id.into(),
            message: err.to_string(),
        }
    }

    /// Map a store error of a state change
    ///
    /// A lost conditional update becomes `InvalidTransition` with the state
    /// observed at commit time.
    pub fn from_store(
        operation: &'static str,
        order_id: &str,
        attempted: OrderStatus,
        err: StoreError,
    ) -> Self {
        match err {
            StoreError::NotFound(id) => Self::not_found(Resource::Order, id),
            StoreError::StateConflict { current } => {
                Self::invalid_transition(order_id, current, attempted)
            }
            other => Self::upstream(operation, order_id, other),
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound { resource, id } => {
                AppError::with_message(resource.code(), format!("Not found: {resource} {id}"))
                    .with_detail("resource", resource.as_str())
                    .with_detail("id", id)
            }
            WorkflowError::InvalidTransition {
                order_id,
                current,
                attempted,
            } => AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Cannot move order {order_id} from {current} to {attempted}"),
            )
            .with_detail("order_id", order_id)
            .with_detail("current", current.as_str())
            .with_detail("attempted", attempted.as_str()),
            WorkflowError::Validation(ValidationError::UnknownStation(id)) => {
                AppError::with_message(ErrorCode::StationNotFound, format!("Unknown station: {id}"))
                    .with_detail("station", id.to_string())
            }
            WorkflowError::Validation(ValidationError::RefundWindowExceeded {
                order_id,
                days_elapsed,
                window_days,
            }) => AppError::with_message(
                ErrorCode::RefundWindowExceeded,
                format!(
                    "Refund window of {window_days} days exceeded ({days_elapsed} days elapsed)"
                ),
            )
            .with_detail("order_id", order_id)
            .with_detail("days_elapsed", days_elapsed)
            .with_detail("window_days", window_days),
            WorkflowError::Validation(ValidationError::StationNotRouted { order_id, station }) => {
                AppError::with_message(
                    ErrorCode::StationNotRouted,
                    format!("Order {order_id} has nothing routed to station {station}"),
                )
                .with_detail("order_id", order_id)
                .with_detail("station", station.to_string())
            }
            WorkflowError::Validation(ValidationError::OrderEmpty { order_id }) => {
                AppError::with_message(
                    ErrorCode::OrderEmpty,
                    format!("Order {order_id} must keep at least one item"),
                )
                .with_detail("order_id", order_id)
            }
            WorkflowError::Validation(ValidationError::Malformed(msg)) => AppError::validation(msg),
            WorkflowError::UpstreamUnavailable {
                operation,
                order_id,
                message,
            } => {
                tracing::error!(operation, order_id = %order_id, error = %message, "Upstream collaborator failed");
                AppError::with_message(
                    ErrorCode::UpstreamUnavailable,
                    format!("{operation} failed: {message}"),
                )
                .with_detail("operation", operation)
                .with_detail("order_id", order_id)
            }
        }
    }
}
