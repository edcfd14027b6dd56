//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits follow the 80mm kitchen ticket width and reasonable UX limits.

use shared::models::NewOrder;

use crate::workflow::{ValidationError, WorkflowError};

// ── Text length limits ──────────────────────────────────────────────

/// Identifiers: table, kitchen, product, staff
pub const MAX_ID_LEN: usize = 100;

/// Product names as printed on kitchen tickets
pub const MAX_NAME_LEN: usize = 200;

/// Notes and comments (order comment, completion notes, pause reason)
pub const MAX_NOTE_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        return Err(malformed(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(malformed(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<(), WorkflowError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(malformed(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an order intake payload
pub fn validate_new_order(input: &NewOrder) -> Result<(), WorkflowError> {
    validate_required_text(&input.table_id, "table_id", MAX_ID_LEN)?;
    validate_required_text(&input.kitchen_id, "kitchen_id", MAX_ID_LEN)?;
    validate_optional_text(input.comments.as_deref(), "comments", MAX_NOTE_LEN)?;

    if input.items.is_empty() {
        return Err(malformed("order must contain at least one item"));
    }

    for (idx, item) in input.items.iter().enumerate() {
        validate_required_text(&item.product_id, &format!("items[{idx}].product_id"), MAX_ID_LEN)?;
        validate_required_text(
            &item.product_name,
            &format!("items[{idx}].product_name"),
            MAX_NAME_LEN,
        )?;
        validate_optional_text(
            item.comment.as_deref(),
            &format!("items[{idx}].comment"),
            MAX_NOTE_LEN,
        )?;
        if item.quantity == 0 {
            return Err(malformed(format!("items[{idx}].quantity must be positive")));
        }
        if !item.unit_price.is_finite() || item.unit_price < 0.0 {
            return Err(malformed(format!(
                "items[{idx}].unit_price must be a non-negative number"
            )));
        }
    }
    Ok(())
}

fn malformed(msg: impl Into<String>) -> WorkflowError {
    WorkflowError::Validation(ValidationError::Malformed(msg.into()))
}
