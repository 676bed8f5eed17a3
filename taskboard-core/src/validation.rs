//! Field validation shared by the stores and the HTTP layer.
//!
//! A text field counts as blank when nothing but whitespace remains after
//! trimming. Messages are user-facing and returned verbatim in 400 bodies.

use crate::{Result, TaskboardError};

/// Returns true if the value is empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// A required field must be present and not blank.
///
/// Fails with `"<label> is required"`.
pub fn required<'a>(value: Option<&'a str>, label: &str) -> Result<&'a str> {
    match value {
        Some(v) if !is_blank(v) => Ok(v),
        _ => Err(TaskboardError::InvalidInput(format!("{} is required", label))),
    }
}

/// A patched field may be absent, but when supplied it must not be blank.
///
/// Fails with `"<label> cannot be empty"`.
pub fn non_blank_if_present(value: Option<&str>, label: &str) -> Result<()> {
    match value {
        Some(v) if is_blank(v) => Err(TaskboardError::InvalidInput(format!(
            "{} cannot be empty",
            label
        ))),
        _ => Ok(()),
    }
}
