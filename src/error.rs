//! Error types shared by the entity model and the analytics engine.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    /// A required value was blank, out of range, or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two input entities map to the same result key (e.g. two users sharing a username).
    #[error("duplicate {kind} key: {key}")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Fails with [`AnalyticsError::InvalidArgument`] when `value` is empty after trimming.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AnalyticsError::InvalidArgument(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}
