//! Error types for schema assembly.
//!
//! Schema compilation failures are surfaced to the caller unmodified. When a
//! failure carries a structured `details` payload (for example the list of
//! individual validation errors gathered during a build), the payload is
//! available through [`SchemaError::details`] so callers can emit it to
//! diagnostics before propagating the error.

use serde_json::Value;

/// Errors that can occur while assembling a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A textual type-definition fragment could not be parsed.
    #[error("failed to parse type definitions: {0}")]
    Parse(String),

    /// The merged sources do not form a valid schema.
    #[error("{message}")]
    Validation {
        /// Human-readable summary.
        message: String,
        /// Structured list of the individual failures.
        details: Value,
    },

    /// The engine rejected the assembled schema.
    #[error("failed to build schema: {0}")]
    Compile(String),

    /// Reading type-definition files or writing schema artifacts failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    /// Creates a validation error with a structured details payload.
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Returns the structured details payload, if this error carries one.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::Validation { details, .. } => Some(details),
            _ => None,
        }
    }
}
