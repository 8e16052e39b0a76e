//! Error handling for relscope-store
//!
//! Wraps relscope-core ExError with store-specific helpers

use relscope_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a schema validation error
pub fn schema_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::SchemaInvalid)
        .with_op("schema_parse")
        .with_message(reason.to_string())
}

/// Create a schema validation error scoped to one entity
pub fn entity_validation(entity: &str, reason: &str) -> ExError {
    schema_validation(reason).with_entity(entity)
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
