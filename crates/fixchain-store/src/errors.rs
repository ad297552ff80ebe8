//! Error handling for fixchain-store
//!
//! Wraps fixchain-core ExError with store-specific constructors

use fixchain_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Parent snapshot or seed fixture is missing
pub fn snapshot_not_found(label: &str, path: &Path) -> ExError {
    ExError::new(ExErrorKind::SnapshotNotFound)
        .with_op("resolve_snapshot")
        .with_label(label)
        .with_path(path)
        .with_message(format!("snapshot file {} does not exist", path.display()))
}

/// Filesystem copy into a snapshot path failed
pub fn copy_failed(label: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::CopyFailed)
        .with_op("copy_snapshot")
        .with_label(label)
        .with_path(path)
        .with_message(err.to_string())
}

/// Engine refused to open a file as a database
pub fn open_failed(path: &Path, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::OpenFailed)
        .with_op("open_snapshot")
        .with_path(path)
        .with_message(err.to_string())
}

/// Statement failed; keeps the engine diagnostic verbatim
pub fn execution_error(op: &str, sql: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::ExecutionError)
        .with_op(op)
        .with_sql(sql)
        .with_message(err.to_string())
}

/// Statement issued after the connection was closed
pub fn connection_closed(op: &str, label: &str) -> ExError {
    ExError::new(ExErrorKind::ExecutionError)
        .with_op(op)
        .with_label(label)
        .with_message("connection is closed")
}

/// Destination label still has a live connection
pub fn snapshot_in_use(label: &str) -> ExError {
    ExError::new(ExErrorKind::SnapshotInUse)
        .with_op("acquire_snapshot")
        .with_label(label)
        .with_message(format!("snapshot {} is already open", label))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::ExecutionError)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
