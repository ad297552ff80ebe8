use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using FixchainError
pub type Result<T> = std::result::Result<T, FixchainError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the store and engine layers is classified by
/// one of these kinds. Each kind maps to a stable error code that tests and
/// tooling can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Snapshot lifecycle
    /// Parent snapshot (or seed fixture) file is missing
    SnapshotNotFound,
    /// Filesystem copy into the destination snapshot could not complete
    CopyFailed,
    /// The engine could not open the file as a valid database image
    OpenFailed,
    /// The destination label still has a live connection in this run
    SnapshotInUse,

    // Statement execution
    /// Statement failed, violated a constraint, or the connection is closed
    ExecutionError,

    // Result shape
    NoRowsFound,
    MultipleRowsFound,

    // Validation
    InvalidInput,
    InvalidPlan,
    Config,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::SnapshotNotFound => "ERR_SNAPSHOT_NOT_FOUND",
            ExErrorKind::CopyFailed => "ERR_COPY_FAILED",
            ExErrorKind::OpenFailed => "ERR_OPEN_FAILED",
            ExErrorKind::SnapshotInUse => "ERR_SNAPSHOT_IN_USE",
            ExErrorKind::ExecutionError => "ERR_EXECUTION",
            ExErrorKind::NoRowsFound => "ERR_NO_ROWS_FOUND",
            ExErrorKind::MultipleRowsFound => "ERR_MULTIPLE_ROWS_FOUND",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPlan => "ERR_INVALID_PLAN",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus optional
/// context for debugging: the operation, the snapshot label and file involved,
/// the statement text and, for shape violations, the observed row count.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    label: Option<String>,
    path: Option<PathBuf>,
    sql: Option<String>,
    row_count: Option<usize>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            label: None,
            path: None,
            sql: None,
            row_count: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add snapshot label context
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add the statement text that failed
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    /// Add observed row count context
    pub fn with_row_count(mut self, count: usize) -> Self {
        self.row_count = Some(count);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the snapshot label context, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the failing statement text, if any
    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    /// Get the observed row count, if any
    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(label) = &self.label {
            write!(f, " (label: {})", label)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(count) = self.row_count {
            write!(f, " (rows: {})", count)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Engine-independent domain failures
///
/// Raised by label validation, result projection, statement building and
/// configuration parsing. Converted into [`ExError`] at the store boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixchainError {
    /// Snapshot label cannot be used as a file name component
    #[error("Invalid snapshot label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    /// Single-row query matched nothing
    #[error("Expected exactly one row, query returned none: {sql}")]
    NoRowsFound { sql: String },

    /// Single-row query matched more than one row
    #[error("Expected exactly one row, query returned {count}: {sql}")]
    MultipleRowsFound { sql: String, count: usize },

    /// Table or column name cannot be quoted
    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// Statement builder was given no columns
    #[error("No columns given for table {table}")]
    EmptyColumnList { table: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid chain plan: {reason}")]
    InvalidPlan { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<FixchainError> for ExError {
    fn from(err: FixchainError) -> Self {
        match err {
            FixchainError::InvalidLabel { label, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_label")
                    .with_label(label)
                    .with_message(reason)
            }

            FixchainError::NoRowsFound { sql } => ExError::new(ExErrorKind::NoRowsFound)
                .with_op("select_single_row")
                .with_row_count(0)
                .with_message("Expected exactly one row, query returned none")
                .with_sql(sql),

            FixchainError::MultipleRowsFound { sql, count } => {
                ExError::new(ExErrorKind::MultipleRowsFound)
                    .with_op("select_single_row")
                    .with_row_count(count)
                    .with_message(format!(
                        "Expected exactly one row, query returned {}",
                        count
                    ))
                    .with_sql(sql)
            }

            FixchainError::InvalidIdentifier { identifier, reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("quote_identifier")
                    .with_message(format!("Invalid identifier '{}': {}", identifier, reason))
            }

            FixchainError::EmptyColumnList { table } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("build_statement")
                .with_message(format!("No columns given for table {}", table)),

            FixchainError::Config { message } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }

            FixchainError::InvalidPlan { reason } => {
                ExError::new(ExErrorKind::InvalidPlan).with_message(reason)
            }

            FixchainError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
