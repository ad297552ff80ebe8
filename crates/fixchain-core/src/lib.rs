//! fixchain core - engine-independent building blocks
//!
//! This crate provides the pieces of the snapshot-chain harness that do not
//! touch the database engine:
//! - Error facility (`ExError`, `ExErrorKind`) and domain errors
//! - Structured logging facility
//! - Snapshot labels, scalar values and row mappings
//! - Result projection (exactly-one vs zero-or-more rows)
//! - SQL literal escaping and statement builders
//! - Harness configuration

pub mod config;
pub mod errors;
pub mod escape;
pub mod label;
pub mod logging_facility;
pub mod projection;
pub mod queries;
pub mod row;
pub mod value;

// Re-export commonly used types
pub use config::HarnessConfig;
pub use errors::{ExError, ExErrorKind, FixchainError, Result};
pub use escape::{escape, escape_value, quote_identifier};
pub use label::SnapshotLabel;
pub use row::Row;
pub use value::SqlValue;
