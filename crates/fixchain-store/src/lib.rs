//! fixchain store - SQLite snapshot files and statement execution
//!
//! Provides:
//! - Connection open/verification for snapshot files
//! - Synchronous query executor with result projection
//! - Copy-based snapshot forking with an explicit label registry
//! - Seed fixture provisioning for the first snapshot of a chain

pub mod db;
pub mod errors;
pub mod executor;
pub mod seed;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use seed::SeedSource;
pub use snapshot::{OpenLease, OpenSnapshot, SnapshotRecord, SnapshotRegistry};
