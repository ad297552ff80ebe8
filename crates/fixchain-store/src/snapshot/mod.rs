//! Snapshot files
//!
//! ## Responsibilities
//!
//! - Map labels to snapshot files through an explicit registry
//! - Fork a snapshot by copying its parent's file byte-for-byte
//! - Track which labels have a live connection
//! - Digest snapshot files to check build determinism
//!
//! ## Non-Responsibilities
//!
//! - Async scheduling (handled by `fixchain-engine`)
//! - Parsing the database file format

pub mod copy;
pub mod digest;
pub mod registry;

// Re-export primary types
pub use digest::file_digest;
pub use registry::{OpenLease, OpenSnapshot, SnapshotRecord, SnapshotRegistry};
