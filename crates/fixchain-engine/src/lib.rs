//! fixchain engine - async surface for test suites
//!
//! Test suites ask the [`SnapshotManager`] for a snapshot forked from its
//! parent and get back a [`Database`] to run statements against. Every engine
//! call runs on tokio's blocking pool; the caller suspends until the engine
//! has finished the statement.
//!
//! The [`chain`] module materializes a whole chain from a TOML plan.

mod blocking;
pub mod chain;
pub mod database;
pub mod manager;

pub use chain::{build_chain, ChainPlan, ChainReport, PlanStep, StepReport};
pub use database::Database;
pub use manager::SnapshotManager;

pub use fixchain_core::{escape, ExError, ExErrorKind, HarnessConfig, Row, SnapshotLabel, SqlValue};
pub use fixchain_store::Result;
