//! Chain plans
//!
//! A plan names every snapshot of a chain in order, with the statements that
//! turn each parent into its child. Building a plan twice from the same seed
//! yields byte-identical snapshot files.

mod builder;
mod plan;

pub use builder::{build_chain, ChainReport, StepReport};
pub use plan::{ChainPlan, PlanStep};
