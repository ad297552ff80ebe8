//! Subcommand implementations

pub mod build;
pub mod digest;
pub mod fork;
pub mod query;

use fixchain_engine::{ExError, HarnessConfig, SnapshotLabel};
use std::path::Path;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Config file (or defaults) with environment overrides applied
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => HarnessConfig::load(p).map_err(ExError::from)?,
        None => HarnessConfig::default(),
    };
    Ok(config.apply_env_overrides())
}

pub fn parse_label(s: &str) -> Result<SnapshotLabel, ExError> {
    SnapshotLabel::new(s).map_err(ExError::from)
}
