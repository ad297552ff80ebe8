//! Harness configuration
//!
//! Loaded from TOML; every key is optional. Environment variables
//! `FIXCHAIN_SNAPSHOT_DIR` and `FIXCHAIN_SEED` override the file.

use crate::errors::{FixchainError, Result};
use crate::label::SnapshotLabel;
use crate::logging_facility::Profile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_SNAPSHOT_DIR: &str = "FIXCHAIN_SNAPSHOT_DIR";
pub const ENV_SEED: &str = "FIXCHAIN_SEED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Directory holding every snapshot file of the chain
    pub snapshot_dir: PathBuf,
    /// Snapshot file extension, without the dot
    pub file_extension: String,
    /// Prepended to the label to form the file stem
    pub file_prefix: String,
    /// Seed fixture for the first snapshot: a `.sql` bootstrap script or a
    /// database file. `None` starts from an empty database.
    pub seed: Option<PathBuf>,
    pub log_profile: Profile,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("snapshots"),
            file_extension: "db".to_string(),
            file_prefix: String::new(),
            seed: None,
            log_profile: Profile::default(),
        }
    }
}

impl HarnessConfig {
    /// Config rooted at `snapshot_dir`, everything else defaulted
    pub fn with_snapshot_dir(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: impl Into<PathBuf>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// `Config` if the document is not TOML, names an unknown key, or gives
    /// a key the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FixchainError::Config {
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML file
    ///
    /// Relative `snapshot_dir`/`seed` paths are resolved against the file's
    /// directory.
    ///
    /// # Errors
    ///
    /// `Config` if the file cannot be read, plus everything
    /// [`from_toml_str`](Self::from_toml_str) reports.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| FixchainError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent() {
            if config.snapshot_dir.is_relative() {
                config.snapshot_dir = base.join(&config.snapshot_dir);
            }
            if let Some(seed) = config.seed.as_mut() {
                if seed.is_relative() {
                    *seed = base.join(&*seed);
                }
            }
        }

        Ok(config)
    }

    /// Apply `FIXCHAIN_SNAPSHOT_DIR` / `FIXCHAIN_SEED` if set and non-empty
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_SNAPSHOT_DIR).filter(|v| !v.is_empty()) {
            self.snapshot_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup(ENV_SEED).filter(|v| !v.is_empty()) {
            self.seed = Some(PathBuf::from(seed));
        }
        self
    }

    /// `snapshot_dir/<prefix><label>.<ext>`
    pub fn snapshot_path(&self, label: &SnapshotLabel) -> PathBuf {
        let mut name = format!("{}{}", self.file_prefix, label);
        if !self.file_extension.is_empty() {
            name.push('.');
            name.push_str(&self.file_extension);
        }
        self.snapshot_dir.join(name)
    }
}
