//! Snapshot manager
//!
//! Async front of the [`SnapshotRegistry`]: every method hands the file work
//! to the blocking pool and wraps the resulting connection in a [`Database`].

use crate::blocking::run_blocking;
use crate::database::Database;
use fixchain_core::{HarnessConfig, SnapshotLabel};
use fixchain_store::{Result, SnapshotRegistry};

#[derive(Debug, Clone)]
pub struct SnapshotManager {
    registry: SnapshotRegistry,
}

impl SnapshotManager {
    pub fn new(config: HarnessConfig) -> Self {
        Self::from_registry(SnapshotRegistry::new(config))
    }

    /// Share an existing registry, e.g. one injected by the test harness
    pub fn from_registry(registry: SnapshotRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SnapshotRegistry {
        &self.registry
    }

    pub fn config(&self) -> &HarnessConfig {
        self.registry.config()
    }

    /// Materialize `label` from `parent` and open it
    ///
    /// With a parent, its file is copied byte-for-byte to the label's path.
    /// Without one, the label is provisioned from the configured seed. Either
    /// way an existing file for `label` is replaced.
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound` if the parent file (or seed fixture) is missing
    /// - `CopyFailed` if the copy cannot complete
    /// - `OpenFailed` if the result is not a valid database image
    /// - `SnapshotInUse` if `label` is still open
    /// - `InvalidInput` if `parent` is `label`
    pub async fn open_from_existing(
        &self,
        parent: Option<&SnapshotLabel>,
        label: &SnapshotLabel,
    ) -> Result<Database> {
        let registry = self.registry.clone();
        let parent = parent.cloned();
        let label = label.clone();

        let snapshot = run_blocking("open_from_existing", move || match parent {
            Some(parent) => registry.fork(&parent, &label),
            None => registry.provision_seed(&label),
        })
        .await?;

        Ok(Database::new(snapshot))
    }

    /// Bootstrap snapshot of a chain, provisioned from the seed
    ///
    /// # Errors
    ///
    /// As for [`open_from_existing`](Self::open_from_existing) without a
    /// parent; a failing bootstrap script surfaces as `ExecutionError`.
    pub async fn open_seed(&self, label: &SnapshotLabel) -> Result<Database> {
        self.open_from_existing(None, label).await
    }

    /// Reopen a materialized snapshot in place, without copying
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound`, `SnapshotInUse`, `OpenFailed`
    pub async fn open_existing(&self, label: &SnapshotLabel) -> Result<Database> {
        let registry = self.registry.clone();
        let label = label.clone();

        let snapshot = run_blocking("open_existing", move || registry.open_existing(&label)).await?;
        Ok(Database::new(snapshot))
    }

    /// SHA-256 hex digest of a snapshot file
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound` if the file is missing
    pub async fn digest(&self, label: &SnapshotLabel) -> Result<String> {
        let registry = self.registry.clone();
        let label = label.clone();
        run_blocking("digest_snapshot", move || registry.digest(&label)).await
    }
}
