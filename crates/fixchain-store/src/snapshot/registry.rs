//! Snapshot registry
//!
//! The chain of snapshot files is shared, mutable, on-disk state. The
//! registry makes it explicit: a cloneable handle mapping each label to its
//! file, injected into every suite that needs a snapshot, plus the set of
//! labels that currently have a live connection.

use crate::db;
use crate::errors::{snapshot_in_use, snapshot_not_found, Result};
use crate::seed::SeedSource;
use crate::snapshot::copy::replace_with_copy;
use crate::snapshot::digest::file_digest;
use fixchain_core::errors::{ExError, ExErrorKind};
use fixchain_core::{log_op_end, log_op_error, log_op_start};
use fixchain_core::{HarnessConfig, SnapshotLabel};
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// One materialized snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub label: SnapshotLabel,
    pub path: PathBuf,
    /// `None` for seed-provisioned snapshots, and for snapshots found on
    /// disk from an earlier run whose parent is unknown
    pub parent: Option<SnapshotLabel>,
}

#[derive(Debug, Default)]
struct RegistryState {
    records: BTreeMap<SnapshotLabel, SnapshotRecord>,
    open: BTreeSet<SnapshotLabel>,
}

/// Marks a label as having a live connection until dropped
#[derive(Debug)]
pub struct OpenLease {
    label: SnapshotLabel,
    state: Arc<Mutex<RegistryState>>,
}

impl OpenLease {
    pub fn label(&self) -> &SnapshotLabel {
        &self.label
    }
}

impl Drop for OpenLease {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.open.remove(&self.label);
        tracing::debug!(label = %self.label, "released snapshot lease");
    }
}

/// A snapshot with its connection, ready for statements
#[derive(Debug)]
pub struct OpenSnapshot {
    pub record: SnapshotRecord,
    pub conn: Connection,
    pub lease: OpenLease,
}

/// Label → file registry for one chain
#[derive(Debug, Clone)]
pub struct SnapshotRegistry {
    config: Arc<HarnessConfig>,
    seed: SeedSource,
    state: Arc<Mutex<RegistryState>>,
}

impl SnapshotRegistry {
    pub fn new(config: HarnessConfig) -> Self {
        let seed = SeedSource::from_config(config.seed.as_deref());
        Self {
            config: Arc::new(config),
            seed,
            state: Arc::new(Mutex::new(RegistryState::default())),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn seed(&self) -> &SeedSource {
        &self.seed
    }

    /// File a label maps to, whether or not it exists yet
    pub fn path_for(&self, label: &SnapshotLabel) -> PathBuf {
        self.config.snapshot_path(label)
    }

    /// Registered record for a label, if this registry materialized it
    pub fn record(&self, label: &SnapshotLabel) -> Option<SnapshotRecord> {
        self.lock().records.get(label).cloned()
    }

    /// Every registered record, ordered by label
    pub fn records(&self) -> Vec<SnapshotRecord> {
        self.lock().records.values().cloned().collect()
    }

    pub fn is_open(&self, label: &SnapshotLabel) -> bool {
        self.lock().open.contains(label)
    }

    /// Find an existing snapshot
    ///
    /// Labels materialized by this registry resolve to their record; any
    /// other label resolves if its file exists on disk (a snapshot built by
    /// an earlier step or process).
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound` if the snapshot file does not exist
    pub fn resolve(&self, label: &SnapshotLabel) -> Result<SnapshotRecord> {
        let record = self.record(label).unwrap_or_else(|| SnapshotRecord {
            label: label.clone(),
            path: self.path_for(label),
            parent: None,
        });

        if !record.path.is_file() {
            return Err(snapshot_not_found(label.as_str(), &record.path));
        }
        Ok(record)
    }

    /// Take the lease for a label
    ///
    /// # Errors
    ///
    /// - `SnapshotInUse` if another connection to the label is live
    pub fn acquire(&self, label: &SnapshotLabel) -> Result<OpenLease> {
        let mut state = self.lock();
        if !state.open.insert(label.clone()) {
            return Err(snapshot_in_use(label.as_str()));
        }
        Ok(OpenLease {
            label: label.clone(),
            state: self.state.clone(),
        })
    }

    /// Fork `parent` into `label` and open it
    ///
    /// Copies the parent's file byte-for-byte to the label's path (replacing
    /// any earlier file for that label) and opens a connection to the copy.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `parent == label`
    /// - `SnapshotNotFound` if the parent file is missing
    /// - `SnapshotInUse` if `label` is open elsewhere
    /// - `CopyFailed` if the copy cannot complete
    /// - `OpenFailed` if the copy is not a valid database image
    pub fn fork(&self, parent: &SnapshotLabel, label: &SnapshotLabel) -> Result<OpenSnapshot> {
        log_op_start!(
            "fork_snapshot",
            label = label.as_str(),
            parent_label = parent.as_str()
        );
        let start = Instant::now();

        let result = self.fork_impl(parent, label).map_err(|e| {
            log_op_error!(
                "fork_snapshot",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                label = label.as_str()
            );
            e
        })?;

        log_op_end!(
            "fork_snapshot",
            duration_ms = start.elapsed().as_millis() as u64,
            label = label.as_str(),
            path = %result.record.path.display()
        );
        Ok(result)
    }

    fn fork_impl(&self, parent: &SnapshotLabel, label: &SnapshotLabel) -> Result<OpenSnapshot> {
        if parent == label {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("fork_snapshot")
                .with_label(label.as_str())
                .with_message("a snapshot cannot be forked onto itself"));
        }

        let parent_record = self.resolve(parent)?;
        let lease = self.acquire(label)?;
        let path = self.path_for(label);

        replace_with_copy(label.as_str(), &parent_record.path, &path)?;
        let conn = db::open_snapshot(&path).map_err(|e| e.with_label(label.as_str()))?;

        let record = SnapshotRecord {
            label: label.clone(),
            path,
            parent: Some(parent.clone()),
        };
        self.register(record.clone());

        Ok(OpenSnapshot {
            record,
            conn,
            lease,
        })
    }

    /// Provision `label` from the seed and open it
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound` if the seed fixture is missing
    /// - `SnapshotInUse`, `CopyFailed`, `OpenFailed` as for [`fork`](Self::fork)
    /// - `ExecutionError` if a bootstrap script fails
    pub fn provision_seed(&self, label: &SnapshotLabel) -> Result<OpenSnapshot> {
        log_op_start!("provision_seed", label = label.as_str());
        let start = Instant::now();

        let result = self.provision_seed_impl(label).map_err(|e| {
            log_op_error!(
                "provision_seed",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                label = label.as_str()
            );
            e
        })?;

        log_op_end!(
            "provision_seed",
            duration_ms = start.elapsed().as_millis() as u64,
            label = label.as_str(),
            path = %result.record.path.display()
        );
        Ok(result)
    }

    fn provision_seed_impl(&self, label: &SnapshotLabel) -> Result<OpenSnapshot> {
        let lease = self.acquire(label)?;
        let path = self.path_for(label);

        self.seed.provision(label.as_str(), &path)?;
        let conn = db::open_snapshot(&path).map_err(|e| e.with_label(label.as_str()))?;

        let record = SnapshotRecord {
            label: label.clone(),
            path,
            parent: None,
        };
        self.register(record.clone());

        Ok(OpenSnapshot {
            record,
            conn,
            lease,
        })
    }

    /// Open an existing snapshot in place, without copying
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound`, `SnapshotInUse`, `OpenFailed`
    pub fn open_existing(&self, label: &SnapshotLabel) -> Result<OpenSnapshot> {
        let record = self.resolve(label)?;
        let lease = self.acquire(label)?;
        let conn = db::open_snapshot(&record.path).map_err(|e| e.with_label(label.as_str()))?;
        tracing::debug!(label = %label, path = %record.path.display(), "opened snapshot in place");

        Ok(OpenSnapshot {
            record,
            conn,
            lease,
        })
    }

    /// SHA-256 of a snapshot's file
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound` if the file is missing, `Io` if it cannot be read
    pub fn digest(&self, label: &SnapshotLabel) -> Result<String> {
        let record = self.resolve(label)?;
        file_digest(&record.path).map_err(|e| e.with_label(label.as_str()))
    }

    fn register(&self, record: SnapshotRecord) {
        self.lock().records.insert(record.label.clone(), record);
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
