//! Connection to one snapshot
//!
//! A `Database` exclusively owns its snapshot's connection and open lease.
//! Calls on one `Database` take `&self` but are serialized on the connection
//! mutex, so statements always reach the engine in submission order.

use crate::blocking::run_blocking;
use fixchain_core::{log_op_end, log_op_error, log_op_start};
use fixchain_core::{Row, SnapshotLabel};
use fixchain_store::errors::connection_closed;
use fixchain_store::{db, executor, OpenLease, OpenSnapshot, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

#[derive(Debug)]
struct Live {
    conn: Connection,
    // released after the connection is dropped
    _lease: OpenLease,
}

#[derive(Debug)]
pub struct Database {
    label: SnapshotLabel,
    path: PathBuf,
    live: Arc<Mutex<Option<Live>>>,
}

impl Database {
    pub(crate) fn new(snapshot: OpenSnapshot) -> Self {
        let OpenSnapshot {
            record,
            conn,
            lease,
        } = snapshot;
        Self {
            label: record.label,
            path: record.path,
            live: Arc::new(Mutex::new(Some(Live {
                conn,
                _lease: lease,
            }))),
        }
    }

    pub fn label(&self) -> &SnapshotLabel {
        &self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run statement text with no result payload
    ///
    /// Completes once every statement in the text has been stepped to
    /// completion, pragmas included.
    ///
    /// # Errors
    ///
    /// - `ExecutionError` with the engine diagnostic if a statement fails or
    ///   the connection is closed
    pub async fn execute(&self, sql: impl Into<String>) -> Result<()> {
        let sql = sql.into();
        self.with_conn("execute", move |conn| executor::execute(conn, &sql))
            .await
    }

    /// Query that must yield exactly one row
    ///
    /// # Errors
    ///
    /// - `NoRowsFound` / `MultipleRowsFound` when the query matches zero or
    ///   several rows
    /// - `ExecutionError` as for [`execute`](Self::execute)
    pub async fn select_single_row(&self, sql: impl Into<String>) -> Result<Row> {
        let sql = sql.into();
        self.with_conn("select_single_row", move |conn| {
            executor::select_single_row(conn, &sql)
        })
        .await
    }

    /// Query yielding zero or more rows, in engine order
    ///
    /// # Errors
    ///
    /// - `ExecutionError` as for [`execute`](Self::execute)
    pub async fn select_multiple_rows(&self, sql: impl Into<String>) -> Result<Vec<Row>> {
        let sql = sql.into();
        self.with_conn("select_multiple_rows", move |conn| {
            executor::select_multiple_rows(conn, &sql)
        })
        .await
    }

    /// Close the connection and release the snapshot
    ///
    /// Statements issued afterwards fail with `ExecutionError`. Closing an
    /// already closed database is a no-op.
    pub async fn close(&self) -> Result<()> {
        log_op_start!("close_snapshot", label = self.label.as_str());
        let start = Instant::now();

        let live = self.live.clone();
        let path = self.path.clone();
        let result = run_blocking("close_snapshot", move || {
            let taken = live.lock().unwrap_or_else(PoisonError::into_inner).take();
            match taken {
                Some(Live { conn, _lease }) => db::close(conn, &path),
                None => Ok(()),
            }
        })
        .await;

        match result {
            Ok(()) => {
                log_op_end!(
                    "close_snapshot",
                    duration_ms = start.elapsed().as_millis() as u64,
                    label = self.label.as_str()
                );
                Ok(())
            }
            Err(e) => {
                let e = e.with_label(self.label.as_str());
                log_op_error!(
                    "close_snapshot",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    label = self.label.as_str()
                );
                Err(e)
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let live = self.live.clone();
        let label = self.label.clone();
        run_blocking(op, move || {
            let guard = live.lock().unwrap_or_else(PoisonError::into_inner);
            match guard.as_ref() {
                Some(l) => f(&l.conn),
                None => Err(connection_closed(op, label.as_str())),
            }
        })
        .await
        .map_err(|e| {
            tracing::debug!(op, label = %self.label, error = %e, "statement failed");
            e
        })
    }
}
