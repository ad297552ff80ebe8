//! Database connection management
//!
//! Snapshot files are opened read-write without create: a snapshot must
//! already exist on disk, and it must be a database image. Journal mode is
//! left at SQLite's default (rollback journal) so the main file alone holds
//! the whole snapshot once a statement completes.
//!
//! The bundled SQLite is built with foreign-key enforcement on by default.
//! Every connection starts with it off, so enforcement follows the
//! `PRAGMA foreign_keys` statements callers pass through `execute`.

use crate::errors::{open_failed, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Open an existing snapshot file and verify it is a database image
pub fn open_snapshot(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(|e| open_failed(path, e))?;
    prepare(&conn).map_err(|e| open_failed(path, e))?;
    Ok(conn)
}

/// Create (or open) a database file, creating it if needed
pub fn create_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).map_err(|e| open_failed(path, e))?;
    prepare(&conn).map_err(|e| open_failed(path, e))?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let memory = Path::new(":memory:");
    let conn = Connection::open_in_memory().map_err(|e| open_failed(memory, e))?;
    prepare(&conn).map_err(|e| open_failed(memory, e))?;
    Ok(conn)
}

/// Close a connection, surfacing any error from the final flush
pub fn close(conn: Connection, path: &Path) -> Result<()> {
    conn.close().map_err(|(_, e)| open_failed(path, e))
}

fn prepare(conn: &Connection) -> rusqlite::Result<()> {
    verify(conn)?;
    conn.execute_batch("PRAGMA foreign_keys = OFF")
}

// Reading the schema cookie forces SQLite to parse the file header.
fn verify(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixchain_core::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_fails_without_creating_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.db");

        let err = open_snapshot(&path).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::OpenFailed);
        assert!(!path.exists());
    }

    #[test]
    fn test_open_garbage_file_is_open_failed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, vec![0x42u8; 4096]).unwrap();

        let err = open_snapshot(&path).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::OpenFailed);
    }

    fn foreign_keys(conn: &Connection) -> i64 {
        conn.query_row("PRAGMA foreign_keys", [], |r| r.get(0)).unwrap()
    }

    #[test]
    fn test_foreign_keys_start_off_on_every_open_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fk.db");

        let created = create_database(&path).unwrap();
        assert_eq!(foreign_keys(&created), 0);
        close(created, &path).unwrap();

        assert_eq!(foreign_keys(&open_snapshot(&path).unwrap()), 0);
        assert_eq!(foreign_keys(&open_in_memory().unwrap()), 0);
    }

    #[test]
    fn test_child_rows_load_before_parents_until_pragma() {
        let conn = open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE actors (id TEXT PRIMARY KEY);
             CREATE TABLE roles (actor_id TEXT NOT NULL REFERENCES actors (id));
             INSERT INTO roles VALUES ('34');
             INSERT INTO actors VALUES ('34');",
        )
        .unwrap();

        conn.execute_batch("PRAGMA foreign_keys = ON").unwrap();
        assert_eq!(foreign_keys(&conn), 1);
        assert!(conn.execute_batch("INSERT INTO roles VALUES ('404')").is_err());
    }

    #[test]
    fn test_create_then_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.db");

        let conn = create_database(&path).unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY)").unwrap();
        close(conn, &path).unwrap();

        let conn = open_snapshot(&path).unwrap();
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }
}
