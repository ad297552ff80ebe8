//! Seed fixtures
//!
//! The first snapshot of a chain has no parent. It is provisioned from a
//! seed instead: a database file copied byte-for-byte, a bootstrap SQL
//! script executed into a fresh file, or nothing at all (empty database).

use crate::db;
use crate::errors::{copy_failed, snapshot_not_found, Result};
use crate::executor;
use crate::snapshot::copy::{discard, ensure_parent_dir, install, replace_with_copy, temp_path_for};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Label used in errors about the seed itself
pub const SEED_LABEL: &str = "<seed>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    /// Schema-empty database
    Empty,
    /// Existing database image
    DatabaseFile(PathBuf),
    /// Bootstrap script run against a fresh database
    SqlScript(PathBuf),
}

impl SeedSource {
    /// Pick the seed kind from a configured path: `.sql` is a script,
    /// anything else a database file
    pub fn from_config(seed: Option<&Path>) -> Self {
        match seed {
            None => SeedSource::Empty,
            Some(p) if has_sql_extension(p) => SeedSource::SqlScript(p.to_path_buf()),
            Some(p) => SeedSource::DatabaseFile(p.to_path_buf()),
        }
    }

    /// Materialize the seed at `target`, replacing any existing file
    pub fn provision(&self, label: &str, target: &Path) -> Result<()> {
        match self {
            SeedSource::Empty => build_from_script(label, "", target),
            SeedSource::DatabaseFile(source) => {
                if !source.is_file() {
                    return Err(snapshot_not_found(SEED_LABEL, source));
                }
                replace_with_copy(label, source, target).map(|_| ())
            }
            SeedSource::SqlScript(script) => {
                let sql = fs::read_to_string(script).map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        snapshot_not_found(SEED_LABEL, script)
                    } else {
                        copy_failed(SEED_LABEL, script, e)
                    }
                })?;
                build_from_script(label, &sql, target)
            }
        }
    }
}

fn has_sql_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("sql"))
        .unwrap_or(false)
}

fn build_from_script(label: &str, sql: &str, target: &Path) -> Result<()> {
    ensure_parent_dir(label, target)?;

    let temp = temp_path_for(target);
    discard(&temp);

    let result = db::create_database(&temp).and_then(|conn| {
        executor::execute(&conn, sql)?;
        db::close(conn, &temp)?;
        // an untouched database may never have been written; a zero-length
        // file is a valid empty image
        if !temp.exists() {
            fs::File::create(&temp).map_err(|e| copy_failed(label, &temp, e))?;
        }
        Ok(())
    });
    if let Err(e) = result {
        discard(&temp);
        return Err(e);
    }

    install(label, &temp, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixchain_core::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_from_config() {
        assert_eq!(SeedSource::from_config(None), SeedSource::Empty);
        assert_eq!(
            SeedSource::from_config(Some(Path::new("fixtures/seed.SQL"))),
            SeedSource::SqlScript(PathBuf::from("fixtures/seed.SQL"))
        );
        assert_eq!(
            SeedSource::from_config(Some(Path::new("fixtures/seed.db"))),
            SeedSource::DatabaseFile(PathBuf::from("fixtures/seed.db"))
        );
    }

    #[test]
    fn test_script_seed_builds_database() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("seed.sql");
        fs::write(
            &script,
            "CREATE TABLE actors (id TEXT PRIMARY KEY, full_name TEXT);
             INSERT INTO actors VALUES ('34', 'Someone');",
        )
        .unwrap();
        let target = dir.path().join("01.db");

        SeedSource::SqlScript(script).provision("01", &target).unwrap();

        let conn = db::open_snapshot(&target).unwrap();
        let row = executor::select_single_row(&conn, "SELECT full_name FROM actors").unwrap();
        assert_eq!(row.get("full_name").and_then(|v| v.as_str()), Some("Someone"));
        assert!(!temp_path_for(&target).exists());
    }

    #[test]
    fn test_failing_script_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("seed.sql");
        fs::write(&script, "CREATE TABLE t (id); INSERT INTO missing VALUES (1);").unwrap();
        let target = dir.path().join("01.db");

        let err = SeedSource::SqlScript(script).provision("01", &target).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::ExecutionError);
        assert!(!target.exists());
        assert!(!temp_path_for(&target).exists());
    }

    #[test]
    fn test_missing_seed_is_snapshot_not_found() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("01.db");

        for seed in [
            SeedSource::SqlScript(dir.path().join("nope.sql")),
            SeedSource::DatabaseFile(dir.path().join("nope.db")),
        ] {
            let err = seed.provision("01", &target).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::SnapshotNotFound);
            assert_eq!(err.label(), Some(SEED_LABEL));
        }
    }

    #[test]
    fn test_empty_seed_opens() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("01.db");

        SeedSource::Empty.provision("01", &target).unwrap();
        db::open_snapshot(&target).unwrap();
    }
}
