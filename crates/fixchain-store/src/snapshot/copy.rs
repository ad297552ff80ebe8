//! Snapshot file placement
//!
//! Snapshots are written to a temp sibling and renamed into place, so a
//! destination path never holds a partial copy.

use crate::errors::{copy_failed, snapshot_not_found, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Files SQLite may keep next to a database
const SIDECAR_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Temp sibling used while a snapshot file is being produced
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Copy `source` over `target` byte-for-byte, replacing whatever is there
pub fn replace_with_copy(label: &str, source: &Path, target: &Path) -> Result<u64> {
    ensure_parent_dir(label, target)?;

    let temp = temp_path_for(target);
    let bytes = match fs::copy(source, &temp) {
        Ok(bytes) => bytes,
        Err(e) => {
            discard(&temp);
            if e.kind() == ErrorKind::NotFound && !source.exists() {
                return Err(snapshot_not_found(label, source));
            }
            return Err(copy_failed(label, target, e));
        }
    };

    install(label, &temp, target)?;
    Ok(bytes)
}

/// Move a finished temp file onto `target`, dropping stale sidecars first
pub fn install(label: &str, temp: &Path, target: &Path) -> Result<()> {
    remove_sidecars(label, target)?;
    fs::rename(temp, target).map_err(|e| {
        discard(temp);
        copy_failed(label, target, e)
    })
}

pub fn ensure_parent_dir(label: &str, target: &Path) -> Result<()> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| copy_failed(label, parent, e))
        }
        _ => Ok(()),
    }
}

/// Remove `target`'s journal/WAL files so they cannot be replayed onto a
/// freshly copied image
pub fn remove_sidecars(label: &str, target: &Path) -> Result<()> {
    for suffix in SIDECAR_SUFFIXES {
        let mut name = target.as_os_str().to_os_string();
        name.push(suffix);
        let sidecar = PathBuf::from(name);
        match fs::remove_file(&sidecar) {
            Ok(()) => tracing::debug!(path = %sidecar.display(), "removed stale sidecar"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(copy_failed(label, &sidecar, e)),
        }
    }
    Ok(())
}

/// Remove a temp file left by a failed operation; errors are ignored
pub fn discard(temp: &Path) {
    let _ = fs::remove_file(temp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixchain_core::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_copy_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("05.db");
        let dst = dir.path().join("06.db");
        fs::write(&src, b"\x00\x01snapshot-bytes\xff").unwrap();

        let n = replace_with_copy("06", &src, &dst).unwrap();

        assert_eq!(n, 17);
        assert_eq!(fs::read(&dst).unwrap(), fs::read(&src).unwrap());
    }

    #[test]
    fn test_copy_overwrites_and_clears_sidecars() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("01.db");
        let dst = dir.path().join("02.db");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old contents").unwrap();
        fs::write(dir.path().join("02.db-journal"), b"stale").unwrap();

        replace_with_copy("02", &src, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"new");
        assert!(!dir.path().join("02.db-journal").exists());
        assert!(!temp_path_for(&dst).exists());
    }

    #[test]
    fn test_missing_source_is_snapshot_not_found() {
        let dir = TempDir::new().unwrap();
        let err = replace_with_copy(
            "02",
            &dir.path().join("nope.db"),
            &dir.path().join("02.db"),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::SnapshotNotFound);
        assert!(!dir.path().join("02.db").exists());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("01.db");
        fs::write(&src, b"x").unwrap();
        let dst = dir.path().join("nested").join("deeper").join("02.db");

        replace_with_copy("02", &src, &dst).unwrap();
        assert!(dst.exists());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/a/b/06.db")),
            PathBuf::from("/a/b/06.db.tmp")
        );
    }
}
