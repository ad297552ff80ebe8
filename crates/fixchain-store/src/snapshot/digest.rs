//! Snapshot file digests
//!
//! SHA-256 over the raw file bytes. Two builds of the same chain from the
//! same seed must produce equal digests for every snapshot.

use crate::errors::{io_error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Hex-encoded SHA-256 of a file's contents
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| io_error("digest_open", e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| io_error("digest_read", e))?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_digest_is_sha256_hex() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.db");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(
            file_digest(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = file_digest(&dir.path().join("missing.db")).unwrap_err();
        assert_eq!(err.kind(), fixchain_core::ExErrorKind::Io);
    }
}
