//! # Store Helpers
//!
//! Opening and flushing a `ProgressStore` for either backend.
//!
//! The redb backend persists on every save. The file backend keeps records
//! in memory and rewrites one snapshot file after each change.

use crate::config::Backend;
use casepath_core::{
    CasepathError, MAX_PERSISTENCE_PAYLOAD_SIZE, ProgressStore, snapshot_from_bytes,
    snapshot_to_bytes,
};
use std::path::Path;

/// Maximum snapshot file size accepted on load. Same ceiling the encoder enforces.
const MAX_SNAPSHOT_FILE_SIZE: u64 = MAX_PERSISTENCE_PAYLOAD_SIZE as u64;

/// Maximum size for files handed to `import` (1 MB).
pub const MAX_IMPORT_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), CasepathError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CasepathError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(CasepathError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Open the store at `db_path` with the given backend.
///
/// A missing snapshot file yields an empty store.
pub fn open_store(db_path: &Path, backend: Backend) -> Result<ProgressStore, CasepathError> {
    match backend {
        Backend::Redb => ProgressStore::with_redb(db_path),
        Backend::File => {
            if !db_path.exists() {
                return Ok(ProgressStore::new());
            }
            validate_file_size(db_path, MAX_SNAPSHOT_FILE_SIZE)?;
            let data = std::fs::read(db_path)
                .map_err(|e| CasepathError::IoError(format!("Read db: {}", e)))?;
            ProgressStore::from_snapshot(snapshot_from_bytes(&data)?)
        }
    }
}

/// Persist an in-memory store to its snapshot file.
///
/// A no-op for the redb backend, which is already durable. A snapshot too large
/// to be read back is refused before the file is touched.
pub fn flush_store(store: &ProgressStore, db_path: &Path) -> Result<(), CasepathError> {
    if store.is_persistent() {
        return Ok(());
    }
    let data = snapshot_to_bytes(&store.snapshot()?)?;
    std::fs::write(db_path, &data)
        .map_err(|e| CasepathError::IoError(format!("Write db: {}", e)))?;
    tracing::debug!("Wrote {} byte snapshot to {}", data.len(), db_path.display());
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use casepath_core::primitives::{MAX_FEEDBACK_LENGTH, MAX_LEDGER_ENTRIES};
    use casepath_core::{SessionId, SessionRecord, Stage, StageResult};
    use tempfile::tempdir;

    #[test]
    fn file_backend_roundtrip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("casepath.dat");

        let mut store = open_store(&path, Backend::File).expect("open");
        assert!(store.is_empty().expect("empty"));

        let mut record = SessionRecord::new(SessionId::new("alice").expect("id"));
        record
            .record_result(StageResult::outcome(Stage::PersonalExperience, true))
            .expect("record");
        store.save(&record).expect("save");
        flush_store(&store, &path).expect("flush");

        let reopened = open_store(&path, Backend::File).expect("reopen");
        assert_eq!(reopened.load(&record.session_id).expect("load"), Some(record));
    }

    #[test]
    fn oversized_snapshot_never_written() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("casepath.dat");
        std::fs::write(&path, b"previous").expect("seed");

        // Every record is individually valid; together they exceed the format limit.
        let feedback = "x".repeat(MAX_FEEDBACK_LENGTH);
        let mut store = ProgressStore::new();
        for name in ["a", "b", "c", "d", "e"] {
            let mut record = SessionRecord::new(SessionId::new(name).expect("id"));
            for _ in 0..MAX_LEDGER_ENTRIES {
                let result = StageResult::new(Stage::Case1, false, Vec::new(), feedback.clone())
                    .expect("valid result");
                record.record_result(result).expect("record");
            }
            store.save(&record).expect("save");
        }

        assert!(flush_store(&store, &path).is_err());
        assert_eq!(std::fs::read(&path).expect("read"), b"previous");
    }

    #[test]
    fn redb_flush_is_noop() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("casepath.redb");
        let store = open_store(&path, Backend::Redb).expect("open");
        assert!(store.is_persistent());
        flush_store(&store, &path).expect("flush");
    }

    #[test]
    fn garbage_snapshot_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("casepath.dat");
        std::fs::write(&path, b"not a snapshot").expect("write");
        assert!(open_store(&path, Backend::File).is_err());
    }
}
