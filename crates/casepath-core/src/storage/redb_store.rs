//! # redb-backed Session Storage
//!
//! A disk-backed session store using the redb embedded database.
//!
//! Each session is one row: the session id maps to a framed
//! `SessionRecord` (see `formats`). Writes are single transactions,
//! so a crash never leaves a half-written record behind.

use crate::formats::{record_from_bytes, record_to_bytes};
use crate::session::SessionRecord;
use crate::{CasepathError, SessionId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for sessions: session id -> serialized SessionRecord bytes
const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

fn io_err(e: impl std::fmt::Display) -> CasepathError {
    CasepathError::IoError(e.to_string())
}

/// A disk-backed session store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a session database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CasepathError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize the table if it doesn't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(SESSIONS).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Load one session record.
    pub fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, CasepathError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SESSIONS).map_err(io_err)?;
        match table.get(id.as_str()).map_err(io_err)? {
            Some(bytes) => record_from_bytes(bytes.value()).map(Some),
            None => Ok(None),
        }
    }

    /// Insert or replace a session record.
    pub fn save(&mut self, record: &SessionRecord) -> Result<(), CasepathError> {
        let bytes = record_to_bytes(record)?;
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(SESSIONS).map_err(io_err)?;
            table
                .insert(record.session_id.as_str(), bytes.as_slice())
                .map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    /// Delete a session. Returns whether it existed.
    pub fn remove(&mut self, id: &SessionId) -> Result<bool, CasepathError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let existed = {
            let mut table = write_txn.open_table(SESSIONS).map_err(io_err)?;
            table.remove(id.as_str()).map_err(io_err)?.is_some()
        };
        write_txn.commit().map_err(io_err)?;
        Ok(existed)
    }

    /// All stored session ids, in key order.
    pub fn session_ids(&self) -> Result<Vec<SessionId>, CasepathError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SESSIONS).map_err(io_err)?;
        let mut ids = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (key, _) = entry.map_err(io_err)?;
            ids.push(SessionId::new(key.value())?);
        }
        Ok(ids)
    }

    /// Every stored record, in key order.
    pub fn records(&self) -> Result<Vec<SessionRecord>, CasepathError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SESSIONS).map_err(io_err)?;
        let mut records = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            records.push(record_from_bytes(value.value())?);
        }
        Ok(records)
    }

    pub fn len(&self) -> Result<usize, CasepathError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(SESSIONS).map_err(io_err)?;
        let count = table.len().map_err(io_err)?;
        usize::try_from(count).map_err(io_err)
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), CasepathError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
