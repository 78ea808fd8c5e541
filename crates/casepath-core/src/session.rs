//! # Session Module
//!
//! Per-candidate session records and the store that keeps them.
//!
//! ## Storage Backends
//!
//! `ProgressStore` supports two storage backends:
//! - `InMemory`: a `BTreeMap` of records (fast, volatile unless snapshotted)
//! - `Persistent`: `RedbStore` for disk-backed ACID storage
//!
//! The store never computes statuses. Callers load a record, hand its ledger
//! to a `JourneyEvaluator`, and save it back after appending.

use crate::catalog::StageCatalog;
use crate::checklist::PreparationChecklist;
use crate::ledger::ProgressLedger;
use crate::preparation::PreparationProgress;
use crate::progression::{JourneyEvaluator, JourneyOverview};
use crate::storage::RedbStore;
use crate::{CasepathError, CompanyPath, SessionId, Stage, StageResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// SESSION RECORD
// =============================================================================

/// Everything persisted for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub company: Option<CompanyPath>,
    /// Externally designated current stage. Never advanced automatically.
    pub current_stage: Option<Stage>,
    pub ledger: ProgressLedger,
    pub preparation: BTreeMap<Stage, PreparationProgress>,
    pub checklists: BTreeMap<Stage, PreparationChecklist>,
}

impl SessionRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            company: None,
            current_stage: None,
            ledger: ProgressLedger::new(),
            preparation: BTreeMap::new(),
            checklists: BTreeMap::new(),
        }
    }

    /// Re-check the invariants a decoded record must satisfy.
    pub fn validate(&self) -> Result<(), CasepathError> {
        SessionId::new(self.session_id.as_str())?;
        self.ledger.validate()
    }

    /// The ledger as the slice the evaluator borrows.
    #[must_use]
    pub fn results(&self) -> &[StageResult] {
        self.ledger.results()
    }

    /// Append a graded result to the ledger.
    pub fn record_result(&mut self, result: StageResult) -> Result<(), CasepathError> {
        self.ledger.record(result)
    }

    /// Point the session at `stage`, which must belong to `catalog`.
    pub fn set_current(
        &mut self,
        catalog: &StageCatalog,
        stage: Option<Stage>,
    ) -> Result<(), CasepathError> {
        if let Some(stage) = stage {
            catalog.require(stage)?;
        }
        self.current_stage = stage;
        Ok(())
    }

    /// Preparation state for `stage` (empty if never started).
    #[must_use]
    pub fn preparation_for(&self, stage: Stage) -> PreparationProgress {
        self.preparation.get(&stage).cloned().unwrap_or_default()
    }

    /// Mutable preparation state for `stage`, created on first use.
    pub fn preparation_mut(&mut self, stage: Stage) -> &mut PreparationProgress {
        self.preparation.entry(stage).or_default()
    }

    /// Checklist for `stage` (nothing checked if never touched).
    #[must_use]
    pub fn checklist_for(&self, stage: Stage) -> PreparationChecklist {
        self.checklists.get(&stage).cloned().unwrap_or_default()
    }

    pub fn checklist_mut(&mut self, stage: Stage) -> &mut PreparationChecklist {
        self.checklists.entry(stage).or_default()
    }

    /// Journey overview computed from this record alone.
    #[must_use]
    pub fn overview(&self, evaluator: &JourneyEvaluator) -> JourneyOverview {
        evaluator.overview(self.results(), self.current_stage)
    }
}

// =============================================================================
// PROGRESS STORE
// =============================================================================

/// Storage backend for a ProgressStore.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory records (fast, volatile).
    InMemory(BTreeMap<SessionId, SessionRecord>),
    /// Disk-backed records using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(BTreeMap::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned.

/// Keyed store of session records.
#[derive(Debug, Default)]
pub struct ProgressStore {
    backend: StorageBackend,
}

impl ProgressStore {
    /// Create an empty store with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or create) a redb-backed store.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CasepathError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbStore::open(path)?),
        })
    }

    /// Build an in-memory store from snapshot records.
    ///
    /// Later records with a duplicate id replace earlier ones.
    pub fn from_snapshot(records: Vec<SessionRecord>) -> Result<Self, CasepathError> {
        let mut map = BTreeMap::new();
        for record in records {
            record.validate()?;
            map.insert(record.session_id.clone(), record);
        }
        Ok(Self {
            backend: StorageBackend::InMemory(map),
        })
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    pub fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, CasepathError> {
        match &self.backend {
            StorageBackend::InMemory(map) => Ok(map.get(id).cloned()),
            StorageBackend::Persistent(store) => store.load(id),
        }
    }

    /// Load a record, or an empty one if the session is new.
    pub fn load_or_default(&self, id: &SessionId) -> Result<SessionRecord, CasepathError> {
        Ok(self
            .load(id)?
            .unwrap_or_else(|| SessionRecord::new(id.clone())))
    }

    /// Load a record that must already exist.
    pub fn require(&self, id: &SessionId) -> Result<SessionRecord, CasepathError> {
        self.load(id)?
            .ok_or_else(|| CasepathError::SessionNotFound(id.to_string()))
    }

    pub fn save(&mut self, record: &SessionRecord) -> Result<(), CasepathError> {
        record.validate()?;
        match &mut self.backend {
            StorageBackend::InMemory(map) => {
                map.insert(record.session_id.clone(), record.clone());
                Ok(())
            }
            StorageBackend::Persistent(store) => store.save(record),
        }
    }

    /// Delete a session. Returns whether it existed.
    pub fn remove(&mut self, id: &SessionId) -> Result<bool, CasepathError> {
        match &mut self.backend {
            StorageBackend::InMemory(map) => Ok(map.remove(id).is_some()),
            StorageBackend::Persistent(store) => store.remove(id),
        }
    }

    /// Every stored session id, in key order.
    pub fn session_ids(&self) -> Result<Vec<SessionId>, CasepathError> {
        match &self.backend {
            StorageBackend::InMemory(map) => Ok(map.keys().cloned().collect()),
            StorageBackend::Persistent(store) => store.session_ids(),
        }
    }

    /// Every stored record, in key order.
    pub fn snapshot(&self) -> Result<Vec<SessionRecord>, CasepathError> {
        match &self.backend {
            StorageBackend::InMemory(map) => Ok(map.values().cloned().collect()),
            StorageBackend::Persistent(store) => store.records(),
        }
    }

    pub fn len(&self) -> Result<usize, CasepathError> {
        match &self.backend {
            StorageBackend::InMemory(map) => Ok(map.len()),
            StorageBackend::Persistent(store) => store.len(),
        }
    }

    pub fn is_empty(&self) -> Result<bool, CasepathError> {
        Ok(self.len()? == 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
