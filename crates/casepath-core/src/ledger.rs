//! # Progress Ledger
//!
//! The caller-owned, append-only list of stage results for one candidate.
//!
//! The evaluator only ever borrows the ledger as a slice. Appending is the
//! one mutation, and it validates the result first.

use crate::primitives::MAX_LEDGER_ENTRIES;
use crate::{CasepathError, Stage, StageResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLedger {
    results: Vec<StageResult>,
}

impl ProgressLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from existing results, validating each one.
    pub fn from_results(results: Vec<StageResult>) -> Result<Self, CasepathError> {
        let ledger = Self { results };
        ledger.validate()?;
        Ok(ledger)
    }

    /// Append a graded result.
    pub fn record(&mut self, result: StageResult) -> Result<(), CasepathError> {
        result.validate()?;
        if self.results.len() >= MAX_LEDGER_ENTRIES {
            return Err(CasepathError::LedgerFull(self.results.len()));
        }
        self.results.push(result);
        Ok(())
    }

    /// Re-check every entry and the size bound.
    pub fn validate(&self) -> Result<(), CasepathError> {
        if self.results.len() > MAX_LEDGER_ENTRIES {
            return Err(CasepathError::LedgerFull(self.results.len()));
        }
        self.results.iter().try_for_each(StageResult::validate)
    }

    #[must_use]
    pub fn results(&self) -> &[StageResult] {
        &self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Most recently recorded result.
    #[must_use]
    pub fn latest(&self) -> Option<&StageResult> {
        self.results.last()
    }

    /// Most recent result for `stage`.
    #[must_use]
    pub fn latest_for(&self, stage: Stage) -> Option<&StageResult> {
        self.results.iter().rev().find(|r| r.stage() == stage)
    }

    /// Number of attempts recorded for `stage`.
    #[must_use]
    pub fn attempts(&self, stage: Stage) -> usize {
        self.results.iter().filter(|r| r.stage() == stage).count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
