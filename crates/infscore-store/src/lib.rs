//! Rankings storage for influencer analyses.
//!
//! Handlers depend on the [`RankingsStore`] trait; the process wires in
//! [`InMemoryRankingsStore`], which keeps data for the process lifetime only.

mod memory;

pub use memory::InMemoryRankingsStore;

use chrono::{DateTime, Utc};
use infscore_core::{AnalysisRecord, RecordDraft};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("missing required fields: name and platform")]
    MissingFields,

    #[error("rankings table lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: String,
    pub kind: UpsertKind,
    /// Total records after the write, scored or not.
    pub current_count: usize,
    pub written_at: DateTime<Utc>,
}

/// Restricts a rankings read.
#[derive(Debug, Clone, Default)]
pub struct RankingsFilter {
    /// Keep only records on this platform (case-insensitive).
    pub platform: Option<String>,
}

impl RankingsFilter {
    fn matches(&self, record: &AnalysisRecord) -> bool {
        self.platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .is_none_or(|p| record.platform.eq_ignore_ascii_case(p))
    }
}

pub trait RankingsStore: Send + Sync {
    /// Records with a known credibility score, highest first.
    ///
    /// Equal scores keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the table cannot be read.
    fn read_all(&self, filter: &RankingsFilter) -> Result<Vec<AnalysisRecord>, StoreError>;

    /// Insert or replace the record for the draft's (name, platform) pair.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingFields`] when name or platform is blank.
    fn upsert(&self, draft: RecordDraft) -> Result<UpsertOutcome, StoreError>;

    /// Total number of records, including unscored ones.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the table cannot be read.
    fn len(&self) -> Result<usize, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the table cannot be read.
    fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }
}

/// Sort records by descending credibility, dropping those without one.
///
/// Uses a stable sort so ties keep their incoming order.
pub(crate) fn rank(records: impl IntoIterator<Item = AnalysisRecord>) -> Vec<AnalysisRecord> {
    let mut ranked: Vec<AnalysisRecord> = records
        .into_iter()
        .filter(|r| r.credibility_score.is_some())
        .collect();
    ranked.sort_by(|a, b| {
        let a = a.credibility_score.unwrap_or_default();
        let b = b.credibility_score.unwrap_or_default();
        b.total_cmp(&a)
    });
    ranked
}
