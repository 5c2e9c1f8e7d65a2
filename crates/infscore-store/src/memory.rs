use std::sync::RwLock;

use chrono::Utc;
use infscore_core::{AnalysisRecord, RecordDraft};

use crate::{rank, RankingsFilter, RankingsStore, StoreError, UpsertKind, UpsertOutcome};

/// Process-local rankings table.
///
/// Records live in insertion order; an update replaces the record in place so
/// it keeps its original position for tie-breaking.
#[derive(Debug, Default)]
pub struct InMemoryRankingsStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryRankingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-built records. Later duplicates of an id are dropped.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = AnalysisRecord>) -> Self {
        let mut table: Vec<AnalysisRecord> = Vec::new();
        for record in records {
            if table.iter().any(|r| r.id == record.id) {
                tracing::warn!(id = %record.id, "skipping duplicate seed record");
                continue;
            }
            table.push(record);
        }
        Self {
            records: RwLock::new(table),
        }
    }
}

impl RankingsStore for InMemoryRankingsStore {
    fn read_all(&self, filter: &RankingsFilter) -> Result<Vec<AnalysisRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rank(records.iter().filter(|r| filter.matches(r)).cloned()))
    }

    fn upsert(&self, draft: RecordDraft) -> Result<UpsertOutcome, StoreError> {
        let key = draft.key().ok_or(StoreError::MissingFields)?;
        let now = Utc::now();

        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let existing = records.iter().position(|r| r.id == key.id);
        let id = key.id.clone();

        let kind = match existing {
            Some(index) => {
                let first_seen = records[index].first_appearance_date;
                records[index] = draft.into_record(key, first_seen, now);
                UpsertKind::Updated
            }
            None => {
                records.push(draft.into_record(key, now, now));
                UpsertKind::Inserted
            }
        };

        Ok(UpsertOutcome {
            id,
            kind,
            current_count: records.len(),
            written_at: now,
        })
    }

    fn len(&self) -> Result<usize, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use serde_json::json;

    use super::*;

    fn draft(name: &str, platform: &str, credibility: Option<f64>) -> RecordDraft {
        RecordDraft {
            name: Some(name.to_string()),
            platform: Some(platform.to_string()),
            credibility_score: credibility,
            ..RecordDraft::default()
        }
    }

    fn names(records: &[AnalysisRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn insert_then_update_keeps_one_record() {
        let store = InMemoryRankingsStore::new();

        let first = store.upsert(draft("Test User", "YouTube", Some(8.5))).unwrap();
        assert_eq!(first.kind, UpsertKind::Inserted);
        assert_eq!(first.id, "test-user-youtube");
        assert_eq!(first.current_count, 1);
        let created = store.read_all(&RankingsFilter::default()).unwrap()[0].first_appearance_date;

        let second = store.upsert(draft("test  user", "youtube", Some(3.0))).unwrap();
        assert_eq!(second.kind, UpsertKind::Updated);
        assert_eq!(second.id, "test-user-youtube");
        assert_eq!(second.current_count, 1);

        let all = store.read_all(&RankingsFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].credibility_score, Some(3.0));
        assert_eq!(all[0].first_appearance_date, created);
        assert!(all[0].updated_at >= created);
    }

    #[test]
    fn update_replaces_every_other_field() {
        let store = InMemoryRankingsStore::new();
        let mut rich = draft("A", "YouTube", Some(5.0));
        rich.niche = Some("Gaming".into());
        rich.engagement_score = Some(9.0);
        store.upsert(rich).unwrap();

        store.upsert(draft("A", "YouTube", Some(6.0))).unwrap();

        let record = &store.read_all(&RankingsFilter::default()).unwrap()[0];
        assert_eq!(record.niche, "General");
        assert_eq!(record.engagement_score, None);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let store = InMemoryRankingsStore::new();
        let err = store.upsert(draft("  ", "YouTube", Some(5.0))).unwrap_err();
        assert!(matches!(err, StoreError::MissingFields));
        let err = store
            .upsert(RecordDraft {
                name: Some("A".into()),
                ..RecordDraft::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingFields));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn read_all_sorts_descending_and_skips_unscored() {
        let store = InMemoryRankingsStore::new();
        store.upsert(draft("Low", "YouTube", Some(2.0))).unwrap();
        store.upsert(draft("Unscored", "YouTube", None)).unwrap();
        store.upsert(draft("High", "TikTok", Some(9.5))).unwrap();
        store.upsert(draft("Zero", "Twitter", Some(0.0))).unwrap();

        let ranked = store.read_all(&RankingsFilter::default()).unwrap();
        assert_eq!(names(&ranked), vec!["High", "Low", "Zero"]);
        assert_eq!(store.len().unwrap(), 4);
    }

    #[test]
    fn ties_keep_insertion_order_across_updates() {
        let store = InMemoryRankingsStore::new();
        store.upsert(draft("First", "YouTube", Some(7.0))).unwrap();
        store.upsert(draft("Second", "YouTube", Some(7.0))).unwrap();
        store.upsert(draft("Third", "YouTube", Some(7.0))).unwrap();
        store.upsert(draft("First", "YouTube", Some(7.0))).unwrap();

        let ranked = store.read_all(&RankingsFilter::default()).unwrap();
        assert_eq!(names(&ranked), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn lowering_a_score_moves_record_down() {
        let store = InMemoryRankingsStore::new();
        store.upsert(draft("Test User", "YouTube", Some(8.5))).unwrap();
        store.upsert(draft("Other", "TikTok", Some(6.0))).unwrap();
        assert_eq!(
            names(&store.read_all(&RankingsFilter::default()).unwrap()),
            vec!["Test User", "Other"]
        );

        store.upsert(draft("Test User", "YouTube", Some(3.0))).unwrap();
        assert_eq!(
            names(&store.read_all(&RankingsFilter::default()).unwrap()),
            vec!["Other", "Test User"]
        );
    }

    #[test]
    fn platform_filter_is_case_insensitive() {
        let store = InMemoryRankingsStore::new();
        store.upsert(draft("A", "YouTube", Some(5.0))).unwrap();
        store.upsert(draft("B", "TikTok", Some(6.0))).unwrap();

        let filter = RankingsFilter {
            platform: Some("youtube".into()),
        };
        assert_eq!(names(&store.read_all(&filter).unwrap()), vec!["A"]);

        let blank = RankingsFilter {
            platform: Some("  ".into()),
        };
        assert_eq!(store.read_all(&blank).unwrap().len(), 2);
    }

    #[test]
    fn scores_from_json_are_clamped_or_unknown() {
        let store = InMemoryRankingsStore::new();
        let body: RecordDraft = serde_json::from_value(json!({
            "name": "Clamp",
            "platform": "YouTube",
            "credibilityScore": 18,
            "contentQualityScore": "abc"
        }))
        .unwrap();
        store.upsert(body).unwrap();

        let record = &store.read_all(&RankingsFilter::default()).unwrap()[0];
        assert_eq!(record.credibility_score, Some(10.0));
        assert_eq!(record.content_quality_score, None);
    }

    #[test]
    fn with_records_preserves_seed_timestamps_and_drops_duplicates() {
        let now = Utc::now();
        let seeds = infscore_core::default_seed_records(now);
        let charli_first_seen = seeds[1].first_appearance_date;
        let mut doubled = seeds.clone();
        doubled.extend(seeds);

        let store = InMemoryRankingsStore::with_records(doubled);
        assert_eq!(store.len().unwrap(), 2);

        store
            .upsert(draft("Charli D'Amelio", "TikTok", Some(9.9)))
            .unwrap();
        let ranked = store.read_all(&RankingsFilter::default()).unwrap();
        assert_eq!(ranked[0].name, "Charli D'Amelio");
        assert_eq!(ranked[0].first_appearance_date, charli_first_seen);
        assert!(ranked[0].first_appearance_date < now - Duration::seconds(10));
    }

    #[test]
    fn concurrent_upserts_never_duplicate() {
        let store = Arc::new(InMemoryRankingsStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .upsert(draft("Same Person", "YouTube", Some(f64::from(i))))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len().unwrap(), 1);
    }
}
