use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::records::{AnalysisRecord, RecordDraft};
use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub rankings: Vec<RecordDraft>,
}

/// Built-in leaderboard entries so a fresh process never shows an empty board.
#[must_use]
pub fn default_seed_records(now: DateTime<Utc>) -> Vec<AnalysisRecord> {
    let mr_beast = RecordDraft {
        name: Some("MrBeast".into()),
        platform: Some("YouTube".into()),
        credibility_score: Some(8.0),
        audience_authenticity_score: Some(9.0),
        content_quality_score: Some(9.0),
        brand_alignment_score: Some(7.0),
        engagement_score: Some(9.0),
        overall_analysis: Some(
            "MrBeast is a social media phenomenon, with a massive following across multiple \
             platforms. His unique content style, generosity, and philanthropic efforts have \
             earned him a highly engaged and authentic audience."
                .into(),
        ),
        niche: Some("Entertainment".into()),
        audience: Some("100M+".into()),
        consistency_score: Some(8.5),
        career_length: Some("Established".into()),
        trends_over_time: None,
    };
    let charli = RecordDraft {
        name: Some("Charli D'Amelio".into()),
        platform: Some("TikTok".into()),
        credibility_score: Some(7.0),
        audience_authenticity_score: Some(7.0),
        content_quality_score: Some(7.0),
        brand_alignment_score: Some(8.0),
        engagement_score: Some(8.0),
        overall_analysis: Some(
            "Charli D'Amelio is one of TikTok's biggest stars known for dance videos and \
             engaging content. She has built a strong following primarily among Gen Z users."
                .into(),
        ),
        niche: Some("Dance".into()),
        audience: Some("50M+".into()),
        consistency_score: Some(7.5),
        career_length: Some("Rising Star".into()),
        trends_over_time: None,
    };

    [
        (mr_beast, now, now),
        (
            charli,
            now - Duration::seconds(1_000),
            now - Duration::seconds(100),
        ),
    ]
    .into_iter()
    .filter_map(|(draft, first_seen, updated)| {
        let key = draft.key()?;
        Some(draft.into_record(key, first_seen, updated))
    })
    .collect()
}

/// Load seed records from a YAML file with a top-level `rankings` list.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_records(path: &Path, now: DateTime<Utc>) -> Result<Vec<AnalysisRecord>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed_records(&content, now)
}

fn parse_seed_records(content: &str, now: DateTime<Utc>) -> Result<Vec<AnalysisRecord>, ConfigError> {
    let seed_file: SeedFile = serde_yaml::from_str(content).map_err(ConfigError::SeedFileParse)?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(seed_file.rankings.len());
    for (index, draft) in seed_file.rankings.into_iter().enumerate() {
        let key = draft.key().ok_or_else(|| {
            ConfigError::Validation(format!(
                "seed entry {index} must have a non-empty name and platform"
            ))
        })?;
        if !seen.insert(key.id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate seed entry: '{}'",
                key.id
            )));
        }
        records.push(draft.into_record(key, now, now));
    }
    Ok(records)
}
