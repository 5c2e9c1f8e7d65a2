use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::score::{clamp_score, deserialize_score};

pub const DEFAULT_NICHE: &str = "General";
pub const DEFAULT_AUDIENCE: &str = "Unknown";

/// Score history for the leaderboard sparkline; `dates[i]` pairs with `scores[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub scores: Vec<f64>,
}

/// One stored influencer analysis, keyed by [`record_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub name: String,
    pub platform: String,
    /// First time this (name, platform) pair was stored. Never changes.
    pub first_appearance_date: DateTime<Utc>,
    /// Last write, as milliseconds since the epoch on the wire.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    pub credibility_score: Option<f64>,
    pub audience_authenticity_score: Option<f64>,
    pub content_quality_score: Option<f64>,
    pub brand_alignment_score: Option<f64>,
    pub engagement_score: Option<f64>,
    pub overall_analysis: String,
    pub niche: String,
    pub audience: String,
    pub consistency_score: Option<f64>,
    pub career_length: Option<String>,
    pub trends_over_time: TrendSeries,
}

/// A partial record as submitted by clients or seed files.
///
/// Scores accept any JSON value and are validated on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub credibility_score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub audience_authenticity_score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub content_quality_score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub brand_alignment_score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub overall_analysis: Option<String>,
    #[serde(default)]
    pub niche: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub consistency_score: Option<f64>,
    #[serde(default)]
    pub career_length: Option<String>,
    #[serde(default)]
    pub trends_over_time: Option<TrendSeries>,
}

/// Identity of a draft once its required fields are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub id: String,
    pub name: String,
    pub platform: String,
}

/// Derive the record identifier from a name and platform.
///
/// Both are trimmed and lower-cased; whitespace runs inside the name become a
/// single hyphen. Returns `None` if either part is blank.
///
/// ```
/// assert_eq!(
///     infscore_core::record_id("  Test   User ", "YouTube").as_deref(),
///     Some("test-user-youtube")
/// );
/// ```
#[must_use]
pub fn record_id(name: &str, platform: &str) -> Option<String> {
    let name = name.trim();
    let platform = platform.trim();
    if name.is_empty() || platform.is_empty() {
        return None;
    }
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    Some(format!("{slug}-{}", platform.to_lowercase()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RecordDraft {
    /// The record identity, or `None` when name or platform is missing or blank.
    #[must_use]
    pub fn key(&self) -> Option<RecordKey> {
        let name = self.name.as_deref()?;
        let platform = self.platform.as_deref()?;
        let id = record_id(name, platform)?;
        Some(RecordKey {
            id,
            name: name.trim().to_string(),
            platform: platform.trim().to_string(),
        })
    }

    /// Materialise a full record, applying the documented defaults.
    #[must_use]
    pub fn into_record(
        self,
        key: RecordKey,
        first_appearance_date: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AnalysisRecord {
        AnalysisRecord {
            id: key.id,
            name: key.name,
            platform: key.platform,
            first_appearance_date,
            updated_at,
            credibility_score: self.credibility_score.and_then(clamp_score),
            audience_authenticity_score: self.audience_authenticity_score.and_then(clamp_score),
            content_quality_score: self.content_quality_score.and_then(clamp_score),
            brand_alignment_score: self.brand_alignment_score.and_then(clamp_score),
            engagement_score: self.engagement_score.and_then(clamp_score),
            overall_analysis: self.overall_analysis.unwrap_or_default(),
            niche: non_blank(self.niche).unwrap_or_else(|| DEFAULT_NICHE.to_string()),
            audience: non_blank(self.audience).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            consistency_score: self.consistency_score.and_then(clamp_score),
            career_length: non_blank(self.career_length),
            trends_over_time: self.trends_over_time.unwrap_or_default(),
        }
    }
}
