//! Structured analysis schema exchanged between the relay and its clients.

use serde::{Deserialize, Deserializer, Serialize};

use crate::score::deserialize_score;

pub const UNAVAILABLE_SECTION_ANALYSIS: &str =
    "Data currently unavailable due to technical issues.";

pub const UNAVAILABLE_STRUCTURED_SUMMARY: &str = "I'm sorry, I couldn't analyze this influencer at the moment. Our service is experiencing technical difficulties. Please try again later.";

pub const UNAVAILABLE_TEXT_SUMMARY: &str = "I'm sorry, I couldn't analyze this influencer at the moment. Our analysis service is experiencing technical difficulties. Please try again later or search for another influencer.";

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One scored category with its explanation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredSection {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis: String,
}

impl ScoredSection {
    fn unavailable() -> Self {
        Self {
            score: None,
            analysis: UNAVAILABLE_SECTION_ANALYSIS.to_string(),
        }
    }
}

/// The fixed JSON schema requested from the model in structured mode.
///
/// Deserialization is lenient: absent or `null` sections default to an
/// unknown score with empty analysis, and numeric-like scores are validated
/// on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnalysis {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub credibility_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience_authenticity: ScoredSection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_quality: ScoredSection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand_alignment_potential: ScoredSection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub engagement_metrics: ScoredSection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_analysis: String,
}

impl StructuredAnalysis {
    /// Parse model output, returning `None` when it is not a JSON object of this shape.
    #[must_use]
    pub fn parse(content: &str) -> Option<Self> {
        serde_json::from_str(content.trim()).ok()
    }

    /// Wrap unstructured text: every score unknown, the text becomes the summary.
    #[must_use]
    pub fn from_raw_text(text: impl Into<String>) -> Self {
        Self {
            overall_analysis: text.into(),
            ..Self::default()
        }
    }

    /// Payload returned when every upstream model attempt failed.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            credibility_score: None,
            audience_authenticity: ScoredSection::unavailable(),
            content_quality: ScoredSection::unavailable(),
            brand_alignment_potential: ScoredSection::unavailable(),
            engagement_metrics: ScoredSection::unavailable(),
            overall_analysis: UNAVAILABLE_STRUCTURED_SUMMARY.to_string(),
        }
    }

    /// `true` when none of the five scores is known.
    #[must_use]
    pub fn has_no_scores(&self) -> bool {
        self.credibility_score.is_none()
            && self.audience_authenticity.score.is_none()
            && self.content_quality.score.is_none()
            && self.brand_alignment_potential.score.is_none()
            && self.engagement_metrics.score.is_none()
    }
}
