//! The analyze flow: relay, interpret, derive, save, refresh.

use infscore_core::derive::{extract_audience, extract_niche, resolve_platform};
use infscore_core::{RecordDraft, StructuredAnalysis};
use infscore_relay::influencer_prompt;

use crate::client::{RankingsPage, SaveReceipt, ServerClient};
use crate::error::ClientError;

pub const NO_ANALYSIS_PLACEHOLDER: &str = "No detailed analysis available";

/// Everything the analyze command shows the user.
#[derive(Debug)]
pub struct AnalysisReport {
    pub name: String,
    pub analysis: StructuredAnalysis,
    pub draft: RecordDraft,
    /// `None` when the save failed; the failure has been logged.
    pub receipt: Option<SaveReceipt>,
    /// `None` when the refresh failed; the failure has been logged.
    pub rankings: Option<RankingsPage>,
}

/// Turn relay content into the structured schema, keeping prose as the summary.
#[must_use]
pub fn interpret_content(content: &str) -> StructuredAnalysis {
    StructuredAnalysis::parse(content).unwrap_or_else(|| {
        tracing::warn!("relay content is not structured JSON; using it as the summary");
        StructuredAnalysis::from_raw_text(content)
    })
}

/// Build the rankings submission for an analysis.
///
/// Platform, niche and audience come from the summary text unless the user
/// fixed a platform.
#[must_use]
pub fn build_draft(name: &str, platform: Option<&str>, analysis: &StructuredAnalysis) -> RecordDraft {
    let text = analysis.overall_analysis.as_str();
    let platform = resolve_platform(platform, text);
    tracing::debug!(platform = %platform, "resolved platform for ranking");

    let overall = if text.trim().is_empty() {
        NO_ANALYSIS_PLACEHOLDER.to_string()
    } else {
        text.to_string()
    };

    RecordDraft {
        name: Some(name.to_string()),
        niche: Some(extract_niche(text, &platform)),
        audience: Some(extract_audience(text)),
        platform: Some(platform),
        credibility_score: analysis.credibility_score,
        audience_authenticity_score: analysis.audience_authenticity.score,
        content_quality_score: analysis.content_quality.score,
        brand_alignment_score: analysis.brand_alignment_potential.score,
        engagement_score: analysis.engagement_metrics.score,
        overall_analysis: Some(overall),
        ..RecordDraft::default()
    }
}

/// Run one analysis end to end.
///
/// # Errors
///
/// Returns [`ClientError::EmptyName`] for a blank name,
/// [`ClientError::NoResults`] when the relay answers without a completion, and
/// any relay error.
/// Save and refresh failures are logged and reported as `None` in the report.
pub async fn analyze(
    client: &ServerClient,
    name: &str,
    platform: Option<&str>,
) -> Result<AnalysisReport, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::EmptyName);
    }

    tracing::info!(name, "requesting structured analysis");
    let envelope = client.relay(&influencer_prompt(name), true).await?;
    let content = envelope.content().ok_or(ClientError::NoResults)?;
    let analysis = interpret_content(content);
    let draft = build_draft(name, platform, &analysis);

    let receipt = match client.save(&draft).await {
        Ok(receipt) => {
            tracing::info!(id = %receipt.id, message = %receipt.message, "analysis saved");
            Some(receipt)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to save analysis to rankings");
            None
        }
    };

    let rankings = match client.rankings(None, true).await {
        Ok(page) => Some(page),
        Err(e) => {
            tracing::error!(error = %e, "failed to refresh rankings");
            None
        }
    };

    Ok(AnalysisReport {
        name: name.to_string(),
        analysis,
        draft,
        receipt,
        rankings,
    })
}
