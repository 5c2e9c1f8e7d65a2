use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use infscore_core::derive::ALL_PLATFORMS;
use infscore_core::{AnalysisRecord, RecordDraft};
use infscore_store::{RankingsFilter, StoreError, UpsertKind};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct RankingsQuery {
    pub nocache: Option<String>,
    pub platform: Option<String>,
}

impl RankingsQuery {
    fn nocache(&self) -> bool {
        self.nocache
            .as_deref()
            .is_some_and(|v| matches!(v.trim(), "" | "1" | "true" | "yes"))
    }

    fn filter(&self) -> RankingsFilter {
        RankingsFilter {
            platform: self
                .platform
                .clone()
                .filter(|p| !p.trim().eq_ignore_ascii_case(ALL_PLATFORMS)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RankingsResponse {
    results: Vec<AnalysisRecord>,
    timestamp: i64,
    server_uptime: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveResponse {
    success: bool,
    id: String,
    timestamp: i64,
    message: &'static str,
    current_count: usize,
}

pub(super) async fn list_rankings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RankingsQuery>,
) -> Result<Json<RankingsResponse>, ApiError> {
    let results = state.store.read_all(&query.filter()).map_err(|e| {
        tracing::error!(request_id = %req_id.0, error = %e, "rankings read failed");
        ApiError::flat(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to fetch rankings: {e}"),
        )
    })?;

    tracing::info!(
        request_id = %req_id.0,
        count = results.len(),
        nocache = query.nocache(),
        "serving rankings"
    );

    Ok(Json(RankingsResponse {
        results,
        timestamp: Utc::now().timestamp_millis(),
        server_uptime: u64::try_from(state.started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
    }))
}

pub(super) async fn save_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<RecordDraft>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(draft) = body.map_err(|rejection| {
        tracing::warn!(
            request_id = %req_id.0,
            error = %rejection.body_text(),
            "rankings body rejected"
        );
        ApiError::flat(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    let outcome = state.store.upsert(draft).map_err(|e| match &e {
        StoreError::MissingFields => {
            tracing::warn!(request_id = %req_id.0, "rankings submission missing name or platform");
            ApiError::flat(StatusCode::BAD_REQUEST, "Missing required fields")
        }
        StoreError::Poisoned => {
            tracing::error!(request_id = %req_id.0, error = %e, "rankings write failed");
            ApiError::flat(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to save analysis: {e}"),
            )
        }
    })?;

    let message = match outcome.kind {
        UpsertKind::Inserted => "Added new influencer",
        UpsertKind::Updated => "Updated existing influencer",
    };
    tracing::info!(
        request_id = %req_id.0,
        id = %outcome.id,
        kind = ?outcome.kind,
        count = outcome.current_count,
        "rankings upsert"
    );

    Ok(Json(SaveResponse {
        success: true,
        id: outcome.id,
        timestamp: outcome.written_at.timestamp_millis(),
        message,
        current_count: outcome.current_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(nocache: Option<&str>, platform: Option<&str>) -> RankingsQuery {
        RankingsQuery {
            nocache: nocache.map(String::from),
            platform: platform.map(String::from),
        }
    }

    #[test]
    fn nocache_accepts_common_truthy_values() {
        assert!(query(Some("true"), None).nocache());
        assert!(query(Some("1"), None).nocache());
        assert!(query(Some(""), None).nocache());
        assert!(!query(Some("false"), None).nocache());
        assert!(!query(None, None).nocache());
    }

    #[test]
    fn all_platforms_means_no_filter() {
        assert!(query(None, Some("All Platforms")).filter().platform.is_none());
        assert_eq!(
            query(None, Some("TikTok")).filter().platform.as_deref(),
            Some("TikTok")
        );
    }
}
