use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use infscore_relay::{RelayError, RelayRequest};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) const OUTCOME_HEADER: &str = "x-relay-outcome";

const PROCESSING_FAILED: &str = "Failed to process request. Please try again.";

#[derive(Debug, Deserialize)]
pub(super) struct RelayBody {
    /// Kept untyped so a non-string prompt is reported as an invalid prompt
    /// rather than an unreadable body.
    #[serde(default)]
    prompt: Option<serde_json::Value>,
    #[serde(default)]
    structured: Option<bool>,
}

impl RelayBody {
    fn into_request(self) -> Result<RelayRequest, RelayError> {
        let prompt = match self.prompt {
            Some(serde_json::Value::String(prompt)) => Some(prompt),
            _ => None,
        };
        RelayRequest::new(prompt, self.structured.unwrap_or(false))
    }
}

pub(super) async fn relay_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<RelayBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!(
            request_id = %req_id.0,
            error = %rejection.body_text(),
            "relay request body rejected"
        );
        ApiError::nested(StatusCode::BAD_REQUEST, PROCESSING_FAILED)
    })?;

    let request = body.into_request().map_err(|e| {
        tracing::warn!(request_id = %req_id.0, error = %e, "relay request rejected");
        ApiError::nested(StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let outcome = state.relay.relay(&request).await;
    tracing::info!(
        request_id = %req_id.0,
        outcome = outcome.label(),
        structured = request.structured(),
        "relay request finished"
    );

    let mut response = Json(outcome.to_envelope()).into_response();
    response.headers_mut().insert(
        OUTCOME_HEADER,
        HeaderValue::from_static(outcome.label()),
    );
    Ok(response)
}
