mod rankings;
mod relay;


use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use infscore_relay::PromptRelay;
use infscore_store::RankingsStore;
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RankingsStore>,
    pub relay: Arc<PromptRelay>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn RankingsStore>, relay: PromptRelay) -> Self {
        Self {
            store,
            relay: Arc::new(relay),
            started_at: Instant::now(),
        }
    }
}

/// Error body shapes. The relay nests the message under `error.message`;
/// the rankings routes put the message string directly in `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    Nested,
    Flat,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub shape: ErrorShape,
    pub message: String,
}

impl ApiError {
    pub fn nested(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            shape: ErrorShape::Nested,
            message: message.into(),
        }
    }

    pub fn flat(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            shape: ErrorShape::Flat,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = match self.shape {
            ErrorShape::Nested => json!({ "error": { "message": self.message } }),
            ErrorShape::Flat => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    records: Option<usize>,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static(relay::OUTCOME_HEADER),
        ])
}

fn relay_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/analysis-relay", post(relay::relay_analysis))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route(
            "/rankings",
            get(rankings::list_rankings).post(rankings::save_analysis),
        );

    Router::new()
        .merge(public_routes)
        .merge(relay_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.len() {
        Ok(records) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                records: Some(records),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: rankings store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    records: None,
                }),
            )
        }
    }
}
