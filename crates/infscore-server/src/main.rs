mod api;
mod middleware;

use std::sync::Arc;

use chrono::Utc;
use infscore_core::{AnalysisRecord, AppConfig};
use infscore_relay::{PromptRelay, RelayConfig};
use infscore_store::{InMemoryRankingsStore, RankingsStore};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = infscore_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.llm_api_key.is_none() {
        tracing::warn!(env = %config.env, "no provider API key configured; relay calls will be unauthenticated");
    }

    let store: Arc<dyn RankingsStore> = Arc::new(InMemoryRankingsStore::with_records(
        seed_records(&config)?,
    ));
    let relay = PromptRelay::new(RelayConfig::from_app_config(&config))?;
    tracing::info!(
        models = ?relay.models(),
        records = store.len()?,
        "rankings store ready"
    );

    let app = build_app(
        AppState::new(store, relay),
        RateLimitState::per_minute(config.relay_rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn seed_records(config: &AppConfig) -> anyhow::Result<Vec<AnalysisRecord>> {
    if !config.seed_rankings {
        return Ok(Vec::new());
    }
    let now = Utc::now();
    let records = match &config.seed_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading rankings seed file");
            infscore_core::load_seed_records(path, now)?
        }
        None => infscore_core::default_seed_records(now),
    };
    Ok(records)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
