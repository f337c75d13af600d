pub mod analysis;
pub mod commands;
pub mod core;
pub mod diff;
pub mod document;
pub mod providers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tracing_subscriber::EnvFilter;

use crate::commands::{coherence, compare, health, proofread, restructure};
use crate::core::{
    config::{log_filter_from_env, AppConfig},
    errors::AppResult,
};
use crate::providers::{gemini::GeminiClient, TextModel};

/// Shared per-process state handed to every handler.
pub struct AppState<M = GeminiClient> {
    config: Arc<AppConfig>,
    model: Arc<M>,
}

impl<M> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            model: Arc::clone(&self.model),
        }
    }
}

impl<M> AppState<M> {
    pub fn new(config: AppConfig, model: M) -> Self {
        Self {
            config: Arc::new(config),
            model: Arc::new(model),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

pub fn router<M>(state: AppState<M>) -> Router
where
    M: TextModel + Send + Sync + 'static,
{
    let body_limit = state.config().max_upload_bytes;
    Router::new()
        .route("/health", get(health::health::<M>))
        .route("/api/proofread/analyze", post(proofread::analyze::<M>))
        .route(
            "/api/proofread/download/revised",
            post(proofread::download_revised::<M>),
        )
        .route(
            "/api/proofread/download/highlighted",
            post(proofread::download_highlighted::<M>),
        )
        .route(
            "/api/proofread/download/zip",
            post(proofread::download_bundle::<M>),
        )
        .route("/api/compare/analyze", post(compare::analyze))
        .route("/api/compare/download", post(compare::download))
        .route("/api/coherence/analyze", post(coherence::analyze::<M>))
        .route("/api/restructure/analyze", post(restructure::analyze::<M>))
        .route("/api/restructure/download", post(restructure::download::<M>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn init_tracing() {
    let filter = EnvFilter::try_new(log_filter_from_env()).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub async fn run() -> AppResult<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let model = GeminiClient::new(&config.model, &config.api_key, config.request_timeout)?;
    let bind_addr = config.bind_addr;

    let app = router(AppState::new(config, model));
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "proofreader listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("proofreader stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
