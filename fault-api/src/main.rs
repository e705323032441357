//! 5G Fault Prediction Server
//!
//! Serves the fault prediction pipeline over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  FAULT PREDICTION SERVICE                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Feature      │  │  Inference          │ │
//! │  │  Gateway  │─▶│  Mapping &    │─▶│  (Scaler gate +     │ │
//! │  │  (Axum)   │  │  Alignment    │  │   Classifier)       │ │
//! │  └───────────┘  └───────────────┘  └──────────┬──────────┘ │
//! │                                               ▲            │
//! │                                   ┌───────────┴─────────┐  │
//! │                                   │  Artifact Bundle    │  │
//! │                                   │  (loaded at start)  │  │
//! │                                   └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use fault_core::{ArtifactLoader, Predictor};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fault_api=debug,fault_core=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Fault prediction server starting ({})", config.environment);
    tracing::info!(
        "Artifacts: {}/{}",
        config.artifact_root.display(),
        config.model_dir
    );

    // Load artifacts once; failures are recorded in the bundle, not fatal
    let bundle = ArtifactLoader::new(&config.artifact_root)
        .with_model_dir(&config.model_dir)
        .load();

    if let Err(e) = bundle.classifier() {
        tracing::warn!("Model unavailable: {}", e);
    }
    if let Err(e) = bundle.scaler() {
        tracing::warn!("Scaler unavailable: {}", e);
    }

    // Build application state
    let state = AppState {
        predictor: Predictor::new(Arc::new(bundle)),
        config: config.clone(),
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::check))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
