//! HTTP surface of the calculator.
//!
//! | route | body | response |
//! |---|---|---|
//! | `POST /api/mortgage/calculate` | [`MortgageRequest`](crate::mortgage::MortgageRequest) | [`ScheduleView`](crate::serialization::ScheduleView) |
//! | `POST /api/mortgage/compare` | same request | [`ComparisonView`](crate::serialization::ComparisonView) |
//! | `GET /api/mortgage/programs` | | list of [`ProgramView`](crate::serialization::ProgramView) |
//! | `GET /health` | | `ok` |
//!
//! Invalid input of any kind answers `400` with
//! `{ "message": "InvalidInput", "details": "..." }`.
//!
//! # Environment
//! - `MORTGAGE_PORT` listening port, `8080` by default
//! - `MORTGAGE_CONFIG` path to a json calculator config
//! - `MORTGAGE_CORS_MAX_AGE_SECS` preflight cache, `3600` by default
//! - `RUST_LOG` log filter

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use crate::config::CalculatorConfig;
use config::ServiceConfig;
use routes::{calculate_handler, compare_handler, health_handler, programs_handler};
use state::AppState;

pub fn router(state: Arc<AppState>, cors_max_age: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(cors_max_age);

    Router::new()
        .route("/api/mortgage/calculate", post(calculate_handler))
        .route("/api/mortgage/compare", post(compare_handler))
        .route("/api/mortgage/programs", get(programs_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading configuration...");
    let service = ServiceConfig::load()?;

    let calculator = match &service.calculator_config_path {
        Some(path) => CalculatorConfig::load(path)
            .with_context(|| format!("Failed to load calculator config from {}", path.display()))?,
        None => {
            info!("MORTGAGE_CONFIG not set, using built-in calculator config");
            CalculatorConfig::default()
        }
    };
    info!(programs = calculator.programs.len(), "Calculator config ready");

    let app = router(
        AppState::new(calculator),
        Duration::from_secs(service.cors_max_age_secs),
    );

    let address = format!("0.0.0.0:{}", service.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
