//! League RS Server
//!
//! HTTP server exposing the player and team API.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_api::AppState;
use league_core::config::AppConfig;
use league_db::{Database, MemoryStore, PlayerRepository, TeamRepository};

mod health;

use health::{HealthChecker, HealthConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        application = %config.application.name,
        host = %config.server.host,
        port = config.server.port,
        "Starting League RS"
    );

    let db = connect_database(&config).await;
    let state = match db {
        Some(ref db) => {
            let pool = db.pool().clone();
            AppState::new(
                Arc::new(PlayerRepository::new(pool.clone())),
                Arc::new(TeamRepository::new(pool)),
            )
        }
        None => AppState::in_memory(MemoryStore::new()),
    };

    let health = Arc::new(HealthChecker::new(HealthConfig::default()).with_database(db.clone()));
    let app = build_router(
        state,
        health,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }
    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,league_server=debug,league_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Connect to PostgreSQL, or `None` to run on the in-memory store
async fn connect_database(config: &AppConfig) -> Option<Database> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("No database URL configured. Running with in-memory storage.");
        return None;
    };

    let db = match Database::connect(url, &config.database).await {
        Ok(db) => db,
        Err(e) => {
            warn!(
                "Failed to connect to database: {}. Running with in-memory storage.",
                e
            );
            return None;
        }
    };

    if let Err(e) = db.ensure_schema().await {
        error!("Failed to create schema: {}. Running with in-memory storage.", e);
        db.close().await;
        return None;
    }

    info!("Connected to database");
    Some(db)
}

/// Build the application router
fn build_router(state: AppState, health: Arc<HealthChecker>, request_timeout: Duration) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(league_api::router().with_state(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
