//! medifind-server: hospital finder HTTP server binary entrypoint.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medifind_server::config::Config;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();

    // Create database pool and schema
    let pool = medifind_server::db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    medifind_server::db::migrate(&pool)
        .await
        .expect("Failed to apply database schema");

    // Log startup info
    if config.api_key.is_some() {
        tracing::info!("Admin API key authentication enabled");
    } else {
        tracing::warn!("Admin API key authentication disabled (no API_KEY env var)");
    }
    if config.anthropic_api_key.is_some() {
        tracing::info!(
            model = %config.anthropic_model,
            timeout_secs = config.ranking_timeout.as_secs(),
            retries = config.ranking_max_retries,
            name_match = ?config.name_match,
            "Symptom ranking enabled"
        );
    } else {
        tracing::warn!("ANTHROPIC_API_KEY not set, searches will be ordered by distance only");
    }
    if config.google_maps_api_key.is_none() {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set, address searches will fail");
    }
    tracing::info!("Rate limiting: {} requests/second", config.rate_limit_rps);

    // Build application
    let app = medifind_server::build_app(pool, &config);

    // Start server
    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting MediFind server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    tracing::info!("Server shutdown complete");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
