//! medifind-server library crate
//!
//! Exposes `build_app`, `config` and `db` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

mod ai;
pub mod config;
pub mod db;
mod error;
mod geocode;
mod middleware;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use deadpool_postgres::Pool;
use medifind_core::SearchOrchestrator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use middleware::ApiKeyAuth;
use routes::search::SearchContext;

/// Delay before the first ranking retry; later retries double it
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Build the search collaborators from configuration
fn search_context(config: &Config) -> SearchContext {
    // Claude client (None if ANTHROPIC_API_KEY not set; searches then degrade)
    let claude_client = config.anthropic_api_key.as_ref().map(|key| {
        ai::ClaudeClient::new(
            key.clone(),
            config.anthropic_model.clone(),
            config.ranking_attempt_timeout(),
        )
    });
    let ranker = ai::ClaudeRanker::new(claude_client, config.ranking_system_prompt.clone());
    let geocoder = geocode::GoogleGeocoder::new(config.google_maps_api_key.clone());

    tracing::debug!(
        ranking = ranker.is_configured(),
        geocoding = geocoder.is_configured(),
        "Search collaborators ready"
    );

    let gateway = ai::RetryingGateway::new(ranker, config.ranking_max_retries, RETRY_BASE_DELAY);

    SearchContext {
        orchestrator: Arc::new(SearchOrchestrator::new(gateway, config.search_options())),
        geocoder: Arc::new(geocoder),
    }
}

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(pool: Pool, config: &Config) -> Router {
    let auth = ApiKeyAuth::new(config.api_key.clone());
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // Admin routes (require auth)
    let admin_routes = Router::new()
        .nest("/api/admin", routes::admin_routes())
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::auth::auth_middleware))
        .layer(Extension(auth));

    // Finder routes
    let api_routes = Router::new()
        .nest("/api", routes::api_routes())
        .layer(Extension(search_context(config)));

    // Install Prometheus metrics recorder.
    // Use build_recorder() + set_global_recorder() so that repeated calls
    // (e.g. in integration tests) don't panic; the second install is
    // ignored and we still get a valid handle for /metrics.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    // Public routes (no auth, no rate limit)
    let public_routes = Router::new()
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    // Build CORS layer
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let limited_routes = Router::new()
        .merge(api_routes)
        .merge(admin_routes)
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // Build application
    Router::new()
        .merge(public_routes)
        .merge(limited_routes)
        .with_state(pool)
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}
