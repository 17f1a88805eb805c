pub mod admin;
pub mod health;
pub mod hospitals;
pub mod metrics;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use deadpool_postgres::Pool;

/// Finder routes, open to the public
pub fn api_routes() -> Router<Pool> {
    Router::new()
        .route("/hospitals", get(hospitals::list))
        .route("/hospitals/suggest", get(hospitals::suggest))
        .route("/search", post(search::search))
}

/// Hospital administration and search analytics
pub fn admin_routes() -> Router<Pool> {
    Router::new()
        .route("/hospitals", get(admin::list).post(admin::create))
        .route("/hospitals/dedupe", post(admin::dedupe))
        .route(
            "/hospitals/{id}",
            get(admin::read).put(admin::update).delete(admin::delete),
        )
        .route("/heatmap", get(admin::heatmap))
}
