//! Public hospital listing for the finder

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use deadpool_postgres::Pool;
use medifind_core::{Hospital, catalog};
use serde::Deserialize;

use crate::db::HospitalRepository;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    q: String,
}

/// GET /api/hospitals - Every hospital, in storage order
pub async fn list(State(pool): State<Pool>) -> Result<impl IntoResponse, AppError> {
    let hospitals = HospitalRepository::new(pool).list().await?;
    Ok(Json(hospitals))
}

/// GET /api/hospitals/suggest?q= - Hospitals whose name or address contains `q`
pub async fn suggest(
    State(pool): State<Pool>,
    Query(params): Query<SuggestParams>,
) -> Result<impl IntoResponse, AppError> {
    if params.q.trim().is_empty() {
        return Ok(Json(Vec::<Hospital>::new()));
    }
    let hospitals = HospitalRepository::new(pool).list().await?;
    let matches: Vec<Hospital> = catalog::suggest(&hospitals, &params.q)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(matches))
}
