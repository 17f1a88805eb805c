//! Symptom search endpoint

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use deadpool_postgres::Pool;
use medifind_core::{LocationQuery, Notice, RankedHospital, SearchOrchestrator};
use serde::{Deserialize, Serialize};

use crate::ai::{ClaudeRanker, RetryingGateway};
use crate::db::{HospitalRepository, SearchHistoryRepository};
use crate::error::AppError;
use crate::geocode::GoogleGeocoder;

/// The gateway stack the server ranks with
pub type Ranker = RetryingGateway<ClaudeRanker>;

/// Collaborators shared by every search request
#[derive(Clone)]
pub struct SearchContext {
    pub orchestrator: Arc<SearchOrchestrator<Ranker>>,
    pub geocoder: Arc<GoogleGeocoder>,
}

/// Request body for a symptom search
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    symptoms: String,
    location: LocationQuery,
    #[serde(default)]
    limit: Option<usize>,
}

/// Ordered hospitals plus any non-blocking notices
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    hospitals: Vec<RankedHospital>,
    notices: Vec<Notice>,
}

/// POST /api/search - Rank hospitals for the given symptoms and location
///
/// Ranking failures still return every hospital, nearest first, with a
/// `ranking-unavailable` warning. Bad input and unresolvable locations fail
/// the request.
pub async fn search(
    State(pool): State<Pool>,
    Extension(ctx): Extension<SearchContext>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let hospitals = HospitalRepository::new(pool.clone()).list().await?;

    tracing::info!(candidates = hospitals.len(), "Symptom search");

    let result = ctx
        .orchestrator
        .search_at(ctx.geocoder.as_ref(), &body.symptoms, &hospitals, &body.location)
        .await;

    let (point, outcome) = match result {
        Ok(found) => found,
        Err(err) => {
            metrics::counter!("searches_total", "outcome" => "rejected").increment(1);
            return Err(err.into());
        }
    };

    if let Some(err) = &outcome.ranking_error {
        metrics::counter!("ranking_unavailable_total", "kind" => err.kind()).increment(1);
        metrics::counter!("searches_total", "outcome" => "degraded").increment(1);
    } else {
        metrics::counter!("searches_total", "outcome" => "ranked").increment(1);
    }

    // History feeds the admin heatmap; losing a point must not fail the search.
    if let Err(e) = SearchHistoryRepository::new(pool).record(point).await {
        tracing::warn!(error = %e, "Failed to record search location");
    }

    let notices = outcome.notices();
    let mut hospitals = outcome.hospitals;
    if let Some(limit) = body.limit {
        hospitals.truncate(limit);
    }

    Ok(Json(SearchResponse { hospitals, notices }))
}
