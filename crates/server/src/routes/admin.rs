//! Hospital administration and search analytics

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use deadpool_postgres::Pool;
use medifind_core::{HospitalForm, catalog};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{HospitalRepository, SearchHistoryRepository};
use crate::error::AppError;

/// Response body for duplicate removal
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupeResponse {
    kept: usize,
    removed: Vec<String>,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Hospital/{} not found", id))
}

/// Ids that are not UUIDs cannot name a stored hospital
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found(raw))
}

/// GET /api/admin/hospitals - List hospitals
pub async fn list(State(pool): State<Pool>) -> Result<impl IntoResponse, AppError> {
    let hospitals = HospitalRepository::new(pool).list().await?;
    Ok(Json(hospitals))
}

/// POST /api/admin/hospitals - Create a hospital
pub async fn create(
    State(pool): State<Pool>,
    Json(form): Json<HospitalForm>,
) -> Result<impl IntoResponse, AppError> {
    let draft = form.validate()?;
    let hospital = HospitalRepository::new(pool).create(&draft).await?;

    tracing::info!(hospital_id = %hospital.id, name = %hospital.name, "Hospital created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/admin/hospitals/{}", hospital.id)) {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(hospital)))
}

/// GET /api/admin/hospitals/{id} - Read a hospital
pub async fn read(
    State(pool): State<Pool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match HospitalRepository::new(pool).get(parse_id(&id)?).await? {
        Some(hospital) => Ok(Json(hospital)),
        None => Err(not_found(&id)),
    }
}

/// PUT /api/admin/hospitals/{id} - Replace a hospital's fields
pub async fn update(
    State(pool): State<Pool>,
    Path(id): Path<String>,
    Json(form): Json<HospitalForm>,
) -> Result<impl IntoResponse, AppError> {
    let uuid = parse_id(&id)?;
    let draft = form.validate()?;
    match HospitalRepository::new(pool).update(uuid, &draft).await? {
        Some(hospital) => Ok(Json(hospital)),
        None => Err(not_found(&id)),
    }
}

/// DELETE /api/admin/hospitals/{id} - Delete a hospital
pub async fn delete(
    State(pool): State<Pool>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if HospitalRepository::new(pool).delete(parse_id(&id)?).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

/// POST /api/admin/hospitals/dedupe - Remove records repeating an earlier name and address
pub async fn dedupe(State(pool): State<Pool>) -> Result<impl IntoResponse, AppError> {
    let repo = HospitalRepository::new(pool);
    let hospitals = repo.list().await?;
    let removed = catalog::find_duplicates(&hospitals);

    let ids: Vec<Uuid> = removed
        .iter()
        .map(|id| Uuid::parse_str(id))
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(format!("Stored hospital id is not a UUID: {}", e)))?;
    let deleted = repo.delete_many(&ids).await?;

    tracing::info!(
        scanned = hospitals.len(),
        duplicates = removed.len(),
        deleted = deleted,
        "Duplicate removal finished"
    );

    Ok(Json(DedupeResponse {
        kept: hospitals.len() - removed.len(),
        removed,
    }))
}

/// GET /api/admin/heatmap - Weighted locations of past searches
pub async fn heatmap(State(pool): State<Pool>) -> Result<impl IntoResponse, AppError> {
    let records = SearchHistoryRepository::new(pool).list().await?;
    Ok(Json(medifind_core::heatmap::aggregate(&records)))
}
