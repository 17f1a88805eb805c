use deadpool_postgres::Pool;
use medifind_core::{Coordinates, Hospital, HospitalDraft};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::AppError;

const COLUMNS: &str = "id, name, address, contact, lat, lng, specialties, services";

/// Repository for hospital CRUD operations
#[derive(Clone)]
pub struct HospitalRepository {
    pool: Pool,
}

fn from_row(row: &Row) -> Hospital {
    let id: Uuid = row.get("id");
    Hospital {
        id: id.to_string(),
        name: row.get("name"),
        address: row.get("address"),
        contact: row.get("contact"),
        coordinates: Coordinates::new(row.get("lat"), row.get("lng")),
        specialties: row.get("specialties"),
        services: row.get("services"),
    }
}

impl HospitalRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// All hospitals in storage order (oldest first)
    pub async fn list(&self) -> Result<Vec<Hospital>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                &format!("SELECT {} FROM hospitals ORDER BY seq", COLUMNS),
                &[],
            )
            .await?;
        Ok(rows.iter().map(from_row).collect())
    }

    /// Get a hospital by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<Hospital>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {} FROM hospitals WHERE id = $1", COLUMNS),
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(from_row))
    }

    /// Store a new hospital and return it with its assigned id
    pub async fn create(&self, draft: &HospitalDraft) -> Result<Hospital, AppError> {
        let client = self.pool.get().await?;
        let id = Uuid::new_v4();
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO hospitals ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
                    COLUMNS, COLUMNS
                ),
                &[
                    &id,
                    &draft.name,
                    &draft.address,
                    &draft.contact,
                    &draft.coordinates.lat,
                    &draft.coordinates.lng,
                    &draft.specialties,
                    &draft.services,
                ],
            )
            .await?;
        Ok(from_row(&row))
    }

    /// Replace a hospital's fields; `None` if it does not exist
    pub async fn update(&self, id: Uuid, draft: &HospitalDraft) -> Result<Option<Hospital>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!(
                    "UPDATE hospitals SET name = $2, address = $3, contact = $4, lat = $5, lng = $6, \
                     specialties = $7, services = $8, updated_at = now() \
                     WHERE id = $1 RETURNING {}",
                    COLUMNS
                ),
                &[
                    &id,
                    &draft.name,
                    &draft.address,
                    &draft.contact,
                    &draft.coordinates.lat,
                    &draft.coordinates.lng,
                    &draft.specialties,
                    &draft.services,
                ],
            )
            .await?;
        Ok(row.as_ref().map(from_row))
    }

    /// Delete a hospital; `false` if it did not exist
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM hospitals WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    /// Delete several hospitals in one transaction, returning how many went
    pub async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;
        let deleted = tx
            .execute("DELETE FROM hospitals WHERE id = ANY($1)", &[&ids])
            .await?;
        tx.commit().await?;
        Ok(deleted)
    }
}
