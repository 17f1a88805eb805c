use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use medifind_core::{Coordinates, SearchRecord};

use crate::error::AppError;

/// Repository for recorded search locations
#[derive(Clone)]
pub struct SearchHistoryRepository {
    pool: Pool,
}

impl SearchHistoryRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Record that a search was made from `location`
    pub async fn record(&self, location: Coordinates) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO search_history (lat, lng) VALUES ($1, $2)",
                &[&location.lat, &location.lng],
            )
            .await?;
        Ok(())
    }

    /// All recorded searches, oldest first
    pub async fn list(&self) -> Result<Vec<SearchRecord>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT lat, lng, searched_at FROM search_history ORDER BY searched_at, id",
                &[],
            )
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let searched_at: DateTime<Utc> = row.get("searched_at");
                SearchRecord {
                    location: Coordinates::new(row.get("lat"), row.get("lng")),
                    searched_at,
                }
            })
            .collect())
    }
}
