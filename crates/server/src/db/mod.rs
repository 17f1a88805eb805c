mod history;
mod hospitals;

pub use history::SearchHistoryRepository;
pub use hospitals::HospitalRepository;

use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS hospitals (
    id          UUID PRIMARY KEY,
    seq         BIGSERIAL,
    name        TEXT NOT NULL,
    address     TEXT NOT NULL,
    contact     TEXT NOT NULL,
    lat         DOUBLE PRECISION NOT NULL,
    lng         DOUBLE PRECISION NOT NULL,
    specialties TEXT[] NOT NULL DEFAULT '{}',
    services    TEXT[] NOT NULL DEFAULT '{}',
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS search_history (
    id          BIGSERIAL PRIMARY KEY,
    lat         DOUBLE PRECISION NOT NULL,
    lng         DOUBLE PRECISION NOT NULL,
    searched_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

/// Create a connection pool from a database URL
pub async fn create_pool(database_url: &str) -> Result<Pool, deadpool_postgres::CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

/// Create tables that do not exist yet
pub async fn migrate(pool: &Pool) -> Result<(), crate::error::AppError> {
    let client = pool.get().await?;
    client.batch_execute(SCHEMA).await?;
    Ok(())
}
