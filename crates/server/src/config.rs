//! Server configuration

use std::str::FromStr;
use std::time::Duration;

use medifind_core::{NameMatch, SearchOptions};

use crate::ai::client::DEFAULT_MODEL;
use crate::ai::ranking::DEFAULT_SYSTEM_PROMPT;

/// Server configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// Admin API key; admin routes are open when unset
    pub api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub ranking_system_prompt: String,
    pub ranking_timeout: Duration,
    pub ranking_max_retries: u32,
    pub name_match: NameMatch,
    pub google_maps_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "host=localhost user=postgres dbname=medifind".into()),
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            api_key: optional("API_KEY"),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            rate_limit_rps: parsed("RATE_LIMIT_RPS", 100).max(1),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            anthropic_model: optional("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            ranking_system_prompt: optional("RANKING_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.into()),
            ranking_timeout: Duration::from_secs(parsed("RANKING_TIMEOUT_SECS", 20)),
            ranking_max_retries: parsed("RANKING_MAX_RETRIES", 2),
            name_match: parsed("RANKING_NAME_MATCH", NameMatch::CaseInsensitive),
            google_maps_api_key: optional("GOOGLE_MAPS_API_KEY"),
        }
    }

    /// Limit for one ranking request, so every retry fits inside the
    /// orchestrator deadline
    pub fn ranking_attempt_timeout(&self) -> Duration {
        self.ranking_timeout / self.ranking_max_retries.saturating_add(1)
    }

    /// Orchestrator options derived from this configuration
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            name_match: self.name_match,
            ranking_timeout: self.ranking_timeout,
        }
    }
}

/// A non-empty environment variable
fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn parsed<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = key, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}
