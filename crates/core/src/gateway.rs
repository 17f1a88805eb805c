//! Port to the external ranking service

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Hospital;

/// The view of a hospital sent to the ranking service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
}

impl From<&Hospital> for Candidate {
    fn from(hospital: &Hospital) -> Self {
        Self {
            id: hospital.id.clone(),
            name: hospital.name.clone(),
            specialties: hospital.specialties.clone(),
        }
    }
}

/// One line of ranking output.
///
/// Nothing about a batch of entries is guaranteed: names may be missing,
/// duplicated or misspelt and ranks need not be consecutive or in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub hospital_name: String,
    pub rank: i64,
    pub reason: String,
    /// Candidate id, when the service echoed it back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<String>,
}

impl RankingEntry {
    pub fn new(hospital_name: impl Into<String>, rank: i64, reason: impl Into<String>) -> Self {
        Self {
            hospital_name: hospital_name.into(),
            rank,
            reason: reason.into(),
            hospital_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.hospital_id = Some(id.into());
        self
    }
}

/// Why the ranking service produced no usable answer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("ranking service is not configured")]
    Unconfigured,

    #[error("ranking timed out after {0:?}")]
    Timeout(Duration),

    #[error("ranking request failed: {0}")]
    Transport(String),

    #[error("ranking service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("malformed ranking response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Short stable label, used for metrics and notice codes
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Unconfigured => "unconfigured",
            GatewayError::Timeout(_) => "timeout",
            GatewayError::Transport(_) => "transport",
            GatewayError::Upstream { .. } => "upstream",
            GatewayError::Malformed(_) => "malformed",
        }
    }

    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Unconfigured => false,
            GatewayError::Timeout(_) | GatewayError::Transport(_) => true,
            GatewayError::Upstream { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Malformed(_) => true,
        }
    }
}

/// Ranks candidate hospitals against a symptom description.
///
/// Implementations may suspend for a network round trip. Callers bound the
/// call with a deadline and may drop the future to cancel it.
pub trait RankingGateway: Send + Sync {
    fn rank(
        &self,
        symptoms: &str,
        candidates: &[Candidate],
    ) -> impl Future<Output = Result<Vec<RankingEntry>, GatewayError>> + Send;
}
