use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::gateway::GatewayError;

/// How much a notice should interrupt the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Information,
}

/// A user-facing message attached to a response.
///
/// Fatal and error notices replace a result; warnings and information ride
/// along with one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, code: &str, message: &str) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: &str, message: &str) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn information(code: &str, message: &str) -> Self {
        Self::new(Severity::Information, code, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::error("not-found", message)
    }

    pub fn invalid(message: &str) -> Self {
        Self::error("invalid", message)
    }

    /// Whether the notice stands in for a result rather than accompanying one
    pub fn is_blocking(&self) -> bool {
        matches!(self.severity, Severity::Fatal | Severity::Error)
    }
}

impl From<&GatewayError> for Notice {
    fn from(err: &GatewayError) -> Self {
        Notice::warning(
            "ranking-unavailable",
            &format!(
                "Could not rank hospitals by symptoms ({}); showing nearest first.",
                err
            ),
        )
    }
}

impl From<&SearchError> for Notice {
    fn from(err: &SearchError) -> Self {
        match err {
            SearchError::InvalidInput(msg) => Notice::invalid(msg),
            SearchError::GeocodeFailed(msg) => Notice::error("geocode-failed", msg),
        }
    }
}
