//! Ranking gateway backed by Claude

use std::time::Duration;

use medifind_core::{Candidate, GatewayError, RankingEntry, RankingGateway};
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::client::{ClaudeClient, ClientError};

/// Instructions used when no prompt is configured
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert medical assistant tasked with ranking hospitals by their relevance to a patient's symptoms.

You will receive a JSON object with the patient's symptoms and a list of hospitals, each with an id, a name and its specialties. Rank ALL hospitals by how well their specialties align with the symptoms.

Return ONLY a JSON array, one object per hospital, in this format:
[{"id": "hospital id", "hospital": "Hospital Name", "rank": 1, "reason": "short explanation"}, ...]

Rules:
- Copy each hospital's id and name exactly as given.
- Ranks are consecutive integers starting from 1 (1 is the most relevant), each hospital has a unique rank.
- Keep each reason short and concise.
- Return ONLY the JSON array, no other text."#;

/// Ranks hospitals by asking Claude.
///
/// Without a client every call fails with [`GatewayError::Unconfigured`],
/// which the orchestrator turns into distance-only results.
#[derive(Clone)]
pub struct ClaudeRanker {
    client: Option<ClaudeClient>,
    system_prompt: String,
}

#[derive(Serialize)]
struct RankingRequest<'a> {
    symptoms: &'a str,
    hospitals: &'a [Candidate],
}

impl ClaudeRanker {
    pub fn new(client: Option<ClaudeClient>, system_prompt: String) -> Self {
        Self {
            client,
            system_prompt,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

impl RankingGateway for ClaudeRanker {
    async fn rank(
        &self,
        symptoms: &str,
        candidates: &[Candidate],
    ) -> Result<Vec<RankingEntry>, GatewayError> {
        let client = self.client.as_ref().ok_or(GatewayError::Unconfigured)?;

        let user_message = serde_json::to_string_pretty(&RankingRequest {
            symptoms,
            hospitals: candidates,
        })
        .map_err(|e| GatewayError::Malformed(format!("could not encode request: {}", e)))?;

        tracing::debug!(
            model = client.model(),
            candidates = candidates.len(),
            "Requesting symptom ranking"
        );

        let response = client
            .message(Some(&self.system_prompt), &user_message)
            .await
            .map_err(|e| into_gateway_error(e, client.request_timeout()))?;

        let entries = parse_rankings(&response)?;
        if entries.len() != candidates.len() {
            tracing::warn!(
                candidates = candidates.len(),
                ranked = entries.len(),
                "Ranking count mismatch"
            );
        }
        Ok(entries)
    }
}

/// `attempt_timeout` is the client's per-request limit, reported on timeouts
fn into_gateway_error(err: ClientError, attempt_timeout: Duration) -> GatewayError {
    match err {
        ClientError::Http(e) if e.is_timeout() => GatewayError::Timeout(attempt_timeout),
        ClientError::Http(e) if e.is_decode() => GatewayError::Malformed(e.to_string()),
        ClientError::Http(e) => GatewayError::Transport(e.to_string()),
        ClientError::Api { status, message } => GatewayError::Upstream { status, message },
        ClientError::NoText => GatewayError::Malformed("no text content in response".to_string()),
    }
}

/// Parse the model's answer into ranking entries.
///
/// The answer must be a JSON array (optionally fenced in markdown, or under a
/// `rankings` key). Individual items that lack a name or a numeric rank are
/// skipped; the merge tolerates partial rankings.
pub fn parse_rankings(text: &str) -> Result<Vec<RankingEntry>, GatewayError> {
    let json_str = extract_json(text)?;
    let value: JsonValue = serde_json::from_str(&json_str)
        .map_err(|e| GatewayError::Malformed(format!("invalid JSON: {}", e)))?;

    let items = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut map) => match map.remove("rankings") {
            Some(JsonValue::Array(items)) => items,
            _ => return Err(GatewayError::Malformed("expected a JSON array".to_string())),
        },
        _ => return Err(GatewayError::Malformed("expected a JSON array".to_string())),
    };

    let total = items.len();
    let entries: Vec<RankingEntry> = items.iter().filter_map(parse_entry).collect();
    if entries.len() < total {
        tracing::warn!(skipped = total - entries.len(), "Skipped unusable ranking items");
    }
    Ok(entries)
}

fn parse_entry(item: &JsonValue) -> Option<RankingEntry> {
    let name = ["hospital", "hospitalName", "name"]
        .iter()
        .find_map(|key| item.get(*key).and_then(JsonValue::as_str))?;

    let rank = match item.get("rank")? {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))?,
        JsonValue::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    let reason = item
        .get("reason")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();

    let id = ["id", "hospitalId"]
        .iter()
        .find_map(|key| item.get(*key))
        .and_then(|v| match v {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        });

    let entry = RankingEntry::new(name, rank, reason);
    Some(match id {
        Some(id) => entry.with_id(id),
        None => entry,
    })
}

/// Extract a JSON document from text that might contain markdown code blocks
fn extract_json(text: &str) -> Result<String, GatewayError> {
    let trimmed = text.trim();

    // Direct JSON
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    // Wrapped in ```json ... ```
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return Ok(after[..end].trim().to_string());
        }
    }

    // Wrapped in ``` ... ```
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return Ok(after[..end].trim().to_string());
        }
    }

    // Prose around a bare array
    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if start < end {
            return Ok(trimmed[start..=end].to_string());
        }
    }

    Err(GatewayError::Malformed(format!(
        "could not extract JSON from response: {}",
        trimmed
    )))
}
