//! Google Geocoding API adapter

use std::time::Duration;

use medifind_core::{Coordinates, GeocodeError, Geocoder};
use serde::Deserialize;

const API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Geocodes free-text addresses with the Google Geocoding API
#[derive(Clone)]
pub struct GoogleGeocoder {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

impl GoogleGeocoder {
    pub fn new(api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            api_key,
            endpoint: API_URL.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::Unconfigured)?;

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Provider(format!("HTTP {}", response.status())));
        }

        let body = response
            .json::<GeocodeResponse>()
            .await
            .map_err(|e| GeocodeError::Provider(format!("unreadable response: {}", e)))?;

        interpret(address, body)
    }
}

/// Only an `OK` status with at least one result counts as success
fn interpret(address: &str, body: GeocodeResponse) -> Result<Coordinates, GeocodeError> {
    match body.status.as_str() {
        "OK" => body
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| GeocodeError::NotFound(address.to_string())),
        "ZERO_RESULTS" => Err(GeocodeError::NotFound(address.to_string())),
        status => Err(GeocodeError::Provider(match body.error_message {
            Some(msg) => format!("{}: {}", status, msg),
            None => status.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> GeocodeResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn ok_takes_first_result() {
        let body = parse(serde_json::json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 4.9757, "lng": 8.3417}}},
                {"geometry": {"location": {"lat": 0.0, "lng": 0.0}}}
            ]
        }));
        assert_eq!(interpret("Calabar", body), Ok(Coordinates::new(4.9757, 8.3417)));
    }

    #[test]
    fn ok_without_results_is_not_found() {
        let body = parse(serde_json::json!({"status": "OK", "results": []}));
        assert_eq!(
            interpret("x", body),
            Err(GeocodeError::NotFound("x".into()))
        );
    }

    #[test]
    fn zero_results_is_not_found() {
        let body = parse(serde_json::json!({"status": "ZERO_RESULTS"}));
        assert!(matches!(interpret("Atlantis", body), Err(GeocodeError::NotFound(_))));
    }

    #[test]
    fn other_statuses_are_provider_errors() {
        let body = parse(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }));
        assert_eq!(
            interpret("Lagos", body),
            Err(GeocodeError::Provider(
                "REQUEST_DENIED: The provided API key is invalid.".into()
            ))
        );
    }

    #[tokio::test]
    async fn missing_key_is_unconfigured() {
        let geocoder = GoogleGeocoder::new(None);
        assert!(!geocoder.is_configured());
        assert_eq!(geocoder.geocode("Lagos").await, Err(GeocodeError::Unconfigured));
    }
}
