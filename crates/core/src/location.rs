//! Resolving where the user is

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SearchError;
use crate::model::Coordinates;

/// Where a search should be measured from: either a point the client already
/// knows (browser geolocation) or free text to geocode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationQuery {
    Point(Coordinates),
    Address { address: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("geocoding is not configured")]
    Unconfigured,

    #[error("no results for '{0}'")]
    NotFound(String),

    #[error("geocoding provider returned {0}")]
    Provider(String),

    #[error("geocoding request failed: {0}")]
    Transport(String),
}

/// Turns a free-text address into coordinates
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str)
    -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send;
}

/// Resolve a location query into a valid point.
///
/// Out-of-range points are rejected here so the pipeline never runs against
/// an invalid location.
pub async fn resolve<G: Geocoder>(
    geocoder: &G,
    query: &LocationQuery,
) -> Result<Coordinates, SearchError> {
    match query {
        LocationQuery::Point(point) => {
            if point.is_valid() {
                Ok(*point)
            } else {
                Err(SearchError::InvalidInput(format!(
                    "coordinates out of range: lat={}, lng={}",
                    point.lat, point.lng
                )))
            }
        }
        LocationQuery::Address { address } => {
            let address = address.trim();
            if address.is_empty() {
                return Err(SearchError::InvalidInput("address is empty".to_string()));
            }

            let point = geocoder.geocode(address).await.map_err(|e| {
                tracing::warn!(address = address, error = %e, "Geocoding failed");
                SearchError::GeocodeFailed(e.to_string())
            })?;

            if !point.is_valid() {
                return Err(SearchError::GeocodeFailed(format!(
                    "provider returned invalid coordinates for '{}'",
                    address
                )));
            }
            Ok(point)
        }
    }
}
