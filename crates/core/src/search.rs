//! Search orchestration: distances, ranking call, merge

use std::collections::HashMap;
use std::time::Duration;

use crate::error::SearchError;
use crate::gateway::{Candidate, GatewayError, RankingGateway};
use crate::geo::distance_km;
use crate::location::{self, Geocoder, LocationQuery};
use crate::merge::{NameMatch, merge};
use crate::model::{Coordinates, Hospital, RankedHospital};
use crate::notice::Notice;

/// Deadline applied to the ranking call when none is configured
pub const DEFAULT_RANKING_TIMEOUT: Duration = Duration::from_secs(20);

/// Tunables for a [`SearchOrchestrator`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub name_match: NameMatch,
    pub ranking_timeout: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            name_match: NameMatch::default(),
            ranking_timeout: DEFAULT_RANKING_TIMEOUT,
        }
    }
}

/// The result of a search that did not fail outright
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Every candidate hospital, best first
    pub hospitals: Vec<RankedHospital>,
    /// Set when ranking was unavailable and the list is ordered by distance only
    pub ranking_error: Option<GatewayError>,
}

impl SearchOutcome {
    pub fn is_degraded(&self) -> bool {
        self.ranking_error.is_some()
    }

    /// Non-blocking notices to show alongside the list
    pub fn notices(&self) -> Vec<Notice> {
        self.ranking_error.iter().map(Notice::from).collect()
    }
}

/// Runs the symptom search pipeline against an injected ranking gateway.
///
/// Holds no per-request state; one instance serves concurrent searches.
pub struct SearchOrchestrator<G> {
    gateway: G,
    options: SearchOptions,
}

impl<G: RankingGateway> SearchOrchestrator<G> {
    pub fn new(gateway: G, options: SearchOptions) -> Self {
        Self { gateway, options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Rank `hospitals` for `symptoms` as seen from `user_location`.
    ///
    /// A failed or timed-out ranking call does not fail the search: the
    /// outcome holds every hospital ordered by distance and carries the
    /// gateway error.
    pub async fn search(
        &self,
        symptoms: &str,
        hospitals: &[Hospital],
        user_location: Coordinates,
    ) -> Result<SearchOutcome, SearchError> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            tracing::warn!("Rejected search with empty symptoms");
            return Err(SearchError::InvalidInput("symptoms must not be empty".to_string()));
        }
        if hospitals.is_empty() {
            tracing::warn!("Rejected search with no candidate hospitals");
            return Err(SearchError::InvalidInput("no hospitals to rank".to_string()));
        }

        let distances: HashMap<String, f64> = hospitals
            .iter()
            .map(|h| (h.id.clone(), distance_km(user_location, h.coordinates)))
            .collect();

        let candidates: Vec<Candidate> = hospitals.iter().map(Candidate::from).collect();

        let ranking = tokio::time::timeout(
            self.options.ranking_timeout,
            self.gateway.rank(symptoms, &candidates),
        )
        .await
        .unwrap_or(Err(GatewayError::Timeout(self.options.ranking_timeout)));

        match ranking {
            Ok(entries) => {
                tracing::info!(
                    candidates = candidates.len(),
                    entries = entries.len(),
                    "Ranking received"
                );
                Ok(SearchOutcome {
                    hospitals: merge(hospitals, &distances, &entries, self.options.name_match),
                    ranking_error: None,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "Ranking unavailable, ordering by distance");
                Ok(SearchOutcome {
                    hospitals: merge(hospitals, &distances, &[], self.options.name_match),
                    ranking_error: Some(err),
                })
            }
        }
    }

    /// Resolve `location` with `geocoder`, then [`search`](Self::search).
    ///
    /// Returns the resolved point with the outcome so callers can record it.
    pub async fn search_at<L: Geocoder>(
        &self,
        geocoder: &L,
        symptoms: &str,
        hospitals: &[Hospital],
        location: &LocationQuery,
    ) -> Result<(Coordinates, SearchOutcome), SearchError> {
        if symptoms.trim().is_empty() {
            return Err(SearchError::InvalidInput("symptoms must not be empty".to_string()));
        }
        if hospitals.is_empty() {
            return Err(SearchError::InvalidInput("no hospitals to rank".to_string()));
        }
        let point = location::resolve(geocoder, location).await?;
        let outcome = self.search(symptoms, hospitals, point).await?;
        Ok((point, outcome))
    }
}
