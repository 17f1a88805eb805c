//! medifind-core: the symptom-to-ranked-hospital pipeline
//!
//! This crate holds the domain types, the haversine distance, the merge of
//! model rankings with hospital records, and the search orchestrator. I/O is
//! reached only through the [`RankingGateway`] and [`Geocoder`] ports, which
//! the server crate implements.

pub mod catalog;
pub mod error;
pub mod form;
pub mod gateway;
pub mod geo;
pub mod heatmap;
pub mod location;
pub mod merge;
pub mod model;
pub mod notice;
pub mod search;

pub use error::{SearchError, ValidationError};
pub use form::{HospitalDraft, HospitalForm, ListField};
pub use gateway::{Candidate, GatewayError, RankingEntry, RankingGateway};
pub use geo::distance_km;
pub use heatmap::{HeatPoint, SearchRecord};
pub use location::{GeocodeError, Geocoder, LocationQuery};
pub use merge::{NameMatch, merge};
pub use model::{Coordinates, Hospital, RankedHospital};
pub use notice::{Notice, Severity};
pub use search::{SearchOptions, SearchOrchestrator, SearchOutcome};
