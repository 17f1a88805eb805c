use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the geographic range.
    ///
    /// Distance computation never calls this; range checks belong to the
    /// layers that accept coordinates from users.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A hospital record as stored by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

/// A hospital with its distance from the user and, when the ranking
/// service matched it, the model's rank and reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedHospital {
    #[serde(flatten)]
    pub hospital: Hospital,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RankedHospital {
    pub fn id(&self) -> &str {
        &self.hospital.id
    }

    pub fn name(&self) -> &str {
        &self.hospital.name
    }
}
