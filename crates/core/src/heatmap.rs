//! Aggregation of past search locations for the admin heatmap

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Coordinates;

/// One recorded search location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub location: Coordinates,
    pub searched_at: DateTime<Utc>,
}

/// A weighted heatmap cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: u32,
}

/// Snap to roughly 100 m cells
fn cell(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

/// Bucket records into cells, heaviest first; ties by latitude then longitude
pub fn aggregate(records: &[SearchRecord]) -> Vec<HeatPoint> {
    let mut counts: HashMap<(i64, i64), u32> = HashMap::new();
    for record in records {
        *counts
            .entry((cell(record.location.lat), cell(record.location.lng)))
            .or_default() += 1;
    }

    let mut points: Vec<((i64, i64), u32)> = counts.into_iter().collect();
    points.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    points
        .into_iter()
        .map(|((lat, lng), weight)| HeatPoint {
            lat: lat as f64 / 1000.0,
            lng: lng as f64 / 1000.0,
            weight,
        })
        .collect()
}
