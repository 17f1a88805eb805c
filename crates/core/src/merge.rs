//! Merge of ranking output with hospital records
//!
//! The ranking service is not trusted to return one entry per hospital, so
//! the merge is driven by the hospital list: every hospital comes out exactly
//! once, ranked or not.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gateway::RankingEntry;
use crate::model::{Hospital, RankedHospital};

/// How hospital names are compared with names in ranking output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMatch {
    /// Byte-for-byte equality
    Exact,
    /// Equality after trimming and lower-casing
    #[default]
    CaseInsensitive,
}

impl NameMatch {
    /// The join key for a name under this policy
    pub fn key(self, name: &str) -> String {
        match self {
            NameMatch::Exact => name.to_string(),
            NameMatch::CaseInsensitive => name.trim().to_lowercase(),
        }
    }
}

impl FromStr for NameMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(NameMatch::Exact),
            "case-insensitive" | "case_insensitive" | "caseinsensitive" => {
                Ok(NameMatch::CaseInsensitive)
            }
            other => Err(format!("unknown name match policy '{}'", other)),
        }
    }
}

/// Combine hospitals, their precomputed distances and ranking entries into
/// one ordered list.
///
/// Entries whose `hospital_id` names one of `hospitals` join on id; the rest
/// (no id, or an id matching nothing) join on name under `name_match`. When a
/// hospital matches several entries the earliest one wins. The result is
/// sorted by rank (unranked last), then by distance, and the sort is stable.
///
/// A hospital missing from `distances` sorts as infinitely far away.
pub fn merge(
    hospitals: &[Hospital],
    distances: &HashMap<String, f64>,
    entries: &[RankingEntry],
    name_match: NameMatch,
) -> Vec<RankedHospital> {
    let known: HashSet<&str> = hospitals.iter().map(|h| h.id.as_str()).collect();
    let mut by_id: HashMap<&str, (usize, &RankingEntry)> = HashMap::new();
    let mut by_name: HashMap<String, (usize, &RankingEntry)> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        match entry.hospital_id.as_deref() {
            Some(id) if known.contains(id) => {
                by_id.entry(id).or_insert((index, entry));
            }
            _ => {
                by_name
                    .entry(name_match.key(&entry.hospital_name))
                    .or_insert((index, entry));
            }
        }
    }

    let mut merged: Vec<RankedHospital> = hospitals
        .iter()
        .map(|hospital| {
            let by_own_id = by_id.get(hospital.id.as_str());
            let by_own_name = by_name.get(&name_match.key(&hospital.name));
            let matched = match (by_own_id, by_own_name) {
                (Some(a), Some(b)) => Some(if a.0 <= b.0 { a.1 } else { b.1 }),
                (a, b) => a.or(b).map(|(_, entry)| *entry),
            };

            let distance_km = match distances.get(&hospital.id) {
                Some(d) => *d,
                None => {
                    tracing::warn!(hospital_id = %hospital.id, "No distance computed for hospital");
                    f64::INFINITY
                }
            };

            RankedHospital {
                hospital: hospital.clone(),
                distance_km,
                rank: matched.map(|e| e.rank),
                reason: matched.map(|e| e.reason.clone()),
            }
        })
        .collect();

    merged.sort_by(compare);
    merged
}

/// Rank ascending with unranked entries last, then distance ascending
fn compare(a: &RankedHospital, b: &RankedHospital) -> Ordering {
    let by_rank = match (a.rank, b.rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_rank.then_with(|| a.distance_km.total_cmp(&b.distance_km))
}
