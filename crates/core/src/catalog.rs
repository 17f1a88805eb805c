//! Operations over the whole hospital catalogue

use std::collections::HashSet;

use crate::model::Hospital;

/// Most suggestions returned for a partial query
pub const MAX_SUGGESTIONS: usize = 5;

/// Key under which two records describe the same hospital
fn identity_key(hospital: &Hospital) -> String {
    format!(
        "{}|{}",
        hospital.name.trim().to_lowercase(),
        hospital.address.trim().to_lowercase()
    )
}

/// Ids of records that repeat an earlier record's name and address.
///
/// The first record with a given key is kept; ids come back in input order.
pub fn find_duplicates(hospitals: &[Hospital]) -> Vec<String> {
    let mut seen = HashSet::new();
    hospitals
        .iter()
        .filter(|h| !seen.insert(identity_key(h)))
        .map(|h| h.id.clone())
        .collect()
}

/// Hospitals whose name or address contains `query`, ignoring case
pub fn suggest<'a>(hospitals: &'a [Hospital], query: &str) -> Vec<&'a Hospital> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    hospitals
        .iter()
        .filter(|h| {
            h.name.to_lowercase().contains(&needle) || h.address.to_lowercase().contains(&needle)
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}
