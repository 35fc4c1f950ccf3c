//! Free-text courier lookup by name or driver id.

use crate::records::{PerformanceRecord, RecordStore};

/// Lower-cases and collapses whitespace runs to a single space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns every record whose name or id matches `query`, in store order.
///
/// Names match on case- and whitespace-insensitive substrings. Ids match on
/// substrings too, except that an all-digit query must equal the id exactly,
/// so `12345` does not pull in `123456`. The same courier can appear once
/// per segment; all of those records are returned.
pub fn search<'a>(store: &'a RecordStore, query: &str) -> Vec<&'a PerformanceRecord> {
    let q = normalize(query);
    if q.is_empty() || store.is_empty() {
        return Vec::new();
    }

    let numeric = q.chars().all(|c| c.is_ascii_digit());

    store
        .records()
        .iter()
        .filter(|record| {
            let name = normalize(&record.full_name);
            let id = record.driver_id.trim().to_lowercase();
            let id_match = if numeric { id == q } else { id.contains(&q) };
            name.contains(&q) || id_match
        })
        .collect()
}

/// Picks the record to show from a match list.
///
/// A single match is returned directly. Otherwise the previously selected
/// record is kept if it is still among the matches; `None` means the caller
/// has to offer a picklist.
pub fn resolve_selection<'a>(
    matches: &[&'a PerformanceRecord],
    previous_key: Option<&str>,
) -> Option<&'a PerformanceRecord> {
    match matches {
        [only] => Some(*only),
        _ => {
            let key = previous_key?;
            matches.iter().copied().find(|r| r.selection_key() == key)
        }
    }
}

/// `name | id | city | segment` line for disambiguation.
pub fn picklist_label(record: &PerformanceRecord) -> String {
    let or_dash = |s: &str| if s.is_empty() { "—".to_string() } else { s.to_string() };
    format!(
        "{} | {} | {} | {}",
        or_dash(&record.full_name),
        or_dash(&record.driver_id),
        record.working_city.as_deref().unwrap_or("—"),
        record.segment
    )
}
