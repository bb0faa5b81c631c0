//! Pure query functions over a snapshot's records.
//!
//! Every function is deterministic and side-effect-free; callers hand in
//! whatever record sequence the cache manager gave them.

use std::cmp::Ordering;

use super::parser::parse_numeric;
use super::types::{EarthquakeRecord, QuakeStats, ValueStats};
use crate::error::QuakeError;

/// Records with `magnitude_numeric` within `[min, max]` (`max` unbounded
/// when absent).
pub fn filter_by_magnitude(
    records: &[EarthquakeRecord],
    min: f64,
    max: Option<f64>,
) -> Vec<EarthquakeRecord> {
    records
        .iter()
        .filter(|r| r.magnitude_numeric >= min)
        .filter(|r| max.is_none_or(|max| r.magnitude_numeric <= max))
        .cloned()
        .collect()
}

/// Case-insensitive substring match against `location`.
pub fn filter_by_location(records: &[EarthquakeRecord], needle: &str) -> Vec<EarthquakeRecord> {
    let needle = needle.to_lowercase();
    records
        .iter()
        .filter(|r| r.location.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// First `n` records sorted descending by `magnitude_numeric`. The sort is
/// stable, so ties keep their snapshot order. Bounding `n` to `1..=50` is
/// the HTTP boundary's job, not this function's.
pub fn top_by_magnitude(records: &[EarthquakeRecord], n: usize) -> Vec<EarthquakeRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        b.magnitude_numeric
            .partial_cmp(&a.magnitude_numeric)
            .unwrap_or(Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

/// First `n` records in snapshot order. Relies on the upstream page
/// publishing most-recent-first; the order is never verified here.
pub fn most_recent(records: &[EarthquakeRecord], n: usize) -> Vec<EarthquakeRecord> {
    records.iter().take(n).cloned().collect()
}

fn value_stats(values: &[f64]) -> ValueStats {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let average = values.iter().sum::<f64>() / values.len() as f64;
    ValueStats { max, min, average }
}

/// Aggregate statistics over the records. Depth values use the same lossy
/// numeric-prefix parse as `magnitude_numeric`. Fails with
/// [`QuakeError::EmptyDataset`] on zero records; max/min/average are
/// undefined over an empty set and must never degrade to NaN or zeroes.
pub fn compute_stats(records: &[EarthquakeRecord]) -> Result<QuakeStats, QuakeError> {
    let most_recent = records.first().ok_or(QuakeError::EmptyDataset)?;

    let mut strongest = most_recent;
    for record in records {
        // strict > keeps the first record on ties
        if record.magnitude_numeric > strongest.magnitude_numeric {
            strongest = record;
        }
    }

    let magnitudes: Vec<f64> = records.iter().map(|r| r.magnitude_numeric).collect();
    let depths: Vec<f64> = records.iter().map(|r| parse_numeric(&r.depth)).collect();

    Ok(QuakeStats {
        total_count: records.len(),
        magnitude: value_stats(&magnitudes),
        depth: value_stats(&depths),
        most_recent: most_recent.clone(),
        strongest: strongest.clone(),
    })
}
