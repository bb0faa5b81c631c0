//! Earthquake record and snapshot value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed earthquake, fields kept as published upstream.
///
/// Only `magnitude_numeric` is derived; it is a lossy convenience for
/// sorting and filtering, never a substitute for the verbatim `magnitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    /// Calendar date exactly as published, e.g. "12 January 2026"
    pub date: String,
    /// Time of day exactly as published, e.g. "08:15 AM"
    pub time: String,
    /// Coordinate string with hemisphere suffix, not parsed to degrees
    pub latitude: String,
    pub longitude: String,
    /// Depth string with unit suffix, e.g. "010"
    pub depth: String,
    /// Magnitude exactly as published (may carry non-numeric markers)
    pub magnitude: String,
    /// Best-effort numeric parse of `magnitude`; 0.0 when unparsable
    pub magnitude_numeric: f64,
    /// Free-text location, whitespace-normalized
    pub location: String,
}

/// The single cached view of the upstream page.
///
/// Records stay in upstream publication order (observed most-recent-first);
/// ingest never re-sorts. A snapshot is replaced wholesale on a successful
/// refresh and never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeSnapshot {
    /// When this snapshot was captured
    pub fetched_at: DateTime<Utc>,
    pub records: Vec<EarthquakeRecord>,
}

/// Max / min / mean over one numeric dimension of a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueStats {
    pub max: f64,
    pub min: f64,
    pub average: f64,
}

/// Aggregate statistics over a snapshot's records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuakeStats {
    pub total_count: usize,
    pub magnitude: ValueStats,
    pub depth: ValueStats,
    pub most_recent: EarthquakeRecord,
    pub strongest: EarthquakeRecord,
}
