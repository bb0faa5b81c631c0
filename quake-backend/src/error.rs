//! Error taxonomy for the scrape-parse-cache pipeline.

use thiserror::Error;

/// Core error kinds. Fetch and parse failures are interpreted only by the
/// cache manager; everything above it sees `DataUnavailable` at worst.
///
/// `Clone` because a failed refresh outcome is broadcast to every caller
/// joined on the shared in-flight refresh future.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuakeError {
    /// Upstream fetch failed: timeout, DNS, TLS, connection, or non-2xx.
    #[error("network error: {0}")]
    Network(String),

    /// The upstream HTML no longer yields usable records.
    #[error("parse error: {0}")]
    Parse(String),

    /// No snapshot exists, fresh or stale, and the current attempt failed.
    #[error("earthquake data unavailable: {0}")]
    DataUnavailable(String),

    /// Aggregate statistics requested over zero records.
    #[error("statistics requested over an empty record set")]
    EmptyDataset,
}
