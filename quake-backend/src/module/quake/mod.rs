//! PHIVOLCS earthquake module.
//!
//! Fetches the latest-earthquake HTML page, extracts tabular records,
//! and serves consistent snapshots from a TTL-bounded in-memory cache.

pub mod fetcher;
pub mod manager;
pub mod parser;
pub mod query;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use fetcher::{PageFetcher, PhivolcsFetcher};
pub use manager::QuakeManager;
pub use types::{EarthquakeRecord, QuakeSnapshot};
