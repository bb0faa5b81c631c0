//! Snapshot cache manager.
//!
//! Owns the single snapshot slot, enforces TTL-based freshness, falls back
//! to stale data when a refresh fails, and bounds upstream load by sharing
//! one in-flight refresh among concurrent callers.

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::fetcher::PageFetcher;
use super::parser;
use super::types::QuakeSnapshot;
use crate::error::QuakeError;

type RefreshFuture = Shared<BoxFuture<'static, Result<QuakeSnapshot, QuakeError>>>;
type SnapshotSlot = Arc<RwLock<Option<QuakeSnapshot>>>;

pub struct QuakeManager {
    fetcher: Arc<dyn PageFetcher>,
    ttl: Duration,
    /// The one live snapshot (None until the first successful refresh).
    /// Writers install a new value; the old one is never mutated.
    snapshot: SnapshotSlot,
    /// At most one refresh runs at a time; late callers join it.
    in_flight: Arc<Mutex<Option<RefreshFuture>>>,
}

impl QuakeManager {
    pub fn new(fetcher: Arc<dyn PageFetcher>, cache_ttl_secs: u64) -> Self {
        Self {
            fetcher,
            ttl: Duration::seconds(cache_ttl_secs as i64),
            snapshot: Arc::new(RwLock::new(None)),
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a usable snapshot: the cached one while it is fresh, a newly
    /// fetched one otherwise, or the stale one when the refresh fails.
    ///
    /// Fails with [`QuakeError::DataUnavailable`] only when no fetch has
    /// ever succeeded and the current attempt also fails.
    pub async fn get_snapshot(&self, force_refresh: bool) -> Result<QuakeSnapshot, QuakeError> {
        if !force_refresh {
            if let Some(snapshot) = self.fresh_snapshot().await {
                return Ok(snapshot);
            }
        }

        let refresh = self.join_or_start_refresh().await;
        match refresh.await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                // The TTL is a freshness hint, not a correctness bound:
                // slightly-old data beats no data.
                let stale = self.snapshot.read().await.clone();
                match stale {
                    Some(snapshot) => {
                        warn!(
                            "Refresh failed ({err}), serving stale snapshot from {}",
                            snapshot.fetched_at
                        );
                        Ok(snapshot)
                    }
                    None => Err(QuakeError::DataUnavailable(err.to_string())),
                }
            }
        }
    }

    async fn fresh_snapshot(&self) -> Option<QuakeSnapshot> {
        let guard = self.snapshot.read().await;
        guard
            .as_ref()
            .filter(|snapshot| Utc::now() - snapshot.fetched_at < self.ttl)
            .cloned()
    }

    /// Hand back the in-flight refresh if one exists, otherwise start one.
    /// The shared future broadcasts the outcome, success or failure, to
    /// every joined caller, so a burst of cold-cache requests still costs
    /// exactly one upstream fetch.
    async fn join_or_start_refresh(&self) -> RefreshFuture {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(refresh) = in_flight.as_ref() {
            return refresh.clone();
        }

        let fetcher = Arc::clone(&self.fetcher);
        let slot = Arc::clone(&self.snapshot);
        let in_flight_slot = Arc::clone(&self.in_flight);

        let refresh = async move {
            let result = refresh_once(fetcher, slot).await;
            // Clear the slot so the next stale request starts a new attempt
            *in_flight_slot.lock().await = None;
            result
        }
        .boxed()
        .shared();

        *in_flight = Some(refresh.clone());
        refresh
    }
}

/// One fetch + extract cycle; on success the new snapshot replaces the old
/// one atomically.
async fn refresh_once(
    fetcher: Arc<dyn PageFetcher>,
    slot: SnapshotSlot,
) -> Result<QuakeSnapshot, QuakeError> {
    let html = fetcher.fetch_page().await?;
    let records = parser::extract_records(&html)?;

    let snapshot = QuakeSnapshot {
        fetched_at: Utc::now(),
        records,
    };
    info!("Cached {} earthquake records", snapshot.records.len());

    *slot.write().await = Some(snapshot.clone());
    Ok(snapshot)
}
