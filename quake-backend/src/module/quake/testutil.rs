//! Shared fixtures and a scripted fetcher double for module tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::fetcher::PageFetcher;
use super::parser;
use super::types::EarthquakeRecord;
use crate::error::QuakeError;

/// Trimmed-down copy of the PHIVOLCS table markup: one header row (no
/// date-time link), three data rows, one colspan spacer row.
pub(crate) const FIXTURE_HTML: &str = r#"<html>
<body>
<table class="MsoNormalTable" border="1">
  <tr>
    <td>Date - Time (PST)</td><td>Latitude</td><td>Longitude</td>
    <td>Depth</td><td>Mag</td><td>Location</td>
  </tr>
  <tr>
    <td><a href="/2026_0112_0815.html">12 January 2026 - 08:15 AM</a></td>
    <td>13.78</td><td>120.91</td><td>010</td><td>4.5</td>
    <td>009 km  N 28&deg; E of   Batangas City (Batangas)</td>
  </tr>
  <tr>
    <td><a href="/2026_0112_0603.html">12 January 2026 - 06:03 AM</a></td>
    <td>09.41</td><td>126.24</td><td>033</td><td>5.8</td>
    <td>021 km S 62&deg; E of Barcelona (Surigao Del Sur)</td>
  </tr>
  <tr>
    <td colspan="6">&nbsp;</td>
  </tr>
  <tr>
    <td><a href="/2026_0111_2247.html">11 January 2026 - 10:47 PM</a></td>
    <td>06.12</td><td>125.18</td><td>002</td><td>2.1</td>
    <td>012 km N 45&deg; W of Magsaysay (Davao Del Sur)</td>
  </tr>
</table>
</body>
</html>"#;

pub(crate) fn fixture_records() -> Vec<EarthquakeRecord> {
    parser::extract_records(FIXTURE_HTML).expect("fixture parses")
}

/// Fetcher double replaying a scripted sequence of outcomes. The last
/// entry repeats once the script is exhausted.
pub(crate) struct ScriptedFetcher {
    script: Mutex<Vec<Result<String, QuakeError>>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub(crate) fn new(script: Vec<Result<String, QuakeError>>) -> Self {
        assert!(!script.is_empty(), "script needs at least one outcome");
        Self {
            script: Mutex::new(script),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always serves the fixture page.
    pub(crate) fn ok() -> Self {
        Self::new(vec![Ok(FIXTURE_HTML.to_string())])
    }

    /// Always fails with a network error.
    pub(crate) fn failing() -> Self {
        Self::new(vec![Err(QuakeError::Network(
            "connection refused".to_string(),
        ))])
    }

    /// Sleep this long before answering, so tests can overlap callers.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> Result<String, QuakeError> {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script[0].clone()
        }
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self) -> Result<String, QuakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.next_outcome()
    }
}
