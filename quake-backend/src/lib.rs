//! Read-only earthquake data service scraped from the PHIVOLCS
//! latest-earthquake page.
//!
//! The core is the scrape-parse-cache pipeline under [`module::quake`]:
//! a reqwest fetcher, an HTML table extractor, and a TTL-bounded snapshot
//! cache with stale-on-error fallback. [`service`] is the thin axum layer
//! on top.

pub mod config;
pub mod error;
pub mod logging;
pub mod module;
pub mod service;
