//! Market data acquisition for the regime engine.
//!
//! This crate owns the vendor-facing half of the pipeline: the canonical
//! OHLC series model, the [`providers::DataProvider`] abstraction, a REST
//! provider for the Yahoo chart endpoint, an injectable series cache, and
//! the retrying [`fetcher::Fetcher`] that downstream code calls.
//!
//! The fetcher never surfaces acquisition failures: a ticker that cannot be
//! fetched within the retry budget yields an empty series, and callers are
//! expected to skip empty series and keep going.

pub mod cache;
pub mod fetcher;
pub mod models;
pub mod providers;
