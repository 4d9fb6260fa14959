//! Canonical in-memory representation of a time-series bar (OHLC).
//!
//! This struct is the standard output row for all
//! [`DataProvider`](crate::providers::DataProvider) implementations and the
//! input row for every transformation in the regime engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLC bar for a given timestamp.
///
/// Vendor-agnostic; derived series (ratios, composites) are made of the
/// same bar type as fetched series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,
}

impl OhlcBar {
    /// True when all four price fields are finite numbers.
    pub fn is_complete(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}
