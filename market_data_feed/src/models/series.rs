//! A collection of OHLC bars for a specific symbol.
//!
//! [`OhlcSeries`] enforces the ingestion invariants once, in its
//! constructor: strictly ascending unique timestamps and all four price
//! fields finite. Everything downstream can rely on them. A series is
//! immutable by convention - transformations produce new series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::bar::OhlcBar;

/// Represents a complete set of OHLC data for a single symbol.
///
/// The symbol may be a real ticker ("AAPL", "^GSPC") or a synthesized name
/// for a derived series ("^RUT/Composite Market").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcSeries {
    /// The symbol this data represents.
    pub symbol: String,
    /// The collection of OHLC bars, sorted ascending, unique timestamps.
    pub bars: Vec<OhlcBar>,
}

impl OhlcSeries {
    /// Builds a series from raw bars, dropping rows that violate the
    /// ingestion invariants.
    ///
    /// - Bars with any non-finite price field are dropped.
    /// - Bars are sorted ascending by timestamp.
    /// - Duplicate timestamps keep the last occurrence, the fresher row
    ///   when a vendor re-delivers a bar.
    pub fn from_bars(symbol: impl Into<String>, mut bars: Vec<OhlcBar>) -> Self {
        bars.retain(OhlcBar::is_complete);
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by(|dup, keep| {
            let same = dup.timestamp == keep.timestamp;
            if same {
                *keep = *dup;
            }
            same
        });
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// An empty series for the given symbol ("no data", not an error).
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when the series holds no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar, if any.
    pub fn last(&self) -> Option<&OhlcBar> {
        self.bars.last()
    }

    /// Closing prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Timestamps in bar order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }
}
