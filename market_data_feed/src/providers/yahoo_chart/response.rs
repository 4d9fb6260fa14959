//! Deserialization of the Yahoo v8 chart payload.
//!
//! The payload carries parallel arrays: one `timestamp` vector plus one
//! vector per quote field, with `null` holes for halted or missing bars.
//! Conversion zips them back into rows and drops any row missing one of
//! the four OHLC fields.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    models::{bar::OhlcBar, series::OhlcSeries},
    providers::ProviderError,
};

/// Top-level chart response.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    /// The single `chart` envelope.
    pub chart: Chart,
}

/// The `chart` envelope: either results or an API error.
#[derive(Debug, Deserialize)]
pub struct Chart {
    /// One result per requested symbol (the endpoint serves one).
    pub result: Option<Vec<ChartResult>>,
    /// API-reported failure, e.g. an unknown symbol.
    pub error: Option<ChartError>,
}

/// API-reported error detail.
#[derive(Debug, Deserialize)]
pub struct ChartError {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable description.
    pub description: String,
}

/// One chart result: timestamps plus quote arrays.
#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Bar timestamps as Unix seconds.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    /// Quote indicator arrays.
    pub indicators: Indicators,
}

/// The `indicators` container.
#[derive(Debug, Deserialize)]
pub struct Indicators {
    /// Quote blocks; in practice exactly one.
    pub quote: Vec<Quote>,
}

/// Parallel per-field arrays with `null` holes.
#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    /// Opening prices.
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    /// High prices.
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    /// Low prices.
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    /// Closing prices.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Converts the payload into a series for `ticker`.
    ///
    /// API errors map to [`ProviderError::Api`]; a missing result block is
    /// "no data" and yields an empty series.
    pub fn into_series(self, ticker: &str) -> Result<OhlcSeries, ProviderError> {
        if let Some(err) = self.chart.error {
            return Err(ProviderError::Api(format!("{}: {}", err.code, err.description)));
        }

        let Some(result) = self.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.swap_remove(0))
            }
        }) else {
            return Ok(OhlcSeries::empty(ticker));
        };

        let Some(quote) = result.indicators.quote.first() else {
            return Ok(OhlcSeries::empty(ticker));
        };

        let mut bars = Vec::with_capacity(result.timestamp.len());
        for (i, secs) in result.timestamp.iter().enumerate() {
            let (Some(open), Some(high), Some(low), Some(close)) = (
                field(&quote.open, i),
                field(&quote.high, i),
                field(&quote.low, i),
                field(&quote.close, i),
            ) else {
                continue;
            };
            let Some(timestamp) = DateTime::<Utc>::from_timestamp(*secs, 0) else {
                continue;
            };
            bars.push(OhlcBar {
                timestamp,
                open,
                high,
                low,
                close,
            });
        }

        Ok(OhlcSeries::from_bars(ticker, bars))
    }
}

fn field(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}
