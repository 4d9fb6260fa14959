//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, a unified interface for
//! fetching OHLC series from any market data vendor. Each concrete
//! implementation (currently the Yahoo chart endpoint) handles its own
//! wire format, validation, and rate limiting behind this trait.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`Box<dyn DataProvider + Send + Sync>`) so the fetcher can be wired to
//! any vendor at runtime.

pub mod errors;
pub mod yahoo_chart;

use async_trait::async_trait;

pub use errors::{ProviderError, ProviderInitError};

use crate::models::{request_params::FetchParams, series::OhlcSeries};

/// A market data vendor capable of serving OHLC bars.
#[async_trait]
pub trait DataProvider {
    /// Fetches the bars described by `params` as one series.
    ///
    /// A successful call with no data returns an empty series, not an
    /// error; errors are reserved for transport and API failures.
    async fn fetch_bars(&self, params: FetchParams) -> Result<OhlcSeries, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::request_params::{FetchInterval, FetchPeriod};

    struct CannedProvider;

    #[async_trait]
    impl DataProvider for CannedProvider {
        async fn fetch_bars(&self, params: FetchParams) -> Result<OhlcSeries, ProviderError> {
            Ok(OhlcSeries::empty(params.ticker))
        }
    }

    // Runtime provider selection only works through the boxed trait object.
    fn get_provider(_name: &str) -> Box<dyn DataProvider + Send + Sync> {
        Box::new(CannedProvider)
    }

    #[tokio::test]
    async fn dynamic_dispatch_works() {
        let provider = get_provider("canned");
        let series = provider
            .fetch_bars(FetchParams {
                ticker: "^GSPC".into(),
                period: FetchPeriod::Y2,
                interval: FetchInterval::D1,
            })
            .await
            .unwrap();
        assert!(series.is_empty());
        assert_eq!(series.symbol, "^GSPC");
    }
}
