//! The acquisition adapter: bounded retries around a provider, with an
//! optional injected cache.
//!
//! [`Fetcher::fetch`] never fails. A ticker that cannot be served within
//! the retry budget degrades to an empty series so that callers iterating
//! many instruments only ever need emptiness checks, not error handling.

use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    cache::SeriesCache,
    models::{
        request_params::{FetchInterval, FetchParams, FetchPeriod},
        series::OhlcSeries,
    },
    providers::DataProvider,
};

/// Retry and cache policy for the fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum provider attempts per fetch.
    pub retries: u32,
    /// Delay between attempts after a provider error.
    pub delay: Duration,
    /// Time-to-live for cached results.
    pub cache_ttl: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

/// Fetches one instrument's OHLC series with bounded retries.
pub struct Fetcher {
    provider: Box<dyn DataProvider + Send + Sync>,
    cache: Option<Arc<dyn SeriesCache>>,
    config: FetcherConfig,
}

impl Fetcher {
    /// Wraps a provider with the default retry policy and no cache.
    pub fn new(provider: Box<dyn DataProvider + Send + Sync>) -> Self {
        Self {
            provider,
            cache: None,
            config: FetcherConfig::default(),
        }
    }

    /// Attaches a cache collaborator.
    pub fn with_cache(mut self, cache: Arc<dyn SeriesCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the retry/cache policy.
    pub fn with_config(mut self, config: FetcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetches `ticker`, consulting the cache first.
    ///
    /// Both hits and misses (including the empty series after exhausted
    /// retries) are cached, so a dead ticker is not re-fetched until its
    /// TTL lapses.
    pub async fn fetch(
        &self,
        ticker: &str,
        period: FetchPeriod,
        interval: FetchInterval,
    ) -> OhlcSeries {
        let key = format!("{ticker}:{period}:{interval}");
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                debug!(ticker, %period, %interval, "cache hit");
                return hit;
            }
        }

        let series = self.fetch_uncached(ticker, period, interval).await;

        if let Some(cache) = &self.cache {
            cache.set(&key, series.clone(), self.config.cache_ttl);
        }
        series
    }

    async fn fetch_uncached(
        &self,
        ticker: &str,
        period: FetchPeriod,
        interval: FetchInterval,
    ) -> OhlcSeries {
        let params = FetchParams {
            ticker: ticker.to_string(),
            period,
            interval,
        };

        for attempt in 1..=self.config.retries {
            match self.provider.fetch_bars(params.clone()).await {
                Ok(series) if !series.is_empty() => return series,
                // An empty response is retried immediately; only provider
                // errors wait out the inter-attempt delay.
                Ok(_) => {
                    debug!(ticker, attempt, "provider returned no bars");
                }
                Err(err) => {
                    warn!(ticker, attempt, %err, "provider fetch failed");
                    if attempt < self.config.retries {
                        tokio::time::sleep(self.config.delay).await;
                    }
                }
            }
        }

        OhlcSeries::empty(ticker)
    }
}
