use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;

use crate::{
    models::{request_params::FetchParams, series::OhlcSeries},
    providers::{
        DataProvider, ProviderError, ProviderInitError, yahoo_chart::response::ChartResponse,
    },
};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "market_data_feed/0.1";

/// Provider for the keyless Yahoo v8 chart API.
///
/// Requests are rate-limited locally; the endpoint throttles aggressive
/// clients with HTTP 429 responses.
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl YahooChartProvider {
    /// Creates a new Yahoo chart provider. No credentials are required.
    pub fn new() -> Result<Self, ProviderInitError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            limiter: RateLimiter::direct(Quota::per_second(nonzero!(4u32))),
        })
    }

    /// Points the provider at a different host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl DataProvider for YahooChartProvider {
    async fn fetch_bars(&self, params: FetchParams) -> Result<OhlcSeries, ProviderError> {
        let ticker = params.ticker.trim();
        if ticker.is_empty() {
            return Err(ProviderError::Validation(
                "ticker must be a non-empty symbol".into(),
            ));
        }

        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url, ticker);
        let query = [
            ("range", params.period.as_wire()),
            ("interval", params.interval.as_wire()),
        ];
        let response = self.client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        let payload = response.json::<ChartResponse>().await?;
        payload.into_series(ticker)
    }
}
