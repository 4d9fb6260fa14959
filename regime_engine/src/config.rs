//! Engine configuration: parsing, defaults, and profile construction.
//!
//! A TOML-backed value object covering the operator-tunable knobs: fetch
//! defaults (period/interval), cache TTL, the adapter's retry budget, the
//! transition near-threshold, and the session timezone. Everything has a
//! default, so an empty TOML document (or no file at all) is a valid
//! configuration.

use std::time::Duration;

use anyhow::Context;
use market_data_feed::{
    fetcher::FetcherConfig,
    models::request_params::{FetchInterval, FetchPeriod},
};
use serde::{Deserialize, Serialize};

use crate::classify::{TimeframeProfile, session::SessionProfile};

/// Operator-facing engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Default history depth for fetches.
    pub period: FetchPeriod,
    /// Default bar granularity for fetches.
    pub interval: FetchInterval,
    /// Cache time-to-live in seconds.
    pub cache_ttl_secs: u64,
    /// Provider attempts per fetch.
    pub retries: u32,
    /// Delay between attempts in seconds.
    pub retry_delay_secs: u64,
    /// Transition threshold in ATR units.
    pub near_thresh_atr: f64,
    /// IANA timezone for session windows.
    pub session_tz: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            period: FetchPeriod::Y2,
            interval: FetchInterval::D1,
            cache_ttl_secs: 3600,
            retries: 3,
            retry_delay_secs: 5,
            near_thresh_atr: 0.5,
            session_tz: "America/New_York".to_string(),
        }
    }
}

impl EngineConfig {
    /// The retry/cache policy the acquisition adapter should run with.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            retries: self.retries,
            delay: Duration::from_secs(self.retry_delay_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
        }
    }

    /// Yearly, weekly, and daily classifier profiles with this config's
    /// near-threshold applied.
    pub fn timeframe_profiles(&self) -> [TimeframeProfile; 3] {
        [
            TimeframeProfile::yearly().with_near_thresh(self.near_thresh_atr),
            TimeframeProfile::weekly().with_near_thresh(self.near_thresh_atr),
            TimeframeProfile::daily().with_near_thresh(self.near_thresh_atr),
        ]
    }

    /// Session-mode profile for this config's timezone and threshold.
    ///
    /// Errors only on an invalid timezone name.
    pub fn session_profile(&self) -> anyhow::Result<SessionProfile> {
        let tz = self
            .session_tz
            .parse()
            .ok()
            .with_context(|| format!("bad tz: {}", self.session_tz))?;
        Ok(SessionProfile {
            tz,
            near_thresh_atr: self.near_thresh_atr,
            ..SessionProfile::default()
        })
    }
}

/// Parses an engine configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<EngineConfig> {
    toml::from_str(toml_str).context("failed to parse engine config TOML")
}

/// Reads an engine configuration TOML file from disk.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<EngineConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
