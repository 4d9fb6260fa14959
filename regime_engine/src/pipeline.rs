//! Market-level orchestration.
//!
//! Builds the benchmark composite (with ETF fallbacks when an index symbol
//! returns nothing), the VIX ratio, and the index-vs-market flow ratios,
//! then classifies each entity on all four timeframes into one summary row.
//! Acquisition failures degrade to absent entities rather than errors, so
//! the table always comes back, possibly with fewer rows.

use indexmap::IndexMap;
use market_data_feed::{
    fetcher::Fetcher,
    models::{
        request_params::{FetchInterval, FetchPeriod},
        series::OhlcSeries,
    },
};
use tracing::{debug, info, warn};

use crate::{
    aggregate::{self, RegimeSummary},
    algebra,
    classify::{self, TimeframeProfile, session, session::SessionProfile},
    config::EngineConfig,
    synth,
    universe::Universe,
};

/// One composite member: the index symbol to prefer, and the ETF proxy to
/// fall back on when the index returns no data.
#[derive(Debug, Clone)]
pub struct BenchmarkMember {
    /// Preferred index symbol.
    pub primary: String,
    /// ETF substitute.
    pub fallback: String,
}

/// The set of benchmarks the market composite is built from.
#[derive(Debug, Clone)]
pub struct BenchmarkBasket {
    /// Members in composite order.
    pub members: Vec<BenchmarkMember>,
}

impl Default for BenchmarkBasket {
    fn default() -> Self {
        let pairs = [
            ("^IXIC", "QQQ"),
            ("^GSPC", "SPY"),
            ("^DJI", "DIA"),
            ("^RUT", "IWM"),
        ];
        Self {
            members: pairs
                .into_iter()
                .map(|(primary, fallback)| BenchmarkMember {
                    primary: primary.to_string(),
                    fallback: fallback.to_string(),
                })
                .collect(),
        }
    }
}

/// Classifier profiles for all four timeframes.
#[derive(Debug, Clone)]
pub struct Profiles {
    /// Opening-range profile over the long window.
    pub yearly: TimeframeProfile,
    /// Medium-window profile.
    pub weekly: TimeframeProfile,
    /// Single-bar-range profile.
    pub daily: TimeframeProfile,
    /// Intraday session profile.
    pub session: SessionProfile,
}

impl Profiles {
    /// Derives the profile set from an engine configuration.
    ///
    /// Errors only on an invalid session timezone.
    pub fn from_config(cfg: &EngineConfig) -> anyhow::Result<Self> {
        let [yearly, weekly, daily] = cfg.timeframe_profiles();
        Ok(Self {
            yearly,
            weekly,
            daily,
            session: cfg.session_profile()?,
        })
    }
}

/// Fetches every basket member, substituting the fallback when the primary
/// comes back empty, and merges the survivors into a geometric composite
/// named `Composite Market`. Empty when nothing could be fetched.
pub async fn build_market_composite(
    fetcher: &Fetcher,
    basket: &BenchmarkBasket,
    period: FetchPeriod,
    interval: FetchInterval,
) -> OhlcSeries {
    let mut members = Vec::with_capacity(basket.members.len());
    for member in &basket.members {
        let mut series = fetcher.fetch(&member.primary, period, interval).await;
        if series.is_empty() {
            warn!(
                primary = %member.primary,
                fallback = %member.fallback,
                "no data for primary, trying fallback"
            );
            series = fetcher.fetch(&member.fallback, period, interval).await;
        }
        if series.is_empty() {
            warn!(primary = %member.primary, "skipping basket member with no data");
        } else {
            members.push(series);
        }
    }
    synth::geometric_index("Composite Market", &members)
}

/// Runs all four classifications on one instrument and folds the latest
/// state of each into a single summary row.
pub fn classify_entity(name: &str, series: &OhlcSeries, profiles: &Profiles) -> RegimeSummary {
    let yearly = classify::classify(series, &profiles.yearly);
    let weekly = classify::classify(series, &profiles.weekly);
    let daily = classify::classify(series, &profiles.daily);
    let sessions = session::classify_sessions(series, &profiles.session);
    aggregate::aggregate(name, &yearly, &weekly, &daily, &sessions)
}

/// Builds the market regime table: the composite, the composite/VIX ratio,
/// and per-index flow ratios against the composite, one summary row each.
///
/// Entities whose inputs could not be fetched (or share no timestamps) are
/// dropped from the table instead of failing it.
pub async fn market_regime_table(
    fetcher: &Fetcher,
    cfg: &EngineConfig,
    profiles: &Profiles,
) -> Vec<RegimeSummary> {
    let (period, interval) = (cfg.period, cfg.interval);

    let basket = BenchmarkBasket::default();
    let composite = build_market_composite(fetcher, &basket, period, interval).await;
    let vix = fetcher.fetch("^VIX", period, interval).await;

    let mut entities: IndexMap<String, OhlcSeries> = IndexMap::new();
    if composite.is_empty() {
        warn!("market composite is empty, table will hold ratio entities only");
    } else {
        entities.insert("Composite Market".to_string(), composite.clone());
        if vix.is_empty() {
            warn!("no VIX data, skipping Composite / VIX");
        } else {
            let ratio = algebra::divide(&composite, &vix);
            if !ratio.is_empty() {
                entities.insert("Composite / VIX".to_string(), ratio);
            }
        }

        let flow_names = [
            ("^RUT", "Russell 2000 / Market"),
            ("^IXIC", "Nasdaq / Market"),
            ("^DJI", "Dow / Market"),
            ("^GSPC", "S&P 500 / Market"),
        ];
        for (ticker, name) in flow_names {
            let index = fetcher.fetch(ticker, period, interval).await;
            if index.is_empty() {
                debug!(ticker, "no data for flow ratio, skipping");
                continue;
            }
            let flow = algebra::divide(&index, &composite);
            if !flow.is_empty() {
                entities.insert(name.to_string(), flow);
            }
        }
    }

    info!(entities = entities.len(), "classifying market entities");
    entities
        .iter()
        .map(|(name, series)| classify_entity(name, series, profiles))
        .collect()
}

/// Classifies each sub-industry composite relative to its benchmark.
///
/// Each row is named `{sub-industry} / {benchmark}`, built from the ratio
/// of the synthetic index to the benchmark's series. Sub-industries with
/// no benchmark mapping, no benchmark data, or a ratio sharing no
/// timestamps are dropped from the table.
pub fn subindustry_relative_table(
    universe: &Universe,
    sub_indices: &IndexMap<String, OhlcSeries>,
    ohlc_map: &IndexMap<String, OhlcSeries>,
    profiles: &Profiles,
) -> Vec<RegimeSummary> {
    let mut rows = Vec::new();
    for (sub, index) in sub_indices {
        let Some(benchmark) = universe.benchmarks.get(sub) else {
            debug!(sub = %sub, "no benchmark mapping, skipping");
            continue;
        };
        let Some(bench_series) = ohlc_map.get(benchmark).filter(|s| !s.is_empty()) else {
            warn!(sub = %sub, benchmark = %benchmark, "no benchmark data, skipping");
            continue;
        };
        let ratio = algebra::divide(index, bench_series);
        if ratio.is_empty() {
            continue;
        }
        rows.push(classify_entity(&format!("{sub} / {benchmark}"), &ratio, profiles));
    }
    rows
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use market_data_feed::{
        fetcher::FetcherConfig,
        models::{bar::OhlcBar, request_params::FetchParams},
        providers::{DataProvider, ProviderError},
    };

    use super::*;

    struct CannedProvider {
        data: HashMap<String, OhlcSeries>,
    }

    #[async_trait]
    impl DataProvider for CannedProvider {
        async fn fetch_bars(&self, params: FetchParams) -> Result<OhlcSeries, ProviderError> {
            Ok(self
                .data
                .get(&params.ticker)
                .cloned()
                .unwrap_or_else(|| OhlcSeries::empty(&params.ticker)))
        }
    }

    fn daily_series(symbol: &str, closes: &[f64]) -> OhlcSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcBar {
                timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000 + i as i64 * 86_400, 0)
                    .unwrap(),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
            })
            .collect();
        OhlcSeries::from_bars(symbol, bars)
    }

    fn fetcher_with(data: HashMap<String, OhlcSeries>) -> Fetcher {
        Fetcher::new(Box::new(CannedProvider { data })).with_config(FetcherConfig {
            retries: 1,
            delay: std::time::Duration::ZERO,
            cache_ttl: std::time::Duration::from_secs(60),
        })
    }

    fn trending(n: usize) -> Vec<f64> {
        (0..n).map(|i| 50.0 + i as f64).collect()
    }

    #[tokio::test]
    async fn composite_prefers_primaries() {
        let closes = trending(40);
        let data: HashMap<_, _> = ["^IXIC", "^GSPC", "^DJI", "^RUT"]
            .into_iter()
            .map(|t| (t.to_string(), daily_series(t, &closes)))
            .collect();
        let fetcher = fetcher_with(data);

        let composite = build_market_composite(
            &fetcher,
            &BenchmarkBasket::default(),
            FetchPeriod::Y2,
            FetchInterval::D1,
        )
        .await;
        assert_eq!(composite.symbol, "Composite Market");
        assert_eq!(composite.len(), 40);
        // identical members: geometric mean reproduces the member closes
        assert!((composite.bars[0].close - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn composite_substitutes_fallback_for_missing_primary() {
        let closes = trending(40);
        let mut data: HashMap<_, _> = ["^GSPC", "^DJI", "^RUT"]
            .into_iter()
            .map(|t| (t.to_string(), daily_series(t, &closes)))
            .collect();
        // ^IXIC absent, ETF proxy present
        data.insert("QQQ".to_string(), daily_series("QQQ", &closes));
        let fetcher = fetcher_with(data);

        let composite = build_market_composite(
            &fetcher,
            &BenchmarkBasket::default(),
            FetchPeriod::Y2,
            FetchInterval::D1,
        )
        .await;
        assert_eq!(composite.len(), 40);
    }

    #[tokio::test]
    async fn empty_universe_gives_empty_composite() {
        let fetcher = fetcher_with(HashMap::new());
        let composite = build_market_composite(
            &fetcher,
            &BenchmarkBasket::default(),
            FetchPeriod::Y2,
            FetchInterval::D1,
        )
        .await;
        assert!(composite.is_empty());
    }

    #[tokio::test]
    async fn table_holds_composite_vix_ratio_and_flows_in_order() {
        let closes = trending(40);
        let data: HashMap<_, _> = ["^IXIC", "^GSPC", "^DJI", "^RUT", "^VIX"]
            .into_iter()
            .map(|t| (t.to_string(), daily_series(t, &closes)))
            .collect();
        let fetcher = fetcher_with(data);
        let cfg = EngineConfig::default();
        let profiles = Profiles::from_config(&cfg).unwrap();

        let rows = market_regime_table(&fetcher, &cfg, &profiles).await;
        let names: Vec<_> = rows.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(
            names,
            [
                "Composite Market",
                "Composite / VIX",
                "Russell 2000 / Market",
                "Nasdaq / Market",
                "Dow / Market",
                "S&P 500 / Market",
            ]
        );
        // 40 daily bars cover the long opening-range window
        assert!(rows[0].macro_regime.is_some());
        assert!(rows[0].close.is_some());
    }

    #[tokio::test]
    async fn missing_vix_drops_only_the_ratio_row() {
        let closes = trending(40);
        let data: HashMap<_, _> = ["^IXIC", "^GSPC", "^DJI", "^RUT"]
            .into_iter()
            .map(|t| (t.to_string(), daily_series(t, &closes)))
            .collect();
        let fetcher = fetcher_with(data);
        let cfg = EngineConfig::default();
        let profiles = Profiles::from_config(&cfg).unwrap();

        let rows = market_regime_table(&fetcher, &cfg, &profiles).await;
        assert!(rows.iter().all(|r| r.entity != "Composite / VIX"));
        assert!(rows.iter().any(|r| r.entity == "Composite Market"));
    }

    #[tokio::test]
    async fn no_data_at_all_gives_empty_table() {
        let fetcher = fetcher_with(HashMap::new());
        let cfg = EngineConfig::default();
        let profiles = Profiles::from_config(&cfg).unwrap();
        assert!(market_regime_table(&fetcher, &cfg, &profiles).await.is_empty());
    }

    #[test]
    fn subindustry_ratios_classify_against_their_benchmarks() {
        let closes = trending(40);
        let mut sub_industries = IndexMap::new();
        sub_industries.insert("Semis".to_string(), vec!["NVDA".into(), "AMD".into()]);
        sub_industries.insert("Banks".to_string(), vec!["JPM".into()]);
        sub_industries.insert("Retail".to_string(), vec!["WMT".into()]);
        let mut benchmarks = IndexMap::new();
        benchmarks.insert("Semis".to_string(), "SMH".to_string());
        // Banks' benchmark has no data, Retail has no mapping at all
        benchmarks.insert("Banks".to_string(), "XLF".to_string());
        let universe = Universe {
            sub_industries,
            benchmarks,
        };

        let mut ohlc_map = IndexMap::new();
        for t in ["NVDA", "AMD", "JPM", "WMT", "SMH"] {
            ohlc_map.insert(t.to_string(), daily_series(t, &closes));
        }

        let sub_indices = crate::universe::build_subindustry_indices(&universe, &ohlc_map, 100.0);
        let profiles = Profiles::from_config(&EngineConfig::default()).unwrap();
        let rows = subindustry_relative_table(&universe, &sub_indices, &ohlc_map, &profiles);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity, "Semis / SMH");
        assert!(rows[0].macro_regime.is_some());
    }

    #[test]
    fn classify_entity_labels_all_timeframes_for_long_history() {
        let series = daily_series("AAPL", &trending(60));
        let profiles = Profiles::from_config(&EngineConfig::default()).unwrap();
        let row = classify_entity("AAPL", &series, &profiles);
        assert_eq!(row.entity, "AAPL");
        assert!(row.macro_regime.is_some());
        assert!(row.weekly_macro.is_some());
        assert!(row.daily_macro.is_some());
        // daily bars never produce a session snapshot
        assert!(row.session.is_none());
    }
}
