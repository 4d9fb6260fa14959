//! Instrument membership input.
//!
//! The engine consumes an already-validated mapping of sub-industry to
//! member tickers plus a benchmark ticker per sub-industry; parsing and
//! column validation of the tabular source stay outside the core.

use indexmap::IndexMap;
use market_data_feed::models::series::OhlcSeries;
use serde::{Deserialize, Serialize};

use crate::synth;

/// Validated membership mapping for one universe of instruments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    /// Sub-industry name to member tickers, in input order.
    pub sub_industries: IndexMap<String, Vec<String>>,
    /// Sub-industry name to its designated benchmark ticker.
    #[serde(default)]
    pub benchmarks: IndexMap<String, String>,
}

impl Universe {
    /// Every ticker the universe references (members and benchmarks),
    /// sorted and de-duplicated.
    pub fn tickers(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .sub_industries
            .values()
            .flatten()
            .chain(self.benchmarks.values())
            .cloned()
            .collect();
        out.sort();
        out.dedup();
        out
    }
}

/// Builds an equal-weight synthetic OHLC series per sub-industry.
///
/// Members missing from `ohlc_map` (or present but empty) are skipped;
/// sub-industries whose composite comes out empty are omitted from the
/// result entirely.
pub fn build_subindustry_indices(
    universe: &Universe,
    ohlc_map: &IndexMap<String, OhlcSeries>,
    base: f64,
) -> IndexMap<String, OhlcSeries> {
    let mut out = IndexMap::new();
    for (sub, tickers) in &universe.sub_industries {
        let members: IndexMap<String, OhlcSeries> = tickers
            .iter()
            .filter_map(|t| ohlc_map.get(t).map(|s| (t.clone(), s.clone())))
            .collect();
        let index = synth::equal_weight_index(sub, &members, base);
        if !index.is_empty() {
            out.insert(sub.clone(), index);
        }
    }
    out
}
