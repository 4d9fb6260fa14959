//! Universal parameters for requesting OHLC data from a market data provider.
//!
//! The period and interval enums are closed sets owned by the provider
//! side of the fence; their wire strings follow the Yahoo chart API
//! (`1y`/`2y`/`5y`/`max`, `1d`/`1wk`/`1mo` plus the intraday `1h`/`15m`
//! granularities the session classifier needs).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// History depth for a bars request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchPeriod {
    /// One year of history.
    #[serde(rename = "1y")]
    Y1,
    /// Two years of history.
    #[serde(rename = "2y")]
    Y2,
    /// Five years of history.
    #[serde(rename = "5y")]
    Y5,
    /// Everything the provider has.
    #[serde(rename = "max")]
    Max,
}

impl FetchPeriod {
    /// The provider wire string for this period.
    pub fn as_wire(&self) -> &'static str {
        match self {
            FetchPeriod::Y1 => "1y",
            FetchPeriod::Y2 => "2y",
            FetchPeriod::Y5 => "5y",
            FetchPeriod::Max => "max",
        }
    }
}

impl fmt::Display for FetchPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for FetchPeriod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1y" => Ok(FetchPeriod::Y1),
            "2y" => Ok(FetchPeriod::Y2),
            "5y" => Ok(FetchPeriod::Y5),
            "max" => Ok(FetchPeriod::Max),
            _ => Err(format!("unknown period: {s}")),
        }
    }
}

/// Bar granularity for a bars request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchInterval {
    /// Daily bars.
    #[serde(rename = "1d")]
    D1,
    /// Weekly bars.
    #[serde(rename = "1wk")]
    Wk1,
    /// Monthly bars.
    #[serde(rename = "1mo")]
    Mo1,
    /// Hourly bars (intraday).
    #[serde(rename = "1h")]
    H1,
    /// Fifteen-minute bars (intraday).
    #[serde(rename = "15m")]
    M15,
}

impl FetchInterval {
    /// The provider wire string for this interval.
    pub fn as_wire(&self) -> &'static str {
        match self {
            FetchInterval::D1 => "1d",
            FetchInterval::Wk1 => "1wk",
            FetchInterval::Mo1 => "1mo",
            FetchInterval::H1 => "1h",
            FetchInterval::M15 => "15m",
        }
    }

    /// True for sub-daily granularities.
    pub fn is_intraday(&self) -> bool {
        matches!(self, FetchInterval::H1 | FetchInterval::M15)
    }
}

impl fmt::Display for FetchInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for FetchInterval {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(FetchInterval::D1),
            "1wk" => Ok(FetchInterval::Wk1),
            "1mo" => Ok(FetchInterval::Mo1),
            "1h" => Ok(FetchInterval::H1),
            "15m" => Ok(FetchInterval::M15),
            _ => Err(format!("unknown interval: {s}")),
        }
    }
}

/// Parameters for one bars request against any provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Symbol to request (e.g., `"AAPL"`, `"^GSPC"`).
    pub ticker: String,
    /// History depth.
    pub period: FetchPeriod,
    /// Bar granularity.
    pub interval: FetchInterval,
}
