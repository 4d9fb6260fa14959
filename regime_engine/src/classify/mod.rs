//! The regime classifier.
//!
//! Re-evaluated independently per bar; no state is carried across bars
//! except through the rolling windows themselves. The opening-range
//! window (hi/lo/mid over the trailing `window` bars) drives the macro
//! label, a fast/slow moving-average pair drives the micro label, and an
//! ATR-distance test drives the transition warning.
//!
//! Bars before the window fills produce no output row at all -
//! "insufficient data" is absence, never a default label.

pub mod labels;
pub mod session;

use chrono::{DateTime, Utc};
use market_data_feed::models::series::OhlcSeries;
use serde::{Deserialize, Serialize};

pub use labels::{MacroRegime, MicroRegime, Transition};

use crate::algebra;

/// Near-threshold for transition warnings, in ATR units.
pub const NEAR_THRESH_ATR: f64 = 0.5;
/// Fast moving-average length in bars.
pub const FAST_LEN: usize = 5;
/// Slow moving-average length in bars.
pub const SLOW_LEN: usize = 10;
/// Opening-range window for the yearly-scale profile.
pub const YEARLY_RANGE_BARS: usize = 28;

/// Immutable per-timeframe classifier parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeframeProfile {
    /// Opening-range window length in bars.
    pub window: usize,
    /// ATR period in bars.
    pub atr_period: usize,
    /// Fast moving-average length.
    pub fast_len: usize,
    /// Slow moving-average length.
    pub slow_len: usize,
    /// Transition threshold in ATR units.
    pub near_thresh_atr: f64,
}

impl TimeframeProfile {
    /// Yearly-scale profile: 28-bar opening range, 20-bar ATR.
    pub fn yearly() -> Self {
        Self {
            window: YEARLY_RANGE_BARS,
            atr_period: 20,
            fast_len: FAST_LEN,
            slow_len: SLOW_LEN,
            near_thresh_atr: NEAR_THRESH_ATR,
        }
    }

    /// Weekly-scale profile: 5-bar opening range, 14-bar ATR.
    pub fn weekly() -> Self {
        Self {
            window: 5,
            atr_period: 14,
            ..Self::yearly()
        }
    }

    /// Daily-scale profile: 1-bar opening range, 14-bar ATR.
    pub fn daily() -> Self {
        Self {
            window: 1,
            atr_period: 14,
            ..Self::yearly()
        }
    }

    /// Same profile with a different transition threshold.
    pub fn with_near_thresh(mut self, near_thresh_atr: f64) -> Self {
        self.near_thresh_atr = near_thresh_atr;
        self
    }
}

/// One classified output row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeBar {
    /// Timestamp of the underlying input bar.
    pub timestamp: DateTime<Utc>,
    /// Closing price at this bar.
    pub close: f64,
    /// Opening-range high over the trailing window.
    pub hi: f64,
    /// Opening-range low over the trailing window.
    pub lo: f64,
    /// Midpoint of the opening range.
    pub mid: f64,
    /// Coarse regime label.
    pub macro_regime: MacroRegime,
    /// Moving-average confirmation label.
    pub micro: MicroRegime,
    /// Boundary-proximity warning.
    pub transition: Transition,
}

/// A classified frame: one [`RegimeBar`] per input bar once the window is
/// populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegimeFrame {
    /// Classified rows in bar order.
    pub bars: Vec<RegimeBar>,
}

impl RegimeFrame {
    /// True when no bar produced output (empty input or short history).
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent classified row, if any.
    pub fn last(&self) -> Option<&RegimeBar> {
        self.bars.last()
    }
}

/// Classifies every bar of `series` under `profile`.
///
/// Output starts at the first bar with a fully populated opening-range
/// window; a series shorter than the window yields an empty frame.
pub fn classify(series: &OhlcSeries, profile: &TimeframeProfile) -> RegimeFrame {
    let n = series.len();
    let w = profile.window;
    if w == 0 || n < w {
        return RegimeFrame::default();
    }

    let atr = algebra::average_true_range(series, profile.atr_period);
    let closes = series.closes();
    let mut bars = Vec::with_capacity(n - w + 1);

    for i in (w - 1)..n {
        let window = &series.bars[i + 1 - w..=i];
        let hi = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lo = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let mid = (hi + lo) / 2.0;
        let close = closes[i];

        let macro_regime = classify_macro(close, hi, lo, mid);
        let fast = algebra::trailing_sma(&closes, i, profile.fast_len);
        let slow = algebra::trailing_sma(&closes, i, profile.slow_len);
        let micro = classify_micro(fast, slow, macro_regime);
        let transition =
            classify_transition(close, hi, lo, mid, atr[i], profile.near_thresh_atr);

        bars.push(RegimeBar {
            timestamp: series.bars[i].timestamp,
            close,
            hi,
            lo,
            mid,
            macro_regime,
            micro,
            transition,
        });
    }

    RegimeFrame { bars }
}

/// Macro rules, mutually exclusive, evaluated in this exact order.
/// A close exactly at the midpoint is Neutral.
pub(crate) fn classify_macro(close: f64, hi: f64, lo: f64, mid: f64) -> MacroRegime {
    if close > mid && close > hi {
        MacroRegime::StrongBull
    } else if close > mid {
        MacroRegime::WeakBull
    } else if close < mid && close < lo {
        MacroRegime::StrongBear
    } else if close < mid {
        MacroRegime::WeakBear
    } else {
        MacroRegime::Neutral
    }
}

/// Micro confirmation from the fast/slow SMA pair.
///
/// An SMA whose window has not filled is undefined, and a comparison
/// against an undefined SMA is false (so a bull macro without both
/// averages reads Micro Bear, a bear macro reads Micro Bull).
pub(crate) fn classify_micro(
    fast: Option<f64>,
    slow: Option<f64>,
    macro_regime: MacroRegime,
) -> MicroRegime {
    let fast_above = matches!((fast, slow), (Some(f), Some(s)) if f > s);
    let fast_below = matches!((fast, slow), (Some(f), Some(s)) if f < s);
    if macro_regime.is_bull() {
        if fast_above {
            MicroRegime::BullPlus
        } else {
            MicroRegime::Bear
        }
    } else if macro_regime.is_bear() {
        if fast_below {
            MicroRegime::Bear
        } else {
            MicroRegime::Bull
        }
    } else {
        MicroRegime::Neutral
    }
}

/// Transition rules in priority order; first match wins.
///
/// The (a)/(c) branches fire from inside the range approaching a boundary
/// within the weak zone, while (b)/(d) fire once already past it. Near a
/// crossing both can light up on adjacent bars; that brief double-labeling
/// window is preserved behavior.
pub(crate) fn classify_transition(
    close: f64,
    hi: f64,
    lo: f64,
    mid: f64,
    atr_val: f64,
    near_thresh_atr: f64,
) -> Transition {
    if atr_val <= 0.0 {
        return Transition::None;
    }
    let dist_hi = (hi - close) / atr_val;
    let dist_lo = (close - lo) / atr_val;
    if close < hi && close > mid && dist_hi < near_thresh_atr {
        Transition::ApproachingWeakBull
    } else if close > hi && dist_hi < near_thresh_atr {
        Transition::ApproachingStrongBull
    } else if close > lo && close < mid && dist_lo < near_thresh_atr {
        Transition::ApproachingWeakBear
    } else if close < lo && dist_lo < near_thresh_atr {
        Transition::ApproachingStrongBear
    } else {
        Transition::None
    }
}
