//! Session-windowed classification for intraday series.
//!
//! Instead of a trailing bar count, the opening range here is a fixed
//! local-time window (Asia, London, NY AM, NY PM) in a configured IANA
//! timezone, and one snapshot is produced per session window per local
//! day. Applying session logic to daily-or-coarser data is invalid and
//! yields an empty frame.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use indexmap::IndexMap;
use market_data_feed::models::series::OhlcSeries;
use serde::{Deserialize, Serialize};

use crate::{
    algebra,
    classify::{
        FAST_LEN, MacroRegime, MicroRegime, NEAR_THRESH_ATR, SLOW_LEN, Transition,
        classify_macro, classify_micro, classify_transition,
    },
};

/// Named intraday session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionName {
    /// Asian session window.
    #[serde(rename = "Asia")]
    Asia,
    /// London session window.
    #[serde(rename = "London")]
    London,
    /// New York morning window.
    #[serde(rename = "NY AM")]
    NyAm,
    /// New York afternoon window.
    #[serde(rename = "NY PM")]
    NyPm,
}

impl std::fmt::Display for SessionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionName::Asia => "Asia",
            SessionName::London => "London",
            SessionName::NyAm => "NY AM",
            SessionName::NyPm => "NY PM",
        };
        f.write_str(s)
    }
}

/// A half-open local wall-clock window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionWindow {
    /// Session identity.
    pub name: SessionName,
    /// Inclusive local start time.
    pub start: NaiveTime,
    /// Exclusive local end time.
    pub end: NaiveTime,
}

impl SessionWindow {
    /// True when the local wall-clock `time` falls inside the window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Parameters for session-mode classification.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProfile {
    /// Timezone the wall-clock windows are expressed in.
    pub tz: Tz,
    /// Session windows, evaluated in order.
    pub windows: Vec<SessionWindow>,
    /// ATR period over the whole series.
    pub atr_period: usize,
    /// Fast moving-average length over the session's closes across days.
    pub fast_len: usize,
    /// Slow moving-average length over the session's closes across days.
    pub slow_len: usize,
    /// Transition threshold in ATR units.
    pub near_thresh_atr: f64,
}

impl Default for SessionProfile {
    fn default() -> Self {
        let window = |name, start_h, end_h| SessionWindow {
            name,
            start: NaiveTime::from_hms_opt(start_h, 0, 0).expect("valid time"),
            end: NaiveTime::from_hms_opt(end_h, 0, 0).expect("valid time"),
        };
        Self {
            tz: chrono_tz::America::New_York,
            windows: vec![
                window(SessionName::Asia, 4, 5),
                window(SessionName::London, 9, 10),
                window(SessionName::NyAm, 12, 13),
                window(SessionName::NyPm, 13, 14),
            ],
            atr_period: 14,
            fast_len: FAST_LEN,
            slow_len: SLOW_LEN,
            near_thresh_atr: NEAR_THRESH_ATR,
        }
    }
}

/// One session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionBar {
    /// Local calendar date the session belongs to.
    pub date: NaiveDate,
    /// Which session window this snapshot covers.
    pub session: SessionName,
    /// Close of the last bar in the window.
    pub close: f64,
    /// Highest high inside the window.
    pub hi: f64,
    /// Lowest low inside the window.
    pub lo: f64,
    /// Midpoint of the window's range.
    pub mid: f64,
    /// Coarse regime label.
    pub macro_regime: MacroRegime,
    /// Moving-average confirmation over this session's accumulated closes.
    pub micro: MicroRegime,
    /// Boundary-proximity warning.
    pub transition: Transition,
}

/// Session snapshots in chronological (date, window) order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFrame {
    /// Snapshot rows.
    pub bars: Vec<SessionBar>,
}

impl SessionFrame {
    /// True when no session produced output.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent snapshot, if any.
    pub fn last(&self) -> Option<&SessionBar> {
        self.bars.last()
    }
}

/// Classifies each (local day, session window) of an intraday series.
///
/// A series whose minimum bar spacing is one day or coarser (or with
/// fewer than two bars) carries no session information and yields an
/// empty frame regardless of content. The transition test uses the
/// full-series ATR sampled at the window's last bar.
pub fn classify_sessions(series: &OhlcSeries, profile: &SessionProfile) -> SessionFrame {
    if !is_intraday(series) {
        return SessionFrame::default();
    }

    let atr = algebra::average_true_range(series, profile.atr_period);
    let local: Vec<_> = series
        .bars
        .iter()
        .map(|b| b.timestamp.with_timezone(&profile.tz))
        .collect();

    // Bars grouped by local calendar date, preserving series order.
    let mut by_date: IndexMap<NaiveDate, Vec<usize>> = IndexMap::new();
    for (i, ts) in local.iter().enumerate() {
        by_date.entry(ts.date_naive()).or_default().push(i);
    }

    let mut bars = Vec::new();
    // Each session's closes accumulate across days so the micro moving
    // averages can fill even when a single day's window holds few bars.
    let mut closes_by_session: IndexMap<SessionName, Vec<f64>> = IndexMap::new();
    for (&date, day_indices) in &by_date {
        for window in &profile.windows {
            let selected: Vec<usize> = day_indices
                .iter()
                .copied()
                .filter(|&i| window.contains(local[i].time()))
                .collect();
            let Some(&last_idx) = selected.last() else {
                continue;
            };

            let hi = selected
                .iter()
                .map(|&i| series.bars[i].high)
                .fold(f64::NEG_INFINITY, f64::max);
            let lo = selected
                .iter()
                .map(|&i| series.bars[i].low)
                .fold(f64::INFINITY, f64::min);
            let mid = (hi + lo) / 2.0;
            let close = series.bars[last_idx].close;

            let session_closes = closes_by_session.entry(window.name).or_default();
            session_closes.extend(selected.iter().map(|&i| series.bars[i].close));
            let at = session_closes.len() - 1;
            let fast = algebra::trailing_sma(session_closes, at, profile.fast_len);
            let slow = algebra::trailing_sma(session_closes, at, profile.slow_len);

            let macro_regime = classify_macro(close, hi, lo, mid);
            let micro = classify_micro(fast, slow, macro_regime);
            let transition = classify_transition(
                close,
                hi,
                lo,
                mid,
                atr[last_idx],
                profile.near_thresh_atr,
            );

            bars.push(SessionBar {
                date,
                session: window.name,
                close,
                hi,
                lo,
                mid,
                macro_regime,
                micro,
                transition,
            });
        }
    }

    SessionFrame { bars }
}

/// True when the series' minimum consecutive bar spacing is sub-daily.
fn is_intraday(series: &OhlcSeries) -> bool {
    let one_day = TimeDelta::days(1);
    series
        .bars
        .windows(2)
        .map(|pair| pair[1].timestamp - pair[0].timestamp)
        .min()
        .is_some_and(|gap| gap < one_day)
}
