//! Collapses the four timeframe-classified frames for one instrument into
//! a single flat record.
//!
//! Only the latest row of each frame survives; a timeframe with no output
//! simply contributes no fields. The serialized field names form the
//! summary table schema (`Entity`, `Close`, `Macro`, ... `Weekly*`,
//! `Daily*`, `Session*`).

use serde::Serialize;

use crate::classify::{
    MacroRegime, MicroRegime, RegimeFrame, Transition,
    session::{SessionFrame, SessionName},
};

/// One summary row per instrument: the latest labels from each timeframe.
///
/// Built fresh on every aggregation call; nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegimeSummary {
    /// Instrument name.
    #[serde(rename = "Entity")]
    pub entity: String,

    /// Latest close from the yearly-scale frame.
    #[serde(rename = "Close", skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    /// Latest yearly-scale macro label.
    #[serde(rename = "Macro", skip_serializing_if = "Option::is_none")]
    pub macro_regime: Option<MacroRegime>,
    /// Latest yearly-scale micro label.
    #[serde(rename = "Micro", skip_serializing_if = "Option::is_none")]
    pub micro: Option<MicroRegime>,
    /// Latest yearly-scale transition label.
    #[serde(rename = "Transition", skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,

    /// Latest weekly-scale macro label.
    #[serde(rename = "WeeklyMacro", skip_serializing_if = "Option::is_none")]
    pub weekly_macro: Option<MacroRegime>,
    /// Latest weekly-scale micro label.
    #[serde(rename = "WeeklyMicro", skip_serializing_if = "Option::is_none")]
    pub weekly_micro: Option<MicroRegime>,
    /// Latest weekly-scale transition label.
    #[serde(rename = "WeeklyTransition", skip_serializing_if = "Option::is_none")]
    pub weekly_transition: Option<Transition>,

    /// Latest daily-scale macro label.
    #[serde(rename = "DailyMacro", skip_serializing_if = "Option::is_none")]
    pub daily_macro: Option<MacroRegime>,
    /// Latest daily-scale micro label.
    #[serde(rename = "DailyMicro", skip_serializing_if = "Option::is_none")]
    pub daily_micro: Option<MicroRegime>,
    /// Latest daily-scale transition label.
    #[serde(rename = "DailyTransition", skip_serializing_if = "Option::is_none")]
    pub daily_transition: Option<Transition>,

    /// Which session the latest session snapshot covers.
    #[serde(rename = "Session", skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionName>,
    /// Latest session macro label.
    #[serde(rename = "SessionMacro", skip_serializing_if = "Option::is_none")]
    pub session_macro: Option<MacroRegime>,
    /// Latest session micro label.
    #[serde(rename = "SessionMicro", skip_serializing_if = "Option::is_none")]
    pub session_micro: Option<MicroRegime>,
    /// Latest session transition label.
    #[serde(rename = "SessionTransition", skip_serializing_if = "Option::is_none")]
    pub session_transition: Option<Transition>,
}

/// Flattens the latest row of each non-empty frame into one record.
///
/// All-empty input yields a record holding only the entity name. The
/// frames are independent views of the same instrument; no time alignment
/// between them is checked.
pub fn aggregate(
    entity: &str,
    yearly: &RegimeFrame,
    weekly: &RegimeFrame,
    daily: &RegimeFrame,
    session: &SessionFrame,
) -> RegimeSummary {
    let mut row = RegimeSummary {
        entity: entity.to_string(),
        ..RegimeSummary::default()
    };

    if let Some(bar) = yearly.last() {
        row.close = Some(bar.close);
        row.macro_regime = Some(bar.macro_regime);
        row.micro = Some(bar.micro);
        row.transition = Some(bar.transition);
    }
    if let Some(bar) = weekly.last() {
        row.weekly_macro = Some(bar.macro_regime);
        row.weekly_micro = Some(bar.micro);
        row.weekly_transition = Some(bar.transition);
    }
    if let Some(bar) = daily.last() {
        row.daily_macro = Some(bar.macro_regime);
        row.daily_micro = Some(bar.micro);
        row.daily_transition = Some(bar.transition);
    }
    if let Some(bar) = session.last() {
        row.session = Some(bar.session);
        row.session_macro = Some(bar.macro_regime);
        row.session_micro = Some(bar.micro);
        row.session_transition = Some(bar.transition);
    }

    row
}
