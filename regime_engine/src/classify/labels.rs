//! Closed label sets for the classifier output.
//!
//! The serde renames match the display strings the summary table exposes,
//! so a serialized record reads "Strong Bull" rather than a variant name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse regime from close position relative to the opening range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroRegime {
    /// Close above the range midpoint and above the range high.
    #[serde(rename = "Strong Bull")]
    StrongBull,
    /// Close above the midpoint but inside the range.
    #[serde(rename = "Weak Bull")]
    WeakBull,
    /// Close below the midpoint but inside the range.
    #[serde(rename = "Weak Bear")]
    WeakBear,
    /// Close below the midpoint and below the range low.
    #[serde(rename = "Strong Bear")]
    StrongBear,
    /// Close exactly at the midpoint.
    #[serde(rename = "Neutral")]
    Neutral,
}

impl MacroRegime {
    /// True for either bull variant.
    pub fn is_bull(&self) -> bool {
        matches!(self, MacroRegime::StrongBull | MacroRegime::WeakBull)
    }

    /// True for either bear variant.
    pub fn is_bear(&self) -> bool {
        matches!(self, MacroRegime::StrongBear | MacroRegime::WeakBear)
    }
}

impl fmt::Display for MacroRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MacroRegime::StrongBull => "Strong Bull",
            MacroRegime::WeakBull => "Weak Bull",
            MacroRegime::WeakBear => "Weak Bear",
            MacroRegime::StrongBear => "Strong Bear",
            MacroRegime::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Fast/slow moving-average confirmation nested inside a macro state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MicroRegime {
    /// Bull macro confirmed by fast MA above slow MA.
    #[serde(rename = "Micro Bull+")]
    BullPlus,
    /// Bear macro contradicted by the moving averages.
    #[serde(rename = "Micro Bull")]
    Bull,
    /// Trend not confirmed (or bear macro confirmed).
    #[serde(rename = "Micro Bear")]
    Bear,
    /// Neutral macro carries no micro signal.
    #[serde(rename = "Neutral")]
    Neutral,
}

impl fmt::Display for MicroRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MicroRegime::BullPlus => "Micro Bull+",
            MicroRegime::Bull => "Micro Bull",
            MicroRegime::Bear => "Micro Bear",
            MicroRegime::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// ATR-distance early warning that price is nearing a range boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Inside the range, closing in on the high from below the high but
    /// above the midpoint.
    #[serde(rename = "Approaching Weak Bull")]
    ApproachingWeakBull,
    /// Already above the range high, still within threshold of it.
    #[serde(rename = "Approaching Strong Bull")]
    ApproachingStrongBull,
    /// Inside the range, closing in on the low from above the low but
    /// below the midpoint.
    #[serde(rename = "Approaching Weak Bear")]
    ApproachingWeakBear,
    /// Already below the range low, still within threshold of it.
    #[serde(rename = "Approaching Strong Bear")]
    ApproachingStrongBear,
    /// No boundary nearby, or ATR not positive.
    #[serde(rename = "None")]
    None,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transition::ApproachingWeakBull => "Approaching Weak Bull",
            Transition::ApproachingStrongBull => "Approaching Strong Bull",
            Transition::ApproachingWeakBear => "Approaching Weak Bear",
            Transition::ApproachingStrongBear => "Approaching Strong Bear",
            Transition::None => "None",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_strings_match_display() {
        for (value, json) in [
            (MacroRegime::StrongBull, "\"Strong Bull\""),
            (MacroRegime::Neutral, "\"Neutral\""),
        ] {
            assert_eq!(serde_json::to_string(&value).unwrap(), json);
        }
        assert_eq!(
            serde_json::to_string(&MicroRegime::BullPlus).unwrap(),
            "\"Micro Bull+\""
        );
        assert_eq!(serde_json::to_string(&Transition::None).unwrap(), "\"None\"");
    }

    #[test]
    fn bull_bear_predicates() {
        assert!(MacroRegime::WeakBull.is_bull());
        assert!(MacroRegime::StrongBear.is_bear());
        assert!(!MacroRegime::Neutral.is_bull());
        assert!(!MacroRegime::Neutral.is_bear());
    }
}
