use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Coarse severity bucket shared by all instruments.
///
/// Ordered ascending. Instruments label their bands differently ("Moderately
/// Severe", "Low", ...); the tier is what downstream logic branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityTier {
    Minimal,
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    /// Derive the tier from a severity label.
    ///
    /// Any label containing "severe" (including "Moderately Severe") or equal
    /// to "high" is `Severe`; labels containing "moderate" are `Moderate`;
    /// "mild" and "low" are `Mild`; everything else is `Minimal`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.contains("severe") || label == "high" {
            SeverityTier::Severe
        } else if label.contains("moderate") {
            SeverityTier::Moderate
        } else if label.contains("mild") || label == "low" {
            SeverityTier::Mild
        } else {
            SeverityTier::Minimal
        }
    }

    pub fn is_severe(&self) -> bool {
        *self == SeverityTier::Severe
    }

    /// Tiers at which risk factors must be reported.
    pub fn requires_risk_factors(&self) -> bool {
        *self >= SeverityTier::Moderate
    }
}

/// The scored outcome of a completed instrument. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScoreResult {
    pub score: u32,
    pub max_score: u32,
    pub severity: String,
    pub severity_localized: String,
    pub tier: SeverityTier,
}
