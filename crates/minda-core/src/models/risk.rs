use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Coarse safety classification, distinct from clinical severity.
///
/// Variants are declared in ascending order so `Ord` gives
/// `None < Low < Moderate < High < Imminent`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
    Imminent,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Imminent => "imminent",
        }
    }

    /// Levels at which interaction is gated and crisis resources are shown.
    pub fn is_crisis(&self) -> bool {
        *self >= RiskLevel::High
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(RiskLevel::None),
            "low" => Ok(RiskLevel::Low),
            "moderate" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            "imminent" => Ok(RiskLevel::Imminent),
            other => Err(CoreError::InvalidRiskLevel(other.to_string())),
        }
    }
}

/// Output of the crisis classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RiskAssessment {
    pub is_crisis: bool,
    pub level: RiskLevel,
}

impl RiskAssessment {
    pub const NONE: RiskAssessment = RiskAssessment {
        is_crisis: false,
        level: RiskLevel::None,
    };

    pub fn from_level(level: RiskLevel) -> Self {
        Self {
            is_crisis: level.is_crisis(),
            level,
        }
    }

    /// Combine with another assessment, keeping the higher level.
    ///
    /// A level once raised within a request is never lowered.
    pub fn escalate(self, other: RiskAssessment) -> Self {
        Self::from_level(self.level.max(other.level))
    }
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(RiskLevel::Imminent > RiskLevel::High);
        assert!(RiskLevel::High > RiskLevel::Moderate);
        assert!(RiskLevel::Moderate > RiskLevel::Low);
        assert!(RiskLevel::Low > RiskLevel::None);
    }

    #[test]
    fn escalate_never_downgrades() {
        let imminent = RiskAssessment::from_level(RiskLevel::Imminent);
        let low = RiskAssessment::from_level(RiskLevel::Low);
        assert_eq!(imminent.escalate(low).level, RiskLevel::Imminent);
        assert_eq!(low.escalate(imminent).level, RiskLevel::Imminent);
        assert!(low.escalate(imminent).is_crisis);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&RiskAssessment::from_level(RiskLevel::Imminent)).unwrap();
        assert_eq!(json, r#"{"isCrisis":true,"level":"imminent"}"#);
    }
}
