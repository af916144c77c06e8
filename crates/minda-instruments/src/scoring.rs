use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use minda_core::models::score::SeverityTier;

/// Responses keyed by question id.
pub type AnswerSet = BTreeMap<String, u8>;

/// A single questionnaire item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub text_localized: String,
}

/// One point on a response scale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScaleOption {
    pub value: u8,
    pub label: String,
    pub label_localized: String,
}

/// A severity band over total scores, inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScoringRange {
    pub min: u32,
    pub max: u32,
    pub severity: String,
    pub severity_localized: String,
    pub tier: SeverityTier,
}

impl ScoringRange {
    pub fn contains(&self, score: u32) -> bool {
        score >= self.min && score <= self.max
    }
}

pub(crate) fn questions(prefix: &str, items: &[(&str, &str)]) -> Vec<Question> {
    items
        .iter()
        .enumerate()
        .map(|(i, (text, text_localized))| Question {
            id: format!("{prefix}_{}", i + 1),
            text: text.to_string(),
            text_localized: text_localized.to_string(),
        })
        .collect()
}

pub(crate) fn scale(options: &[(&str, &str)]) -> Vec<ScaleOption> {
    options
        .iter()
        .enumerate()
        .map(|(value, (label, label_localized))| ScaleOption {
            value: value as u8,
            label: label.to_string(),
            label_localized: label_localized.to_string(),
        })
        .collect()
}

pub(crate) fn ranges(bands: &[(u32, u32, &str, &str)]) -> Vec<ScoringRange> {
    bands
        .iter()
        .map(|(min, max, severity, severity_localized)| ScoringRange {
            min: *min,
            max: *max,
            severity: severity.to_string(),
            severity_localized: severity_localized.to_string(),
            tier: SeverityTier::from_label(severity),
        })
        .collect()
}

/// The 0–3 frequency scale shared by the PHQ and GAD families.
pub(crate) fn frequency_scale() -> Vec<ScaleOption> {
    scale(&[
        ("Not at all", "Tidak pernah langsung"),
        ("Several days", "Beberapa hari"),
        ("More than half the days", "Lebih separuh daripada hari-hari"),
        ("Nearly every day", "Hampir setiap hari"),
    ])
}
