//! The structured insight contract.
//!
//! [`InsightDraft`] is the content the generative model (or the fallback
//! generator) produces. [`StructuredInsight`] is a draft annotated with the
//! assessment it describes. Every user-facing text field has a paired
//! `*_localized` (Malay) counterpart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InsightDraft {
    pub summary: String,
    pub summary_localized: String,
    pub key_findings: Vec<KeyFinding>,
    pub recommendations: Vec<Recommendation>,
    pub coping_strategies: Vec<CopingStrategy>,
    pub risk_factors: Vec<RiskFactor>,
    pub next_steps: Vec<NextStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StructuredInsight {
    #[serde(flatten)]
    pub content: InsightDraft,
    pub generated_at: jiff::Timestamp,
    pub assessment_type: String,
    pub severity: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct KeyFinding {
    pub text: String,
    pub text_localized: String,
    pub kind: FindingKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FindingKind {
    Positive,
    Concern,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Recommendation {
    pub text: String,
    pub text_localized: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CopingStrategy {
    pub title: String,
    pub title_localized: String,
    pub description: String,
    pub description_localized: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RiskFactor {
    pub text: String,
    pub text_localized: String,
    pub level: RiskFactorLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskFactorLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NextStep {
    pub action: String,
    pub action_localized: String,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Urgency {
    Immediate,
    Soon,
    WhenReady,
}

impl InsightDraft {
    /// Every (label, english, localized) text pair in the draft.
    ///
    /// Used by validation to check that no half of a pair is blank.
    pub fn text_pairs(&self) -> Vec<(String, &str, &str)> {
        let mut pairs = vec![(
            "summary".to_string(),
            self.summary.as_str(),
            self.summary_localized.as_str(),
        )];
        for (i, f) in self.key_findings.iter().enumerate() {
            pairs.push((format!("keyFindings[{i}].text"), f.text.as_str(), f.text_localized.as_str()));
        }
        for (i, r) in self.recommendations.iter().enumerate() {
            pairs.push((format!("recommendations[{i}].text"), r.text.as_str(), r.text_localized.as_str()));
        }
        for (i, c) in self.coping_strategies.iter().enumerate() {
            pairs.push((format!("copingStrategies[{i}].title"), c.title.as_str(), c.title_localized.as_str()));
            pairs.push((
                format!("copingStrategies[{i}].description"),
                c.description.as_str(),
                c.description_localized.as_str(),
            ));
        }
        for (i, r) in self.risk_factors.iter().enumerate() {
            pairs.push((format!("riskFactors[{i}].text"), r.text.as_str(), r.text_localized.as_str()));
        }
        for (i, n) in self.next_steps.iter().enumerate() {
            pairs.push((format!("nextSteps[{i}].action"), n.action.as_str(), n.action_localized.as_str()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_insight_flattens_draft() {
        let insight = StructuredInsight {
            content: InsightDraft {
                summary: "s".into(),
                summary_localized: "r".into(),
                key_findings: vec![],
                recommendations: vec![],
                coping_strategies: vec![],
                risk_factors: vec![],
                next_steps: vec![NextStep {
                    action: "a".into(),
                    action_localized: "t".into(),
                    urgency: Urgency::WhenReady,
                }],
            },
            generated_at: jiff::Timestamp::UNIX_EPOCH,
            assessment_type: "phq9".into(),
            severity: "Mild".into(),
            score: 6,
        };

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["summaryLocalized"], "r");
        assert_eq!(json["assessmentType"], "phq9");
        assert_eq!(json["nextSteps"][0]["urgency"], "when_ready");
        assert!(json.get("content").is_none());
    }
}
