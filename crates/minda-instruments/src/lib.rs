//! minda-instruments
//!
//! Screening instrument definitions and the scoring engine. Pure data, no
//! I/O. Each instrument declares its questions, response scale, and
//! score→severity bands; scoring sums the answers and resolves the band.

pub mod error;
pub mod instruments;
pub mod scoring;

use minda_core::models::risk::RiskLevel;
use minda_core::models::score::ScoreResult;

use error::ScoringError;
use scoring::{AnswerSet, Question, ScaleOption, ScoringRange};

/// Trait implemented by each screening instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier, also the assessment type (e.g., "phq9").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "PHQ-9").
    fn name(&self) -> &str;

    /// Knowledge-base topic this instrument screens for.
    fn topic(&self) -> &str;

    fn questions(&self) -> &[Question];

    fn scale(&self) -> &[ScaleOption];

    /// Severity bands, in ascending score order.
    fn scoring_ranges(&self) -> &[ScoringRange];

    /// Whether detailed results sit behind the premium gate.
    fn is_premium_gate(&self) -> bool {
        false
    }

    /// Question whose answer signals self-harm risk on its own.
    fn critical_item(&self) -> Option<&str> {
        None
    }

    fn max_score(&self) -> u32 {
        let top = self.scale().iter().map(|o| o.value).max().unwrap_or(0);
        self.questions().len() as u32 * top as u32
    }

    /// Check that every question has exactly one in-scale answer and that
    /// no answer refers to an unknown question.
    fn validate_answers(&self, answers: &AnswerSet) -> Result<(), ScoringError> {
        for question_id in answers.keys() {
            if !self.questions().iter().any(|q| &q.id == question_id) {
                return Err(ScoringError::UnknownQuestion {
                    instrument_id: self.id().to_string(),
                    question_id: question_id.clone(),
                });
            }
        }

        let missing: Vec<String> = self
            .questions()
            .iter()
            .filter(|q| !answers.contains_key(&q.id))
            .map(|q| q.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ScoringError::IncompleteAnswers {
                instrument_id: self.id().to_string(),
                missing,
            });
        }

        for (question_id, value) in answers {
            if !self.scale().iter().any(|o| o.value == *value) {
                return Err(ScoringError::AnswerOutOfScale {
                    instrument_id: self.id().to_string(),
                    question_id: question_id.clone(),
                    value: *value,
                });
            }
        }

        Ok(())
    }

    /// Resolve the band for a total score. First matching range wins.
    fn severity_for(&self, score: u32) -> Result<&ScoringRange, ScoringError> {
        self.scoring_ranges()
            .iter()
            .find(|r| r.contains(score))
            .ok_or_else(|| ScoringError::ScoringRange {
                instrument_id: self.id().to_string(),
                score,
            })
    }

    /// Sum the answers and resolve the severity band.
    fn score(&self, answers: &AnswerSet) -> Result<ScoreResult, ScoringError> {
        self.validate_answers(answers)?;

        let score: u32 = answers.values().map(|v| *v as u32).sum();
        let range = self.severity_for(score)?;

        Ok(ScoreResult {
            score,
            max_score: self.max_score(),
            severity: range.severity.clone(),
            severity_localized: range.severity_localized.clone(),
            tier: range.tier,
        })
    }

    /// Risk implied by the critical item alone: 0 → none, 1 → moderate,
    /// 2 or more → high.
    fn item_risk(&self, answers: &AnswerSet) -> RiskLevel {
        let Some(value) = self.critical_item().and_then(|id| answers.get(id)) else {
            return RiskLevel::None;
        };
        match value {
            0 => RiskLevel::None,
            1 => RiskLevel::Moderate,
            _ => RiskLevel::High,
        }
    }

    /// Questions answered at or above the middle of the scale.
    fn elevated_items(&self, answers: &AnswerSet) -> Vec<&Question> {
        let top = self.scale().iter().map(|o| o.value).max().unwrap_or(0);
        let threshold = top.div_ceil(2).max(1);
        self.questions()
            .iter()
            .filter(|q| answers.get(&q.id).is_some_and(|v| *v >= threshold))
            .collect()
    }

    /// Check that the bands cover `[0, max_score]` with no gaps or overlaps.
    fn check_ranges(&self) -> Result<(), ScoringError> {
        let partition_error = |detail: String| ScoringError::RangePartition {
            instrument_id: self.id().to_string(),
            detail,
        };

        let mut expected_min = 0;
        for range in self.scoring_ranges() {
            if range.min > range.max {
                return Err(partition_error(format!(
                    "range '{}' is inverted ({}–{})",
                    range.severity, range.min, range.max
                )));
            }
            if range.min != expected_min {
                return Err(partition_error(format!(
                    "range '{}' starts at {} but the previous range ends at {}",
                    range.severity,
                    range.min,
                    expected_min as i64 - 1
                )));
            }
            expected_min = range.max + 1;
        }

        if expected_min != self.max_score() + 1 {
            return Err(partition_error(format!(
                "ranges end at {} but max score is {}",
                expected_min as i64 - 1,
                self.max_score()
            )));
        }
        Ok(())
    }

    /// Format the answers as structured text for inclusion in a prompt.
    fn to_structured_input(&self, answers: &AnswerSet) -> String {
        let mut output = format!("## {}\n\n", self.name());
        for question in self.questions() {
            if let Some(value) = answers.get(&question.id) {
                let label = self
                    .scale()
                    .iter()
                    .find(|o| o.value == *value)
                    .map(|o| o.label.as_str())
                    .unwrap_or("?");
                output.push_str(&format!("- {}: {} ({})\n", question.text, value, label));
            }
        }
        output
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::gad7::Gad7),
        Box::new(instruments::k6::K6),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}

/// Score a completed answer set for the given instrument type.
pub fn score(instrument_type: &str, answers: &AnswerSet) -> Result<ScoreResult, ScoringError> {
    let instrument = get_instrument(instrument_type)
        .ok_or_else(|| ScoringError::UnknownInstrument(instrument_type.to_string()))?;
    instrument.score(answers)
}

/// Verify the band partition of every registered instrument.
pub fn validate_catalog() -> Result<(), ScoringError> {
    all_instruments().iter().try_for_each(|i| i.check_ranges())
}
