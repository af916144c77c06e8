//! Deterministic crisis classifier.
//!
//! Three ordered phrase lists (imminent, high, moderate), each with English
//! and Malay variants, matched by case-insensitive substring containment.
//! Evaluation runs imminent → high → moderate and the first list with a hit
//! decides, so an imminent phrase anywhere in the text wins over everything
//! else. Recall matters more than precision here: flagging safe text is
//! acceptable, missing a crisis is not.
//!
//! No I/O and no fallible steps, so this path works with every external
//! service down.

use tracing::warn;

use minda_core::models::risk::{RiskAssessment, RiskLevel};

/// Phrases that mean the user may act on thoughts of suicide.
pub const IMMINENT_PHRASES: &[&str] = &[
    // English
    "kill myself",
    "killing myself",
    "end my life",
    "ending my life",
    "take my own life",
    "taking my own life",
    "want to die",
    "wanna die",
    "going to die tonight",
    "suicide",
    "suicidal",
    "hang myself",
    "overdose",
    "end it all",
    "don't want to live",
    "dont want to live",
    "do not want to live",
    "no longer want to live",
    // Malay
    "bunuh diri",
    "membunuh diri",
    "nak mati",
    "mahu mati",
    "ingin mati",
    "tamatkan hidup",
    "menamatkan hidup",
    "mengakhiri hidup",
    "gantung diri",
    "terjun bangunan",
    "tak mahu hidup",
    "tidak mahu hidup",
    "tak nak hidup",
];

/// Self-harm and hopelessness.
pub const HIGH_PHRASES: &[&str] = &[
    // English
    "self-harm",
    "self harm",
    "selfharm",
    "hurt myself",
    "hurting myself",
    "harm myself",
    "cut myself",
    "cutting myself",
    "better off dead",
    "no reason to live",
    "nothing to live for",
    "can't go on",
    "cannot go on",
    "no way out",
    "hopeless",
    "give up on life",
    "burden to everyone",
    // Malay
    "cederakan diri",
    "mencederakan diri",
    "sakiti diri",
    "menyakiti diri",
    "kelar tangan",
    "toreh tangan",
    "tiada harapan",
    "putus asa",
    "tiada sebab untuk hidup",
    "tak guna hidup",
    "tidak guna hidup",
    "beban kepada semua",
];

/// Distress without stated intent.
pub const MODERATE_PHRASES: &[&str] = &[
    // English
    "depressed",
    "depression",
    "anxious",
    "anxiety",
    "panic attack",
    "can't sleep",
    "cannot sleep",
    "worthless",
    "overwhelmed",
    "lonely",
    "empty inside",
    "crying every day",
    "no energy",
    // Malay
    "tertekan",
    "murung",
    "kemurungan",
    "cemas",
    "kebimbangan",
    "serangan panik",
    "tak boleh tidur",
    "tidak boleh tidur",
    "tak berguna",
    "tidak berguna",
    "kesunyian",
    "sunyi",
    "penat sangat",
];

/// Phrase lists in evaluation order.
const TIERS: &[(RiskLevel, &[&str])] = &[
    (RiskLevel::Imminent, IMMINENT_PHRASES),
    (RiskLevel::High, HIGH_PHRASES),
    (RiskLevel::Moderate, MODERATE_PHRASES),
];

/// Lowercase, fold typographic apostrophes and hyphens, collapse whitespace.
fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{02BC}' | '`' => '\'',
            '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' => '-',
            c => c,
        })
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify free text. Never fails; returns `none` when nothing matches.
pub fn classify(text: &str) -> RiskAssessment {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return RiskAssessment::NONE;
    }

    for (level, phrases) in TIERS {
        if phrases.iter().any(|p| normalized.contains(p)) {
            if level.is_crisis() {
                warn!(level = %level, "crisis language detected");
            }
            return RiskAssessment::from_level(*level);
        }
    }

    RiskAssessment::NONE
}

/// Risk from a standing level recorded by a prior assessment. A prior level
/// of `high` or `imminent` is treated as `imminent` without looking at any
/// new text.
pub fn classify_from_known_level(prior: RiskLevel) -> RiskAssessment {
    if prior >= RiskLevel::High {
        RiskAssessment::from_level(RiskLevel::Imminent)
    } else {
        RiskAssessment {
            is_crisis: false,
            level: prior,
        }
    }
}

/// Outcome of the crisis gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub assessment: RiskAssessment,
    /// Skip retrieval and generation and answer with the safety response.
    pub short_circuit: bool,
}

/// Run the crisis gate: the standing risk level first, then `text` if any.
///
/// Short-circuits when the prior level is `high` or above, or the text
/// classifies as `imminent`. Otherwise the levels are combined and never
/// lowered.
pub fn gate(prior: RiskLevel, text: Option<&str>) -> GateDecision {
    let known = classify_from_known_level(prior);
    if known.level == RiskLevel::Imminent {
        return GateDecision {
            assessment: known,
            short_circuit: true,
        };
    }

    let classified = text.map(classify).unwrap_or(RiskAssessment::NONE);
    if classified.level == RiskLevel::Imminent {
        return GateDecision {
            assessment: classified,
            short_circuit: true,
        };
    }

    GateDecision {
        assessment: known.escalate(classified),
        short_circuit: false,
    }
}
