//! Crisis hotline directory and the canned safety response.

use serde::Serialize;

use minda_core::models::language::Language;
use minda_core::models::risk::{RiskAssessment, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotline {
    pub name: &'static str,
    pub number: &'static str,
    pub hours: &'static str,
    pub description: &'static str,
    pub description_localized: &'static str,
}

pub const BEFRIENDERS: Hotline = Hotline {
    name: "Befrienders Kuala Lumpur",
    number: "03-7627 2929",
    hours: "24/7",
    description: "Confidential emotional support for anyone in distress",
    description_localized: "Sokongan emosi sulit untuk sesiapa yang dalam kesusahan",
};

pub const TALIAN_KASIH: Hotline = Hotline {
    name: "Talian Kasih",
    number: "15999",
    hours: "24/7",
    description: "National support line for crisis and welfare",
    description_localized: "Talian sokongan kebangsaan untuk krisis dan kebajikan",
};

pub const EMERGENCY: Hotline = Hotline {
    name: "Emergency services",
    number: "999",
    hours: "24/7",
    description: "Immediate danger to life",
    description_localized: "Bahaya segera kepada nyawa",
};

pub const HOTLINES: &[Hotline] = &[BEFRIENDERS, TALIAN_KASIH, EMERGENCY];

/// Whether `text` points the reader at a crisis line: it names a listed
/// number (ignoring spacing and punctuation) or uses a hotline keyword.
pub fn mentions_hotline(text: &str) -> bool {
    let lower = text.to_lowercase();
    if ["hotline", "befrienders", "talian kasih", "crisis line", "talian krisis"]
        .iter()
        .any(|k| lower.contains(k))
    {
        return true;
    }

    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    HOTLINES
        .iter()
        .map(|h| h.number.chars().filter(|c| c.is_ascii_digit()).collect::<String>())
        .filter(|n| n.len() > 3)
        .any(|n| digits.contains(&n))
}

/// The short-circuit response: fixed text, no model involved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyResponse {
    pub message: String,
    pub language: Language,
    pub risk: RiskAssessment,
    pub hotlines: Vec<Hotline>,
}

pub fn safety_message(language: Language) -> String {
    match language {
        Language::En => format!(
            "It sounds like you are going through something really painful right now, and you \
             do not have to face it alone. Please reach out for support now: call {} at {} \
             ({}) or {} at {}. If you are in immediate danger, call {} or go to the nearest \
             emergency department. If you can, tell someone you trust how you are feeling.",
            BEFRIENDERS.name,
            BEFRIENDERS.number,
            BEFRIENDERS.hours,
            TALIAN_KASIH.name,
            TALIAN_KASIH.number,
            EMERGENCY.number,
        ),
        Language::Ms => format!(
            "Nampaknya anda sedang melalui sesuatu yang sangat menyakitkan sekarang, dan anda \
             tidak perlu menghadapinya seorang diri. Sila dapatkan sokongan sekarang: hubungi \
             {} di {} ({}) atau {} di {}. Jika anda dalam bahaya segera, hubungi {} atau pergi \
             ke jabatan kecemasan yang terdekat. Jika boleh, beritahu seseorang yang anda \
             percayai tentang perasaan anda.",
            BEFRIENDERS.name,
            BEFRIENDERS.number,
            BEFRIENDERS.hours,
            TALIAN_KASIH.name,
            TALIAN_KASIH.number,
            EMERGENCY.number,
        ),
    }
}

/// Short note appended to a model reply when the message was flagged but
/// did not warrant the full short-circuit.
pub fn safety_addendum(language: Language) -> String {
    let lines = HOTLINES
        .iter()
        .map(|h| format!("{} {}", h.name, h.number))
        .collect::<Vec<_>>()
        .join(", ");
    match language {
        Language::En => format!(
            "If you are feeling unsafe or thinking about harming yourself, please reach out \
             now: {lines}."
        ),
        Language::Ms => format!(
            "Jika anda berasa tidak selamat atau terfikir untuk mencederakan diri, sila \
             dapatkan bantuan sekarang: {lines}."
        ),
    }
}

/// Build the canned safety response, tagged `imminent`.
pub fn safety_response(language: Language) -> SafetyResponse {
    SafetyResponse {
        message: safety_message(language),
        language,
        risk: RiskAssessment::from_level(RiskLevel::Imminent),
        hotlines: HOTLINES.to_vec(),
    }
}
