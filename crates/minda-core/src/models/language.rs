use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Languages supported for user-facing text.
///
/// Every user-facing field carries an English value and a localized (Malay)
/// counterpart; this selects which one a single-language response uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Language {
    #[default]
    En,
    Ms,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ms => "Bahasa Melayu",
        }
    }

    /// Pick the text for this language from an English/Malay pair.
    pub fn pick<'a>(&self, en: &'a str, ms: &'a str) -> &'a str {
        match self {
            Language::En => en,
            Language::Ms => ms,
        }
    }
}
