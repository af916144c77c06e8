//! Deterministic, template-driven insights.
//!
//! Used whenever the model path fails, and as the reference output that
//! generated insights are validated against. Content branches on three
//! buckets only: severe, moderate, and mild-or-below.

use minda_core::models::insight::{
    CopingStrategy, FindingKind, InsightDraft, KeyFinding, NextStep, Priority, Recommendation,
    RiskFactor, RiskFactorLevel, StructuredInsight, Urgency,
};
use minda_core::models::risk::RiskLevel;
use minda_core::models::score::SeverityTier;
use minda_instruments::get_instrument;

use crate::hotlines::{BEFRIENDERS, EMERGENCY, TALIAN_KASIH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Severe,
    Moderate,
    MildOrBelow,
}

impl From<SeverityTier> for Bucket {
    fn from(tier: SeverityTier) -> Self {
        match tier {
            SeverityTier::Severe => Bucket::Severe,
            SeverityTier::Moderate => Bucket::Moderate,
            SeverityTier::Mild | SeverityTier::Minimal => Bucket::MildOrBelow,
        }
    }
}

/// Build a complete fallback insight for a scored assessment.
pub fn fallback(
    assessment_type: &str,
    score: u32,
    max_score: u32,
    severity: &str,
    risk_level: RiskLevel,
) -> StructuredInsight {
    StructuredInsight {
        content: fallback_draft(assessment_type, score, max_score, severity, risk_level),
        generated_at: jiff::Timestamp::now(),
        assessment_type: assessment_type.to_string(),
        severity: severity.to_string(),
        score,
    }
}

/// The content of [`fallback`], without the timestamp.
pub fn fallback_draft(
    assessment_type: &str,
    score: u32,
    max_score: u32,
    severity: &str,
    risk_level: RiskLevel,
) -> InsightDraft {
    let instrument = get_instrument(assessment_type);
    let name = instrument
        .as_ref()
        .map(|i| i.name().to_string())
        .unwrap_or_else(|| assessment_type.to_uppercase());
    // Unknown instruments or out-of-range scores keep the English label.
    let severity_ms = instrument
        .as_ref()
        .and_then(|i| i.severity_for(score).ok())
        .filter(|r| r.severity.eq_ignore_ascii_case(severity))
        .map(|r| r.severity_localized.clone())
        .unwrap_or_else(|| severity.to_string());

    let bucket = Bucket::from(SeverityTier::from_label(severity));

    let mut key_findings = vec![finding(
        FindingKind::Neutral,
        format!("Your {name} score is {score} out of {max_score}, in the {severity} range."),
        format!("Skor {name} anda ialah {score} daripada {max_score}, dalam julat {severity_ms}."),
    )];
    key_findings.push(match bucket {
        Bucket::Severe => finding(
            FindingKind::Concern,
            "Your answers point to significant distress that is likely affecting daily life.",
            "Jawapan anda menunjukkan tekanan yang ketara yang mungkin menjejaskan kehidupan harian.",
        ),
        Bucket::Moderate => finding(
            FindingKind::Concern,
            "Your answers show noticeable symptoms that may be getting in the way of daily activities.",
            "Jawapan anda menunjukkan simptom yang ketara yang mungkin mengganggu aktiviti harian.",
        ),
        Bucket::MildOrBelow => finding(
            FindingKind::Positive,
            "Your answers suggest symptoms are currently mild or minimal.",
            "Jawapan anda menunjukkan simptom kini ringan atau minimum.",
        ),
    });
    if risk_level >= RiskLevel::Moderate {
        key_findings.push(finding(
            FindingKind::Concern,
            "You reported thoughts that may affect your safety. These deserve attention and support.",
            "Anda melaporkan fikiran yang mungkin menjejaskan keselamatan anda. Ia wajar diberi perhatian dan sokongan.",
        ));
    }

    let recommendations = match bucket {
        Bucket::Severe => vec![
            recommendation(
                Priority::High,
                format!(
                    "If you feel overwhelmed or unsafe, contact a crisis hotline now: {} ({}) or {} ({}). In an emergency call {}.",
                    BEFRIENDERS.name, BEFRIENDERS.number, TALIAN_KASIH.name, TALIAN_KASIH.number, EMERGENCY.number
                ),
                format!(
                    "Jika anda berasa terbeban atau tidak selamat, hubungi talian krisis sekarang: {} ({}) atau {} ({}). Dalam kecemasan hubungi {}.",
                    BEFRIENDERS.name, BEFRIENDERS.number, TALIAN_KASIH.name, TALIAN_KASIH.number, EMERGENCY.number
                ),
            ),
            recommendation(
                Priority::High,
                "Arrange to see a doctor or mental health professional as soon as possible.",
                "Aturkan temu janji dengan doktor atau profesional kesihatan mental secepat mungkin.",
            ),
            recommendation(
                Priority::Medium,
                "Let someone you trust know how you have been feeling.",
                "Beritahu seseorang yang anda percayai tentang perasaan anda.",
            ),
        ],
        Bucket::Moderate => vec![
            recommendation(
                Priority::High,
                "Consider speaking with a counsellor, doctor or mental health professional.",
                "Pertimbangkan untuk berbincang dengan kaunselor, doktor atau profesional kesihatan mental.",
            ),
            recommendation(
                Priority::Medium,
                "Keep a regular routine for sleep, meals and physical activity.",
                "Kekalkan rutin tetap untuk tidur, makan dan aktiviti fizikal.",
            ),
            recommendation(
                Priority::Low,
                "Repeat this screening in two weeks to see how things change.",
                "Ulangi saringan ini dalam dua minggu untuk melihat perubahan.",
            ),
        ],
        Bucket::MildOrBelow => vec![
            recommendation(
                Priority::Medium,
                "Keep up the habits that support your wellbeing, such as rest, movement and time with others.",
                "Teruskan tabiat yang menyokong kesejahteraan anda, seperti rehat, bersenam dan meluangkan masa dengan orang lain.",
            ),
            recommendation(
                Priority::Low,
                "Repeat this screening in a month, or sooner if you notice changes.",
                "Ulangi saringan ini dalam sebulan, atau lebih awal jika anda perasan perubahan.",
            ),
            recommendation(
                Priority::Low,
                "Reach out to a professional if symptoms increase or last longer than two weeks.",
                "Dapatkan bantuan profesional jika simptom bertambah atau berlarutan lebih dua minggu.",
            ),
        ],
    };

    let mut coping_strategies = vec![coping(
        "Slow breathing",
        "Pernafasan perlahan",
        "Breathe in for four counts, hold for four, and breathe out for six. Repeat for a few minutes when you feel tense.",
        "Tarik nafas selama empat kiraan, tahan selama empat, dan hembus selama enam. Ulang beberapa minit apabila anda berasa tegang.",
    )];
    coping_strategies.push(match bucket {
        Bucket::Severe | Bucket::Moderate => coping(
            "Small daily steps",
            "Langkah kecil setiap hari",
            "Choose one small, achievable activity each day, such as a short walk or a meal with someone.",
            "Pilih satu aktiviti kecil yang mudah dicapai setiap hari, seperti berjalan sebentar atau makan bersama seseorang.",
        ),
        Bucket::MildOrBelow => coping(
            "Check in with yourself",
            "Semak perasaan diri",
            "Take a moment each evening to notice your mood and what helped you today.",
            "Luangkan masa setiap petang untuk menyedari emosi anda dan perkara yang membantu anda hari ini.",
        ),
    });
    coping_strategies.push(coping(
        "Stay connected",
        "Kekal berhubung",
        "Spend time with people who support you, even briefly.",
        "Luangkan masa bersama orang yang menyokong anda, walaupun seketika.",
    ));

    let mut risk_factors = Vec::new();
    match bucket {
        Bucket::Severe => risk_factors.push(risk_factor(
            RiskFactorLevel::High,
            "Symptoms are in the severe range.",
            "Simptom berada dalam julat teruk.",
        )),
        Bucket::Moderate => risk_factors.push(risk_factor(
            RiskFactorLevel::Moderate,
            "Symptoms are at a level that can interfere with work, study or relationships.",
            "Simptom berada pada tahap yang boleh mengganggu kerja, pelajaran atau hubungan.",
        )),
        Bucket::MildOrBelow => {}
    }
    if bucket != Bucket::MildOrBelow && risk_level >= RiskLevel::Moderate {
        let level = if risk_level.is_crisis() {
            RiskFactorLevel::High
        } else {
            RiskFactorLevel::Moderate
        };
        risk_factors.push(risk_factor(
            level,
            "You reported thoughts of death or self-harm.",
            "Anda melaporkan fikiran tentang kematian atau mencederakan diri.",
        ));
    }

    let mut next_steps = match bucket {
        Bucket::Severe => vec![
            next_step(
                Urgency::Immediate,
                "Talk to a mental health professional or a support line today.",
                "Berbincang dengan profesional kesihatan mental atau talian sokongan hari ini.",
            ),
            next_step(
                Urgency::Soon,
                "Share these results with your doctor.",
                "Kongsikan keputusan ini dengan doktor anda.",
            ),
        ],
        Bucket::Moderate => vec![
            next_step(
                Urgency::Soon,
                "Book an appointment with a counsellor or doctor within the next two weeks.",
                "Buat temu janji dengan kaunselor atau doktor dalam tempoh dua minggu.",
            ),
            next_step(
                Urgency::WhenReady,
                "Try one of the coping strategies each day.",
                "Cuba salah satu strategi daya tindak setiap hari.",
            ),
        ],
        Bucket::MildOrBelow => vec![
            next_step(
                Urgency::WhenReady,
                "Keep doing what works for you and check in with yourself regularly.",
                "Teruskan perkara yang berkesan untuk anda dan semak perasaan diri secara berkala.",
            ),
            next_step(
                Urgency::WhenReady,
                "Explore the self-help articles in the app.",
                "Terokai artikel bantuan kendiri dalam aplikasi.",
            ),
        ],
    };
    if risk_level.is_crisis() && bucket != Bucket::Severe {
        next_steps.insert(
            0,
            next_step(
                Urgency::Immediate,
                format!(
                    "If you are thinking about harming yourself, call {} ({}) or {} ({}) now.",
                    BEFRIENDERS.name, BEFRIENDERS.number, TALIAN_KASIH.name, TALIAN_KASIH.number
                ),
                format!(
                    "Jika anda terfikir untuk mencederakan diri, hubungi {} ({}) atau {} ({}) sekarang.",
                    BEFRIENDERS.name, BEFRIENDERS.number, TALIAN_KASIH.name, TALIAN_KASIH.number
                ),
            ),
        );
    } else if risk_level == RiskLevel::Moderate {
        next_steps.push(next_step(
            Urgency::Soon,
            "Tell a professional about any thoughts of self-harm, even if they pass quickly.",
            "Beritahu profesional tentang sebarang fikiran untuk mencederakan diri, walaupun ia cepat berlalu.",
        ));
    }

    let summary = match bucket {
        Bucket::Severe => (
            "Your results suggest you are going through a very difficult time. You deserve support, and reaching out now can help.",
            "Keputusan anda menunjukkan anda sedang melalui masa yang sangat sukar. Anda layak mendapat sokongan, dan mendapatkan bantuan sekarang boleh membantu.",
        ),
        Bucket::Moderate => (
            "Your results suggest you are experiencing symptoms that are worth paying attention to. Support from a professional can make a real difference.",
            "Keputusan anda menunjukkan anda mengalami simptom yang wajar diberi perhatian. Sokongan daripada profesional boleh membawa perubahan yang nyata.",
        ),
        Bucket::MildOrBelow => (
            "Your results suggest you are coping reasonably well at the moment. Keep looking after yourself.",
            "Keputusan anda menunjukkan anda sedang menghadapinya dengan agak baik buat masa ini. Teruskan menjaga diri anda.",
        ),
    };

    InsightDraft {
        summary: format!(
            "{} {} This is a screening result, not a diagnosis.",
            key_findings[0].text, summary.0
        ),
        summary_localized: format!(
            "{} {} Ini ialah keputusan saringan, bukan diagnosis.",
            key_findings[0].text_localized, summary.1
        ),
        key_findings,
        recommendations,
        coping_strategies,
        risk_factors,
        next_steps,
    }
}

fn finding(kind: FindingKind, text: impl Into<String>, text_localized: impl Into<String>) -> KeyFinding {
    KeyFinding {
        text: text.into(),
        text_localized: text_localized.into(),
        kind,
    }
}

fn recommendation(
    priority: Priority,
    text: impl Into<String>,
    text_localized: impl Into<String>,
) -> Recommendation {
    Recommendation {
        text: text.into(),
        text_localized: text_localized.into(),
        priority,
    }
}

fn coping(title: &str, title_localized: &str, description: &str, description_localized: &str) -> CopingStrategy {
    CopingStrategy {
        title: title.to_string(),
        title_localized: title_localized.to_string(),
        description: description.to_string(),
        description_localized: description_localized.to_string(),
    }
}

fn risk_factor(level: RiskFactorLevel, text: &str, text_localized: &str) -> RiskFactor {
    RiskFactor {
        text: text.to_string(),
        text_localized: text_localized.to_string(),
        level,
    }
}

fn next_step(urgency: Urgency, action: impl Into<String>, action_localized: impl Into<String>) -> NextStep {
    NextStep {
        action: action.into(),
        action_localized: action_localized.into(),
        urgency,
    }
}
