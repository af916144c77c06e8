use std::sync::LazyLock;

use crate::Instrument;
use crate::scoring::{self, Question, ScaleOption, ScoringRange};

/// K6: Kessler Psychological Distress Scale, six-item form.
/// Past 30 days, each rated 0–4. Total 0–24; 13+ indicates serious distress.
pub struct K6;

static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
    scoring::questions(
        "k6",
        &[
            ("How often did you feel nervous?", "Berapa kerap anda berasa gemuruh?"),
            (
                "How often did you feel hopeless?",
                "Berapa kerap anda berasa putus harapan?",
            ),
            (
                "How often did you feel restless or fidgety?",
                "Berapa kerap anda berasa resah atau gelisah?",
            ),
            (
                "How often did you feel so depressed that nothing could cheer you up?",
                "Berapa kerap anda berasa terlalu murung sehingga tiada apa yang dapat menceriakan anda?",
            ),
            (
                "How often did you feel that everything was an effort?",
                "Berapa kerap anda berasa segala-galanya memerlukan usaha yang besar?",
            ),
            (
                "How often did you feel worthless?",
                "Berapa kerap anda berasa tidak berguna?",
            ),
        ],
    )
});

static SCALE: LazyLock<Vec<ScaleOption>> = LazyLock::new(|| {
    scoring::scale(&[
        ("None of the time", "Tidak pernah"),
        ("A little of the time", "Sedikit masa"),
        ("Some of the time", "Sebahagian masa"),
        ("Most of the time", "Kebanyakan masa"),
        ("All of the time", "Sepanjang masa"),
    ])
});

static RANGES: LazyLock<Vec<ScoringRange>> = LazyLock::new(|| {
    scoring::ranges(&[
        (0, 4, "Low", "Rendah"),
        (5, 12, "Moderate", "Sederhana"),
        (13, 24, "Severe", "Teruk"),
    ])
});

impl Instrument for K6 {
    fn id(&self) -> &str {
        "k6"
    }

    fn name(&self) -> &str {
        "K6"
    }

    fn topic(&self) -> &str {
        "stress"
    }

    fn questions(&self) -> &[Question] {
        &QUESTIONS
    }

    fn scale(&self) -> &[ScaleOption] {
        &SCALE
    }

    fn scoring_ranges(&self) -> &[ScoringRange] {
        &RANGES
    }

    fn is_premium_gate(&self) -> bool {
        true
    }
}
