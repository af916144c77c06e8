use std::sync::LazyLock;

use crate::Instrument;
use crate::scoring::{self, Question, ScaleOption, ScoringRange};

/// GAD-7: Generalized Anxiety Disorder scale.
/// 7 items over the last two weeks, each rated 0–3. Total 0–21.
pub struct Gad7;

static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
    scoring::questions(
        "gad7",
        &[
            (
                "Feeling nervous, anxious, or on edge",
                "Berasa gemuruh, cemas atau resah",
            ),
            (
                "Not being able to stop or control worrying",
                "Tidak dapat menghentikan atau mengawal rasa risau",
            ),
            (
                "Worrying too much about different things",
                "Terlalu risau tentang pelbagai perkara",
            ),
            ("Trouble relaxing", "Sukar untuk bertenang"),
            (
                "Being so restless that it is hard to sit still",
                "Terlalu gelisah sehingga sukar untuk duduk diam",
            ),
            (
                "Becoming easily annoyed or irritable",
                "Mudah berasa jengkel atau marah",
            ),
            (
                "Feeling afraid, as if something awful might happen",
                "Berasa takut seolah-olah sesuatu yang buruk akan berlaku",
            ),
        ],
    )
});

static SCALE: LazyLock<Vec<ScaleOption>> = LazyLock::new(scoring::frequency_scale);

static RANGES: LazyLock<Vec<ScoringRange>> = LazyLock::new(|| {
    scoring::ranges(&[
        (0, 4, "Minimal", "Minimum"),
        (5, 9, "Mild", "Ringan"),
        (10, 14, "Moderate", "Sederhana"),
        (15, 21, "Severe", "Teruk"),
    ])
});

impl Instrument for Gad7 {
    fn id(&self) -> &str {
        "gad7"
    }

    fn name(&self) -> &str {
        "GAD-7"
    }

    fn topic(&self) -> &str {
        "anxiety"
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
}
