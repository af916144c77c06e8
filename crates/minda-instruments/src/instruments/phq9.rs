use std::sync::LazyLock;

use crate::Instrument;
use crate::scoring::{self, Question, ScaleOption, ScoringRange};

/// PHQ-9: Patient Health Questionnaire, depression module.
/// 9 items over the last two weeks, each rated 0–3. Total 0–27.
/// Item 9 asks about thoughts of death or self-harm.
pub struct Phq9;

static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
    scoring::questions(
        "phq9",
        &[
            (
                "Little interest or pleasure in doing things",
                "Kurang minat atau keseronokan dalam melakukan sesuatu",
            ),
            (
                "Feeling down, depressed, or hopeless",
                "Berasa sedih, murung atau putus harapan",
            ),
            (
                "Trouble falling or staying asleep, or sleeping too much",
                "Sukar untuk tidur atau tidak lena, atau terlalu banyak tidur",
            ),
            (
                "Feeling tired or having little energy",
                "Berasa letih atau kurang tenaga",
            ),
            (
                "Poor appetite or overeating",
                "Kurang selera makan atau makan berlebihan",
            ),
            (
                "Feeling bad about yourself, or that you are a failure or have let yourself or your family down",
                "Berasa teruk tentang diri sendiri, atau berasa gagal atau telah mengecewakan diri sendiri atau keluarga",
            ),
            (
                "Trouble concentrating on things, such as reading or watching television",
                "Sukar menumpukan perhatian, contohnya semasa membaca atau menonton televisyen",
            ),
            (
                "Moving or speaking so slowly that other people could have noticed, or being so fidgety or restless that you move around a lot more than usual",
                "Bergerak atau bercakap terlalu perlahan sehingga disedari orang lain, atau terlalu gelisah sehingga lebih banyak bergerak daripada biasa",
            ),
            (
                "Thoughts that you would be better off dead, or of hurting yourself in some way",
                "Terfikir bahawa lebih baik mati, atau ingin mencederakan diri dengan apa cara sekalipun",
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
        (15, 19, "Moderately Severe", "Sederhana Teruk"),
        (20, 27, "Severe", "Teruk"),
    ])
});

impl Instrument for Phq9 {
    fn id(&self) -> &str {
        "phq9"
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn topic(&self) -> &str {
        "depression"
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

    fn critical_item(&self) -> Option<&str> {
        Some("phq9_9")
    }
}
