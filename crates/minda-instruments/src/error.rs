use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("{instrument_id}: missing answers for {}", .missing.join(", "))]
    IncompleteAnswers {
        instrument_id: String,
        missing: Vec<String>,
    },

    #[error("unknown question '{question_id}' for instrument '{instrument_id}'")]
    UnknownQuestion {
        instrument_id: String,
        question_id: String,
    },

    #[error("{instrument_id}: answer {value} to '{question_id}' is not on the instrument's scale")]
    AnswerOutOfScale {
        instrument_id: String,
        question_id: String,
        value: u8,
    },

    #[error("{instrument_id}: no scoring range matches score {score}")]
    ScoringRange { instrument_id: String, score: u32 },

    #[error("{instrument_id}: scoring ranges do not partition [0, max]: {detail}")]
    RangePartition {
        instrument_id: String,
        detail: String,
    },
}
