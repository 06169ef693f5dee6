use crate::{errors::AppError, models::domain::QuestionRecord};

/// What a generation attempt produced, as a host UI needs to tell it apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Ready(Vec<QuestionRecord>),
    /// The call succeeded but no block parsed into a complete question.
    Empty,
    /// The external call failed; nothing was parsed.
    Failed(String),
}

impl GenerationStatus {
    pub fn from_records(records: Vec<QuestionRecord>) -> Self {
        if records.is_empty() {
            GenerationStatus::Empty
        } else {
            GenerationStatus::Ready(records)
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, GenerationStatus::Ready(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            GenerationStatus::Ready(records) => {
                format!("{} question(s) ready", records.len())
            }
            GenerationStatus::Empty => {
                "The generator answered, but no usable questions could be read from it".to_string()
            }
            GenerationStatus::Failed(reason) => {
                format!("Could not generate questions: {}", reason)
            }
        }
    }
}

impl From<AppError> for GenerationStatus {
    fn from(err: AppError) -> Self {
        GenerationStatus::Failed(err.to_string())
    }
}
