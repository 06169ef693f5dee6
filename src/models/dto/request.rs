use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Topic must be 1-200 characters"))]
    pub topic: String,

    #[validate(range(min = 1, max = 20, message = "Question count must be 1-20"))]
    pub question_count: u8,
}

impl GenerateQuizRequest {
    pub fn new(topic: impl Into<String>, question_count: u8) -> Self {
        Self {
            topic: topic.into().trim().to_string(),
            question_count,
        }
    }
}
