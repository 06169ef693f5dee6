use std::sync::Arc;

use validator::Validate;

use crate::{
    constants::quiz_prompt::build_quiz_prompt,
    errors::{AppError, AppResult},
    models::{
        domain::QuestionRecord,
        dto::{GenerateQuizRequest, GenerationStatus},
    },
    repositories::QuestionRepository,
    services::{markup_parser, question_generator::QuestionGenerator},
};

pub struct QuizService {
    generator: Arc<dyn QuestionGenerator>,
    repository: Arc<dyn QuestionRepository>,
}

impl QuizService {
    pub fn new(
        generator: Arc<dyn QuestionGenerator>,
        repository: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            generator,
            repository,
        }
    }

    /// Generate, parse and persist a fresh question list.
    ///
    /// A failed generator call never reaches the parser and leaves the stored
    /// list untouched. An empty parse result is not persisted either.
    pub async fn generate_quiz(&self, request: &GenerateQuizRequest) -> GenerationStatus {
        match self.try_generate(request).await {
            Ok(records) => GenerationStatus::from_records(records),
            Err(e) => {
                log::warn!("Quiz generation for '{}' failed: {}", request.topic, e);
                GenerationStatus::from(e)
            }
        }
    }

    async fn try_generate(&self, request: &GenerateQuizRequest) -> AppResult<Vec<QuestionRecord>> {
        request.validate()?;

        let prompt = build_quiz_prompt(request);
        let markup = self.generator.generate(&prompt).await.map_err(|e| match e {
            AppError::Generation(_) => e,
            other => AppError::Generation(other.to_string()),
        })?;

        let records = markup_parser::parse(&markup);
        log::info!(
            "Parsed {} question(s) for '{}' (requested {})",
            records.len(),
            request.topic,
            request.question_count
        );

        if !records.is_empty() {
            self.repository.save(&records)?;
        }
        Ok(records)
    }

    pub fn load_saved(&self) -> Vec<QuestionRecord> {
        self.repository.load_all()
    }

    pub fn clear_saved(&self) -> AppResult<()> {
        self.repository.clear()
    }
}
