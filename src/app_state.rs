use std::sync::Arc;

use crate::{
    config::{Config, CountdownConfig},
    db::{FileKeyValueStore, KeyValueStore},
    errors::{AppError, AppResult},
    repositories::{KeyValueQuestionRepository, QuestionRepository},
    services::{
        question_generator::{OpenAiQuestionGenerator, QuestionGenerator},
        quiz_service::QuizService,
    },
};

/// Stand-in used when no API key is configured; saved quizzes still play.
struct UnconfiguredGenerator;

#[async_trait::async_trait]
impl QuestionGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str) -> AppResult<String> {
        Err(AppError::Config(
            "OPENAI_API_KEY is not set; only saved questions are available".to_string(),
        ))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub countdown: CountdownConfig,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(&config.store_path));

        let generator: Arc<dyn QuestionGenerator> =
            match OpenAiQuestionGenerator::from_config(&config) {
                Ok(generator) => Arc::new(generator),
                Err(e) => {
                    log::warn!("Question generation disabled: {}", e);
                    Arc::new(UnconfiguredGenerator)
                }
            };

        Self::with_parts(config, store, generator)
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Self {
        let repository: Arc<dyn QuestionRepository> = Arc::new(
            KeyValueQuestionRepository::with_key(store, config.storage_key.clone()),
        );
        let quiz_service = Arc::new(QuizService::new(generator, repository));

        Self {
            quiz_service,
            countdown: config.countdown(),
            config: Arc::new(config),
        }
    }
}
