use secrecy::SecretString;
use std::{env, path::PathBuf, time::Duration};

use crate::errors::{AppError, AppResult};

/// Countdown shape for one timed question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownConfig {
    pub total: Duration,
    pub tick: Duration,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(5),
            tick: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub store_path: PathBuf,
    pub storage_key: String,
    pub countdown_secs: u64,
    pub tick_millis: u64,
    pub question_count: u8,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            model: env::var("QUIZ_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            store_path: env::var("QUIZ_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("quiz_store.json")),
            storage_key: env::var("QUIZ_STORAGE_KEY")
                .unwrap_or_else(|_| "quiz_questions".to_string()),
            countdown_secs: env::var("QUIZ_COUNTDOWN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(5),
            tick_millis: env::var("QUIZ_TICK_MILLIS")
                .ok()
                .and_then(|m| m.parse().ok())
                .filter(|m| *m > 0)
                .unwrap_or(1000),
            question_count: env::var("QUIZ_QUESTION_COUNT")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(5),
        }
    }

    pub fn countdown(&self) -> CountdownConfig {
        CountdownConfig {
            total: Duration::from_secs(self.countdown_secs),
            tick: Duration::from_millis(self.tick_millis),
        }
    }

    /// Generation needs an API key; replaying saved questions does not.
    pub fn validate_for_generation(&self) -> AppResult<()> {
        if self.openai_api_key.is_none() {
            return Err(AppError::Config(
                "OPENAI_API_KEY is not set; set it to generate new questions".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::Config("QUIZ_MODEL must not be empty".to_string()));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            openai_api_key: Some(SecretString::from("test_api_key".to_string())),
            openai_base_url: None,
            model: "test-model".to_string(),
            store_path: PathBuf::from("quiz_store_test.json"),
            storage_key: "quiz_questions".to_string(),
            countdown_secs: 5,
            tick_millis: 1000,
            question_count: 5,
        }
    }
}
