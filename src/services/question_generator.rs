use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use crate::{
    config::Config,
    constants::quiz_prompt::QUIZ_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
};

/// External text generator. A returned `Ok` is the complete response text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

pub struct OpenAiQuestionGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQuestionGenerator {
    pub fn new(api_key: &SecretString, base_url: Option<&str>, model: impl Into<String>) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        if let Some(base_url) = base_url {
            openai_config = openai_config.with_api_base(base_url);
        }
        Self {
            client: Client::with_config(openai_config),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        config.validate_for_generation()?;
        let api_key = config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| AppError::Config("OPENAI_API_KEY is not set".to_string()))?;
        Ok(Self::new(
            api_key,
            config.openai_base_url.as_deref(),
            config.model.clone(),
        ))
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": QUIZ_SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.7
        })
    }
}

/// First choice's message text, or a generation error when there is none.
fn first_choice_content(response: &Value) -> AppResult<String> {
    let content = response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::Generation("response contained no message content".to_string())
        })?;
    Ok(content.to_string())
}

#[async_trait]
impl QuestionGenerator for OpenAiQuestionGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        log::info!("Requesting quiz questions from model {}", self.model);

        let response: Value = self
            .client
            .chat()
            .create_byot(self.request_body(prompt))
            .await?;

        let content = first_choice_content(&response)?;
        log::debug!("Model returned {} bytes of markup", content.len());
        Ok(content)
    }
}
