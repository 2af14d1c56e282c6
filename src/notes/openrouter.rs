//! OpenRouter chat completions through the OpenAI-compatible API.

use super::LanguageModel;
use crate::config::LlmSettings;
use crate::error::{NotesError, Result};
use crate::openai::create_client;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Language model served by OpenRouter (or any OpenAI-compatible endpoint).
pub struct OpenRouterModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl OpenRouterModel {
    /// Create a model client. The API key is passed explicitly rather than
    /// read from the environment here.
    pub fn new(settings: &LlmSettings, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(NotesError::Config("LLM API key is empty".to_string()));
        }

        Ok(Self {
            client: create_client(settings, api_key)?,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            top_p: settings.top_p,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenRouterModel {
    #[allow(deprecated)]
    #[instrument(skip(self, prompt), fields(model = %self.model, chars = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| NotesError::Generation(e.to_string()))?
                .into()];

        // OpenRouter understands `max_tokens`, not `max_completion_tokens`.
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .top_p(self.top_p)
            .build()
            .map_err(|e| NotesError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(describe_error)?;

        debug!("Received {} choices", response.choices.len());

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                NotesError::Generation("No response content received from API".to_string())
            })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Turn a client error into a message fit for the caller.
fn describe_error(e: OpenAIError) -> NotesError {
    match e {
        OpenAIError::Reqwest(err) if err.is_timeout() => {
            NotesError::Generation("Request timed out. Please try again.".to_string())
        }
        OpenAIError::ApiError(api) => {
            NotesError::Generation(format!("API request failed: {}", api.message))
        }
        other => NotesError::Generation(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_rejected() {
        let err = OpenRouterModel::new(&LlmSettings::default(), "  ").err().unwrap();
        assert!(matches!(err, NotesError::Config(_)));
    }

    #[test]
    fn test_model_name() {
        let settings = LlmSettings {
            model: "test/model".to_string(),
            ..LlmSettings::default()
        };
        let model = OpenRouterModel::new(&settings, "sk-or-test").unwrap();
        assert_eq!(model.model_name(), "test/model");
    }
}
