//! OpenRouter chat provider.
//!
//! [`OpenRouterProvider`] implements [`ChatProvider`] for the OpenRouter
//! chat-completions API (<https://openrouter.ai/>).

use super::{ChatConfig, ChatProvider, http};
use crate::error::{AdvisorError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PROVIDER: &str = "OpenRouter";

#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

/// Chat provider backed by OpenRouter.
///
/// ```rust,ignore
/// use crop_advisor::chat::{ChatConfig, OpenRouterProvider};
///
/// let config = ChatConfig::openrouter().model("openai/gpt-4o-mini");
/// let provider = OpenRouterProvider::with_config(api_key, config)?;
/// ```
pub struct OpenRouterProvider {
    api_key: String,
    config: ChatConfig,
    client: Client,
}

impl OpenRouterProvider {
    /// Create a provider with default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ChatConfig::openrouter())
    }

    /// Create a provider with custom configuration.
    ///
    /// # Errors
    ///
    /// Fails if the key is blank or the HTTP client cannot be created.
    pub fn with_config(api_key: impl Into<String>, config: ChatConfig) -> Result<Self> {
        let api_key = api_key.into();
        let client = http::client(PROVIDER, &api_key, &config)?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    fn build_request(&self, prompt: &str) -> OpenRouterRequest {
        OpenRouterRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.config.system_prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(prompt);

        let response = http::send(
            PROVIDER,
            self.client
                .post(&self.config.base_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .header("X-Title", "Crop Variety Advisor")
                .json(&request),
        )?;

        let result: OpenRouterResponse = response.json().map_err(|e| http::upstream(PROVIDER, e))?;
        extract_answer(result)
    }
}

fn extract_answer(response: OpenRouterResponse) -> Result<String> {
    response
        .choices
        .as_ref()
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.message.as_ref())
        .map(|msg| msg.content.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            AdvisorError::UpstreamUnavailable("No response content from OpenRouter API".to_string())
        })
}

impl ChatProvider for OpenRouterProvider {
    fn ask(&self, prompt: &str) -> Result<String> {
        debug!("Sending {} character prompt to {}", prompt.len(), PROVIDER);
        self.call_api(prompt)
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let json = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "  Sow HD-2967 by mid November.  "
                }
            }]
        }"#;

        let response: OpenRouterResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            extract_answer(response).unwrap(),
            "Sow HD-2967 by mid November."
        );
    }

    #[test]
    fn test_empty_or_null_choices_are_upstream_errors() {
        let bodies = [
            r#"{"choices": []}"#,
            r#"{"choices": null}"#,
            r#"{"choices": [{"message": null}]}"#,
        ];
        for json in bodies {
            let response: OpenRouterResponse = serde_json::from_str(json).unwrap();
            let err = extract_answer(response).unwrap_err();
            assert_eq!(err.error_code(), "UPSTREAM_UNAVAILABLE");
        }
    }

    #[test]
    fn test_blank_answer_is_upstream_error() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "   "}}]}"#;
        let response: OpenRouterResponse = serde_json::from_str(json).unwrap();
        assert!(extract_answer(response).is_err());
    }

    #[test]
    fn test_request_carries_system_prompt() {
        let provider = OpenRouterProvider::new("test-key").unwrap();
        let request = provider.build_request("Which rice suits Cuttack?");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].content, "Which rice suits Cuttack?");
        assert_eq!(request.model, "deepseek/deepseek-chat");
    }

    #[test]
    fn test_blank_key_is_rejected() {
        assert!(OpenRouterProvider::new("  ").is_err());
    }

    #[test]
    fn test_custom_config_reaches_request() {
        let config = ChatConfig::openrouter()
            .model("openai/gpt-4o-mini")
            .max_tokens(200);
        let provider = OpenRouterProvider::with_config("test-key", config).unwrap();
        let request = provider.build_request("hello");
        assert_eq!(request.model, "openai/gpt-4o-mini");
        assert_eq!(request.max_tokens, 200);
        assert_eq!(provider.model(), Some("openai/gpt-4o-mini"));
    }

    #[test]
    fn test_unreachable_endpoint_is_upstream_error() {
        let config = ChatConfig::openrouter()
            .base_url("http://127.0.0.1:9/chat")
            .timeout_secs(2);
        let provider = OpenRouterProvider::with_config("test-key", config).unwrap();
        let err = provider.ask("hello").unwrap_err();
        assert_eq!(err.error_code(), "UPSTREAM_UNAVAILABLE");
    }
}
