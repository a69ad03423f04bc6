//! Settings shared by the hosted chat providers.

use super::DEFAULT_SYSTEM_PROMPT;

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default temperature for model responses.
const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Configuration for a chat provider.
///
/// Start from the preset of the provider in use and override fields with the
/// chainable setters:
///
/// ```rust,ignore
/// use crop_advisor::chat::{ChatConfig, OpenRouterProvider};
///
/// let config = ChatConfig::openrouter()
///     .model("openai/gpt-4o-mini")
///     .timeout_secs(10);
/// let provider = OpenRouterProvider::with_config(api_key, config)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use (e.g., "deepseek/deepseek-chat", "gemini-2.0-flash").
    pub model: String,
    /// Temperature for response generation (0.0 - 2.0).
    pub temperature: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Base URL for the API (useful for proxies or custom endpoints).
    pub base_url: String,
    /// System prompt sent before the user's question.
    pub system_prompt: String,
}

impl ChatConfig {
    fn preset(model: &str, max_tokens: u32, base_url: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: base_url.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Defaults for OpenRouter's chat-completions endpoint.
    pub fn openrouter() -> Self {
        Self::preset(
            "deepseek/deepseek-chat",
            600,
            "https://openrouter.ai/api/v1/chat/completions",
        )
    }

    /// Defaults for Gemini's `generateContent` endpoint.
    pub fn gemini() -> Self {
        Self::preset(
            "gemini-flash-lite-latest",
            1000,
            "https://generativelanguage.googleapis.com/v1beta/models/",
        )
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }
}
