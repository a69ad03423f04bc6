//! Google Gemini chat provider.
//!
//! [`GeminiProvider`] implements [`ChatProvider`] for the Gemini
//! `generateContent` API (<https://ai.google.dev/>).

use super::{ChatConfig, ChatProvider, http};
use crate::error::{AdvisorError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const PROVIDER: &str = "Gemini";

// Gemini API request structures
#[derive(Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

// Gemini API response structures
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<Part>>,
}

/// Chat provider backed by Google Gemini.
pub struct GeminiProvider {
    api_key: String,
    config: ChatConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a provider with default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ChatConfig::gemini())
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

    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: self.config.system_prompt.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        }
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(prompt);

        // The key travels in a header so it never shows up in logged URLs.
        let url = format!("{}{}:generateContent", self.config.base_url, self.config.model);

        let response = http::send(
            PROVIDER,
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .header("x-goog-api-key", &self.api_key)
                .json(&request),
        )?;

        let result: GeminiResponse = response.json().map_err(|e| http::upstream(PROVIDER, e))?;
        extract_answer(result)
    }
}

fn extract_answer(response: GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .as_ref()
        .and_then(|candidates| candidates.first());

    if let Some(reason) = candidate.and_then(|c| c.finish_reason.as_deref())
        && (reason == "SAFETY" || reason == "BLOCKED")
    {
        warn!("Gemini response blocked: {}", reason);
        return Err(AdvisorError::UpstreamUnavailable(format!(
            "Gemini blocked the response ({})",
            reason
        )));
    }

    candidate
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.as_ref())
        .map(|parts| {
            parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
                .trim()
                .to_owned()
        })
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            AdvisorError::UpstreamUnavailable("No response content from Gemini API".to_owned())
        })
}

impl ChatProvider for GeminiProvider {
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
