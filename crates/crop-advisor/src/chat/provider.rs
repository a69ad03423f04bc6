//! Chat provider trait.
//!
//! To add a provider, implement [`ChatProvider`] in a new file under
//! `src/chat/` and export it from `src/chat/mod.rs`.

use crate::error::{AdvisorError, Result};
use tracing::warn;

/// System prompt sent ahead of every question.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an agricultural extension assistant. \
Answer questions about crop varieties, sowing seasons and irrigation practices \
in India briefly and practically.";

/// A hosted language model that answers free-text questions.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single provider can serve every
/// session.
///
/// # Error Handling
///
/// Every failure (transport, timeout, HTTP status, empty answer) is reported
/// as [`AdvisorError::UpstreamUnavailable`].
pub trait ChatProvider: Send + Sync {
    /// Send `prompt` and return the model's answer.
    fn ask(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Model used by this provider, if known.
    fn model(&self) -> Option<&str> {
        None
    }
}

/// Ask and always return displayable text.
///
/// Failures become an inline "Chat unavailable" message instead of an error.
pub fn ask_inline(provider: &dyn ChatProvider, prompt: &str) -> String {
    if prompt.trim().is_empty() {
        return "⚠️ Please enter a question.".to_string();
    }

    match provider.ask(prompt) {
        Ok(answer) => answer,
        Err(e) => {
            warn!("{} chat failed: {}", provider.name(), e);
            match e {
                AdvisorError::UpstreamUnavailable(reason) => {
                    format!("⚠️ Chat unavailable: {}", reason)
                }
                other => format!("⚠️ Chat unavailable: {}", other),
            }
        }
    }
}
