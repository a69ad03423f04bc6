//! Free-text chat passthrough to a hosted language model.
//!
//! The chat path is independent of recommendations: a failing or slow provider
//! never affects a query against [`AppContext`](crate::AppContext).
//!
//! # Feature Flag
//!
//! The [`ChatProvider`] trait is always available. The HTTP-backed providers
//! require the `chat` feature (enabled by default).
//!
//! ```toml
//! # Disable the chat passthrough for a smaller binary
//! crop_advisor = { version = "0.1", default-features = false }
//! ```
//!
//! # Credentials
//!
//! API keys are supplied at runtime (environment or `.env` file) and are never
//! part of the configuration files.
//!
//! ```rust,ignore
//! use crop_advisor::chat::{ChatProvider, OpenRouterProvider, ask_inline};
//!
//! let provider = OpenRouterProvider::new(std::env::var("OPENROUTER_API_KEY")?)?;
//! println!("{}", ask_inline(&provider, "Which wheat variety suits late sowing?"));
//! ```

mod provider;
pub use provider::{ChatProvider, DEFAULT_SYSTEM_PROMPT, ask_inline};

#[cfg(feature = "chat")]
mod config;
#[cfg(feature = "chat")]
mod gemini;
#[cfg(feature = "chat")]
mod http;
#[cfg(feature = "chat")]
mod openrouter;

#[cfg(feature = "chat")]
pub use config::ChatConfig;

#[cfg(feature = "chat")]
pub use gemini::GeminiProvider;

#[cfg(feature = "chat")]
pub use openrouter::OpenRouterProvider;
