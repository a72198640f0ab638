//! Google Gemini provider.
//!
//! Uses the `generateContent` REST endpoint. The provider is opt-in:
//! it only reports available when `USE_GENAI` is truthy and a
//! `GOOGLE_API_KEY` is configured. Replies of 20 characters or fewer
//! are treated as unusable.

mod config;
mod provider;

pub use config::GeminiConfig;
pub use provider::{GeminiProvider, MIN_REPLY_CHARS};

pub use provider_core::{GenerationRequest, Provider, ProviderError};
