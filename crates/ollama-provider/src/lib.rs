//! Ollama provider.
//!
//! Talks to a locally running Ollama daemon. Availability is decided by a
//! short `GET /api/tags` probe; generation uses the non-streaming
//! `POST /api/generate` endpoint with the flattened prompt.

mod config;
mod provider;

pub use config::OllamaConfig;
pub use provider::OllamaProvider;

pub use provider_core::{GenerationRequest, Provider, ProviderError};
