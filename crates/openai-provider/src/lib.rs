//! OpenAI chat-completion provider.
//!
//! This crate provides the highest-priority generation backend: any
//! OpenAI-compatible `/v1/chat/completions` endpoint.
//!
//! # Features
//!
//! - System instructions and user content sent as separate chat messages
//! - Per-request token limit, temperature and timeout
//! - Availability decided by configuration alone (no network probe)
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_provider::{GenerationRequest, OpenAiProvider, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiProvider::from_env()?;
//!     if provider.probe().await {
//!         let request = GenerationRequest::new("You are helpful.", "Say hello.");
//!         println!("{}", provider.generate(&request).await?);
//!     }
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod provider;

pub use config::OpenAiConfig;
pub use provider::OpenAiProvider;

// Re-export provider-core types for convenience
pub use provider_core::{async_trait, GenerationRequest, Provider, ProviderError};
