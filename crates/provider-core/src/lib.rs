//! Core trait and types for text-generation providers.
//!
//! This crate provides the shared interface for every generation backend
//! the CareChat orchestrator can call. It defines:
//!
//! - [`Provider`] - The trait that all provider implementations must implement
//! - [`GenerationRequest`] - A system/user prompt pair plus sampling limits
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Example
//!
//! ```rust
//! use provider_core::{async_trait, GenerationRequest, Provider, ProviderError};
//!
//! struct CannedProvider;
//!
//! #[async_trait]
//! impl Provider for CannedProvider {
//!     fn name(&self) -> &str {
//!         "Canned"
//!     }
//!
//!     async fn probe(&self) -> bool {
//!         true
//!     }
//!
//!     async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
//!         Ok("Hello!".to_string())
//!     }
//! }
//! ```

mod error;
mod prompt;
mod request;
mod trait_def;

pub use error::ProviderError;
pub use prompt::hash_prompt;
pub use request::GenerationRequest;
pub use trait_def::Provider;

// Re-export async_trait for convenience
pub use async_trait::async_trait;

/// Interpret an environment flag value the way every provider config does.
///
/// `1`, `true` and `yes` (any case) are truthy, everything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
