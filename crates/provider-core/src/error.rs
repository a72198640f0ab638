//! Error types for provider operations.

use thiserror::Error;

/// Errors that can occur while probing or calling a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider is not available (not configured or not reachable).
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A network error occurred talking to the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered but the answer could not be used.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The provider returned no usable text.
    #[error("empty response")]
    EmptyResponse,

    /// A timeout occurred during generation.
    #[error("generation timed out")]
    Timeout,
}
