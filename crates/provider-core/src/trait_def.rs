//! The Provider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::request::GenerationRequest;

/// A text-generation backend.
///
/// Implementations range from hosted chat-completion APIs to in-process
/// models. This trait is object-safe and can be used with `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get a human-readable name for this provider.
    fn name(&self) -> &str;

    /// Check whether the provider can be used.
    ///
    /// Probing never fails: misconfiguration, network errors and timeouts
    /// all report `false`.
    async fn probe(&self) -> bool;

    /// Generate a reply for the given request.
    ///
    /// # Returns
    ///
    /// The generated text, or an error if the call failed or produced
    /// nothing usable.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}
