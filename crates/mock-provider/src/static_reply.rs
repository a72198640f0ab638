//! Static provider - always available, always returns the same text.

use std::sync::Mutex;

use provider_core::{async_trait, GenerationRequest, Provider, ProviderError};

/// A provider that returns a fixed reply and remembers the last request.
pub struct StaticProvider {
    name: String,
    reply: String,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl StaticProvider {
    /// Create a provider named "static" returning `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self::named("static", reply)
    }

    /// Create a provider with a custom name.
    pub fn named(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply: reply.into(),
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request passed to `generate`, if any.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Provider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }
        Ok(self.reply.clone())
    }
}
