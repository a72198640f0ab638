//! Ordered provider registry with lazily cached availability.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gemini_provider::GeminiProvider;
use local_provider::LocalModelProvider;
use ollama_provider::OllamaProvider;
use openai_provider::OpenAiProvider;
use provider_core::{GenerationRequest, Provider, ProviderError};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct ProbeState {
    /// Availability per provider, index-aligned with `providers`. Empty
    /// until the first probe pass.
    available: Vec<bool>,
    /// Set once a pass found at least one provider.
    ready: bool,
}

/// Availability of one provider, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    /// `None` until the provider has been probed.
    pub available: Option<bool>,
}

/// Generation providers in priority order.
///
/// Providers are probed on first use. A pass that finds anything is final
/// for the lifetime of the registry; a pass that finds nothing is retried
/// on the next call. Callers that were already waiting while a pass ran
/// share its result instead of probing again.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
    state: Mutex<ProbeState>,
    /// Completed probe passes. Only incremented under `state`.
    passes: AtomicU64,
}

impl ProviderRegistry {
    /// Create a registry over `providers`, highest priority first.
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            providers,
            state: Mutex::new(ProbeState::default()),
            passes: AtomicU64::new(0),
        }
    }

    /// A registry with no providers. Every generation falls through.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build the default chain from environment variables:
    /// OpenAI, Ollama, Gemini, then the in-process model.
    ///
    /// A provider whose client cannot be constructed is left out.
    pub fn from_env() -> Self {
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        push_or_warn(&mut providers, "openai", OpenAiProvider::from_env());
        push_or_warn(&mut providers, "ollama", OllamaProvider::from_env());
        push_or_warn(&mut providers, "gemini", GeminiProvider::from_env());
        providers.push(Arc::new(LocalModelProvider::from_env()));

        Self::new(providers)
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Probe providers unless a previous pass already found one.
    ///
    /// The state lock is held for the whole pass. A caller that waited on
    /// the lock while another pass completed takes that pass's result.
    ///
    /// Returns whether any provider is available.
    pub async fn ensure_ready(&self) -> bool {
        let seen = self.passes.load(Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if state.ready {
            return true;
        }
        if self.passes.load(Ordering::SeqCst) != seen {
            return false;
        }

        let mut available = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let ok = provider.probe().await;
            debug!(provider = provider.name(), available = ok, "Probed provider");
            available.push(ok);
        }

        state.ready = available.iter().any(|ok| *ok);
        state.available = available;
        self.passes.fetch_add(1, Ordering::SeqCst);

        if state.ready {
            info!("Providers ready: {}", self.available_names(&state).join(", "));
        } else {
            warn!("No generation provider available");
        }

        state.ready
    }

    /// Generate with the first available provider that returns non-blank
    /// text. Errors and blank output move on to the next provider.
    ///
    /// Returns `None` when every provider is unavailable or failed.
    pub async fn generate(&self, request: &GenerationRequest) -> Option<String> {
        if !self.ensure_ready().await {
            return None;
        }

        for provider in self.available().await {
            match provider.generate(request).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(provider = provider.name(), "Generated reply");
                    return Some(text.trim().to_string());
                }
                Ok(_) => {
                    warn!(provider = provider.name(), "{}", ProviderError::EmptyResponse);
                }
                Err(e) => {
                    warn!(provider = provider.name(), "Generation failed: {}", e);
                }
            }
        }

        None
    }

    /// Availability of every provider as last probed.
    pub async fn snapshot(&self) -> Vec<ProviderStatus> {
        let state = self.state.lock().await;
        self.providers
            .iter()
            .enumerate()
            .map(|(i, provider)| ProviderStatus {
                name: provider.name().to_string(),
                available: state.available.get(i).copied(),
            })
            .collect()
    }

    async fn available(&self) -> Vec<Arc<dyn Provider>> {
        let state = self.state.lock().await;
        self.providers
            .iter()
            .zip(state.available.iter())
            .filter(|(_, ok)| **ok)
            .map(|(provider, _)| Arc::clone(provider))
            .collect()
    }

    fn available_names(&self, state: &ProbeState) -> Vec<String> {
        self.providers
            .iter()
            .zip(state.available.iter())
            .filter(|(_, ok)| **ok)
            .map(|(provider, _)| provider.name().to_string())
            .collect()
    }
}

fn push_or_warn<P: Provider + 'static>(
    providers: &mut Vec<Arc<dyn Provider>>,
    name: &str,
    result: Result<P, ProviderError>,
) {
    match result {
        Ok(provider) => providers.push(Arc::new(provider)),
        Err(e) => warn!(provider = name, "Provider not registered: {}", e),
    }
}
