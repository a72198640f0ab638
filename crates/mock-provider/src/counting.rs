//! Counting provider - records how often it is probed and called.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use provider_core::{async_trait, GenerationRequest, Provider, ProviderError};

/// Shared counters, readable after the provider has been moved into a registry.
#[derive(Debug, Default)]
pub struct Counters {
    probes: AtomicUsize,
    calls: AtomicUsize,
}

impl Counters {
    /// Number of `probe` calls so far.
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Wraps another provider and counts probes and generation calls.
pub struct CountingProvider<P: Provider> {
    inner: P,
    counters: Arc<Counters>,
}

impl<P: Provider> CountingProvider<P> {
    /// Wrap `inner`.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Handle to the counters.
    pub fn counters(&self) -> Arc<Counters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl<P: Provider> Provider for CountingProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn probe(&self) -> bool {
        self.counters.probes.fetch_add(1, Ordering::SeqCst);
        self.inner.probe().await
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(request).await
    }
}
