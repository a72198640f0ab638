//! Delayed provider - wraps another provider with artificial delay.

use std::time::Duration;

use provider_core::{async_trait, GenerationRequest, Provider, ProviderError};
use tokio::time::sleep;

/// A provider that wraps another provider and delays generation.
///
/// Useful for testing timeout handling and concurrent registry access.
pub struct DelayedProvider<P: Provider> {
    inner: P,
    delay: Duration,
}

impl<P: Provider> DelayedProvider<P> {
    /// Create a new DelayedProvider with the specified delay.
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a provider with a delay in milliseconds.
    pub fn with_millis(inner: P, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<P: Provider> Provider for DelayedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn probe(&self) -> bool {
        sleep(self.delay).await;
        self.inner.probe().await
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let delayed = async {
            sleep(self.delay).await;
            self.inner.generate(request).await
        };
        tokio::time::timeout(request.timeout, delayed)
            .await
            .map_err(|_| ProviderError::Timeout)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticProvider;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_generate() {
        let provider = DelayedProvider::with_millis(StaticProvider::new("ok"), 100);

        let start = Instant::now();
        let reply = provider
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap();

        assert_eq!(reply, "ok");
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_respects_request_timeout() {
        let provider = DelayedProvider::with_millis(StaticProvider::new("ok"), 500);
        let request = GenerationRequest::new("", "hi").with_timeout(Duration::from_millis(20));

        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout));
    }
}
