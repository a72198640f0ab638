//! Failing provider - exercises the fallback paths.

use provider_core::{async_trait, GenerationRequest, Provider, ProviderError};

/// A provider that either probes unavailable or errors on every call.
pub struct FailingProvider {
    name: String,
    available: bool,
}

impl FailingProvider {
    /// A provider whose probe reports unavailable.
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: false,
        }
    }

    /// A provider that probes available but fails every generation.
    pub fn erroring(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: true,
        }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn probe(&self) -> bool {
        self.available
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
        if self.available {
            Err(ProviderError::ProcessingFailed(format!(
                "{} always fails",
                self.name
            )))
        } else {
            Err(ProviderError::Unavailable(self.name.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable() {
        let provider = FailingProvider::unavailable("down");
        assert!(!provider.probe().await);
        let err = provider
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_erroring() {
        let provider = FailingProvider::erroring("flaky");
        assert!(provider.probe().await);
        let err = provider
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ProcessingFailed(_)));
    }
}
