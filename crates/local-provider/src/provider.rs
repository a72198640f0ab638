//! LocalModelProvider implementation.

use std::sync::Arc;

use async_trait::async_trait;
use provider_core::{GenerationRequest, Provider, ProviderError};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::LocalModelConfig;
use crate::generator::{clean_output, TextGenerator};

/// Provider that runs a linked in-process [`TextGenerator`].
pub struct LocalModelProvider {
    config: LocalModelConfig,
    generator: Option<Arc<dyn TextGenerator>>,
    loaded: OnceCell<()>,
}

impl LocalModelProvider {
    /// Create a provider with no generator linked. It never reports available.
    pub fn new(config: LocalModelConfig) -> Self {
        Self {
            config,
            generator: None,
            loaded: OnceCell::new(),
        }
    }

    /// Create a provider from environment variables.
    ///
    /// Links a `CandleGenerator` when built with the `candle`
    /// feature; otherwise no generator is linked.
    pub fn from_env() -> Self {
        let provider = Self::new(LocalModelConfig::from_env());
        #[cfg(feature = "candle")]
        let provider = provider.with_generator(Arc::new(crate::CandleGenerator::new()));
        provider
    }

    /// Whether a generator is linked.
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Link a generator implementation.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &LocalModelConfig {
        &self.config
    }

    async fn ensure_loaded(&self, generator: &Arc<dyn TextGenerator>) -> Result<(), ProviderError> {
        self.loaded
            .get_or_try_init(|| async {
                let generator = Arc::clone(generator);
                let model_name = self.config.model_name.clone();
                info!("Loading local text-generation model {}", model_name);
                tokio::task::spawn_blocking(move || generator.load(&model_name))
                    .await
                    .map_err(|e| ProviderError::ProcessingFailed(format!("load task: {}", e)))?
            })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Provider for LocalModelProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn probe(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        let Some(generator) = &self.generator else {
            warn!("USE_LOCAL_MODEL is set but no local generator is linked");
            return false;
        };
        match self.ensure_loaded(generator).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to load local model {}: {}", self.config.model_name, e);
                false
            }
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable("no local generator linked".into()))?;
        self.ensure_loaded(generator).await?;

        let prompt = request.flattened_prompt();
        let max_tokens = request.max_tokens;
        let temperature = request.temperature;
        let task = {
            let generator = Arc::clone(generator);
            let prompt = prompt.clone();
            tokio::task::spawn_blocking(move || generator.generate(&prompt, max_tokens, temperature))
        };

        let raw = tokio::time::timeout(request.timeout, task)
            .await
            .map_err(|_| ProviderError::Timeout)?
            .map_err(|e| ProviderError::ProcessingFailed(format!("generation task: {}", e)))??;

        let text = clean_output(&raw, &prompt);
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct EchoGenerator {
        loads: AtomicUsize,
        fail_load: bool,
        suffix: &'static str,
    }

    impl EchoGenerator {
        fn new(suffix: &'static str) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_load: false,
                suffix,
            }
        }
    }

    impl TextGenerator for EchoGenerator {
        fn load(&self, _model_name: &str) -> Result<(), ProviderError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_load {
                Err(ProviderError::Configuration("weights missing".into()))
            } else {
                Ok(())
            }
        }

        fn generate(&self, prompt: &str, _: u32, _: f32) -> Result<String, ProviderError> {
            Ok(format!("{} {}", prompt, self.suffix))
        }
    }

    struct SlowGenerator;

    impl TextGenerator for SlowGenerator {
        fn load(&self, _: &str) -> Result<(), ProviderError> {
            Ok(())
        }

        fn generate(&self, _: &str, _: u32, _: f32) -> Result<String, ProviderError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok("late".into())
        }
    }

    fn enabled() -> LocalModelConfig {
        LocalModelConfig::builder().enabled(true).build()
    }

    #[tokio::test]
    async fn test_unavailable_without_flag_or_generator() {
        let generator = Arc::new(EchoGenerator::new("hi"));
        let disabled = LocalModelProvider::new(LocalModelConfig::default()).with_generator(generator);
        assert!(!disabled.probe().await);

        let unlinked = LocalModelProvider::new(enabled());
        assert!(!unlinked.probe().await);
    }

    #[test]
    fn test_from_env_links_generator_with_candle() {
        let provider = LocalModelProvider::from_env();
        assert_eq!(provider.has_generator(), cfg!(feature = "candle"));
    }

    #[tokio::test]
    async fn test_loads_once() {
        let generator = Arc::new(EchoGenerator::new("hi"));
        let provider = LocalModelProvider::new(enabled()).with_generator(generator.clone());

        assert!(provider.probe().await);
        assert!(provider.probe().await);
        assert_eq!(generator.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_unavailable() {
        let generator = Arc::new(EchoGenerator {
            fail_load: true,
            ..EchoGenerator::new("hi")
        });
        let provider = LocalModelProvider::new(enabled()).with_generator(generator.clone());

        assert!(!provider.probe().await);
        assert!(!provider.probe().await);
        assert_eq!(generator.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_generate_cleans_output() {
        let generator = Arc::new(EchoGenerator::new(
            "Rest today. Drink water. Eat light meals. Sleep early. Walk tomorrow.",
        ));
        let provider = LocalModelProvider::new(enabled()).with_generator(generator);

        let reply = provider
            .generate(&GenerationRequest::new("Be kind.", "I feel tired."))
            .await
            .unwrap();
        assert_eq!(reply, "Rest today. Drink water. Eat light meals. Sleep early.");
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let provider = LocalModelProvider::new(enabled()).with_generator(Arc::new(SlowGenerator));
        let request = GenerationRequest::new("", "hi").with_timeout(Duration::from_millis(50));

        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout));
    }
}
