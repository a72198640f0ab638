//! Candle-backed generator for Qwen2 checkpoints from the Hugging Face Hub.
//!
//! Enabled with the `candle` feature. Weights, config and tokenizer are
//! fetched with `hf-hub` on first load and cached locally; inference runs
//! on the CPU. Checkpoints must ship a single `model.safetensors` file.

use std::sync::{Mutex, MutexGuard};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::qwen2::{Config, ModelForCausalLM};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use provider_core::ProviderError;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::generator::TextGenerator;

/// Tokens that end generation when the tokenizer knows them.
const STOP_TOKENS: &[&str] = &["<|endoftext|>", "<|im_end|>"];

const DEFAULT_SEED: u64 = 299_792_458;

/// A decoder that yields logits for the position after its input.
pub trait CausalModel: Send {
    /// `input` is shaped `[1, seq]`. `offset` is the number of tokens
    /// already in the cache. Returns logits for the next token.
    fn forward(&mut self, input: &Tensor, offset: usize) -> candle_core::Result<Tensor>;

    /// Drop cached keys and values before a new prompt.
    fn clear_kv_cache(&mut self);
}

impl CausalModel for ModelForCausalLM {
    fn forward(&mut self, input: &Tensor, offset: usize) -> candle_core::Result<Tensor> {
        ModelForCausalLM::forward(self, input, offset)
    }

    fn clear_kv_cache(&mut self) {
        ModelForCausalLM::clear_kv_cache(self)
    }
}

struct Loaded {
    model_name: String,
    model: Box<dyn CausalModel>,
    tokenizer: Tokenizer,
    stop_tokens: Vec<u32>,
}

impl Loaded {
    fn fetch(model_name: &str, device: &Device) -> Result<Self, ProviderError> {
        info!("Fetching {} from the Hugging Face Hub", model_name);
        let api = Api::new().map_err(load_error)?;
        let repo = api.repo(Repo::new(model_name.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").map_err(load_error)?;
        let tokenizer_path = repo.get("tokenizer.json").map_err(load_error)?;
        let weights_path = repo.get("model.safetensors").map_err(load_error)?;

        let config: Config =
            serde_json::from_slice(&std::fs::read(config_path).map_err(load_error)?)
                .map_err(load_error)?;
        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(load_error)?;

        // SAFETY: the cached weights file is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
            .map_err(load_error)?;
        let model = ModelForCausalLM::new(&config, vb).map_err(load_error)?;

        let stop_tokens = STOP_TOKENS
            .iter()
            .filter_map(|token| tokenizer.token_to_id(token))
            .collect();

        Ok(Self {
            model_name: model_name.to_string(),
            model: Box::new(model),
            tokenizer,
            stop_tokens,
        })
    }
}

/// [`TextGenerator`] running a Qwen2 chat model in-process with candle.
pub struct CandleGenerator {
    device: Device,
    seed: u64,
    state: Mutex<Option<Loaded>>,
}

impl Default for CandleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CandleGenerator {
    /// A CPU generator. Nothing is downloaded until [`TextGenerator::load`].
    pub fn new() -> Self {
        Self {
            device: Device::Cpu,
            seed: DEFAULT_SEED,
            state: Mutex::new(None),
        }
    }

    /// Set the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Loaded>>, ProviderError> {
        self.state
            .lock()
            .map_err(|_| ProviderError::ProcessingFailed("local model lock poisoned".into()))
    }
}

impl TextGenerator for CandleGenerator {
    fn load(&self, model_name: &str) -> Result<(), ProviderError> {
        let mut state = self.lock()?;
        if state.as_ref().is_some_and(|loaded| loaded.model_name == model_name) {
            return Ok(());
        }
        *state = Some(Loaded::fetch(model_name, &self.device)?);
        info!("Local model {} ready", model_name);
        Ok(())
    }

    fn generate(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let mut state = self.lock()?;
        let loaded = state
            .as_mut()
            .ok_or_else(|| ProviderError::Unavailable("local model not loaded".into()))?;

        let encoding = loaded
            .tokenizer
            .encode(chat_prompt(prompt), true)
            .map_err(generation_error)?;
        let ids = sample_tokens(
            loaded.model.as_mut(),
            encoding.get_ids(),
            &loaded.stop_tokens,
            max_new_tokens,
            temperature,
            self.seed,
            &self.device,
        )
        .map_err(generation_error)?;
        debug!(tokens = ids.len(), "Local model generated");

        loaded.tokenizer.decode(&ids, true).map_err(generation_error)
    }
}

/// Wrap a flat prompt in the ChatML turn markers Qwen2 chat models expect.
pub fn chat_prompt(prompt: &str) -> String {
    format!("<|im_start|>user\n{prompt}<|im_end|>\n<|im_start|>assistant\n")
}

/// Autoregressive sampling. Returns only the new tokens, without the stop
/// token. A temperature of zero or below samples greedily.
pub fn sample_tokens(
    model: &mut dyn CausalModel,
    prompt_ids: &[u32],
    stop_tokens: &[u32],
    max_new_tokens: u32,
    temperature: f32,
    seed: u64,
    device: &Device,
) -> candle_core::Result<Vec<u32>> {
    if prompt_ids.is_empty() {
        return Ok(Vec::new());
    }

    model.clear_kv_cache();
    let temperature = (temperature > 0.0).then_some(f64::from(temperature));
    let mut logits_processor = LogitsProcessor::new(seed, temperature, None);

    let mut generated = Vec::new();
    let mut input = prompt_ids.to_vec();
    let mut offset = 0;

    for _ in 0..max_new_tokens {
        let tensor = Tensor::new(input.as_slice(), device)?.unsqueeze(0)?;
        let logits = model
            .forward(&tensor, offset)?
            .flatten_all()?
            .to_dtype(DType::F32)?;
        offset += input.len();

        let next = logits_processor.sample(&logits)?;
        if stop_tokens.contains(&next) {
            break;
        }
        generated.push(next);
        input = vec![next];
    }

    Ok(generated)
}

fn load_error(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::Configuration(format!("local model: {}", e))
}

fn generation_error(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::ProcessingFailed(format!("local model: {}", e))
}
