//! In-process model provider.
//!
//! The lowest-priority provider. It wraps any [`TextGenerator`] (a
//! blocking, locally loaded model) and runs it on the blocking thread
//! pool. The provider is only available when `USE_LOCAL_MODEL` is truthy,
//! a generator has been linked in, and the model loads.
//!
//! With the `candle` feature, [`LocalModelProvider::from_env`] links a
//! [`CandleGenerator`] that downloads `LOCAL_MODEL_NAME` from the Hugging
//! Face Hub and runs it on the CPU.
//!
//! Small local models tend to echo their prompt and ramble, so the raw
//! output is cleaned with [`clean_output`] before it is returned.

#[cfg(feature = "candle")]
mod candle_model;
mod config;
mod generator;
mod provider;

#[cfg(feature = "candle")]
pub use candle_model::{chat_prompt, sample_tokens, CandleGenerator, CausalModel};
pub use config::LocalModelConfig;
pub use generator::{clean_output, TextGenerator, MAX_SENTENCES};
pub use provider::LocalModelProvider;

pub use provider_core::{GenerationRequest, Provider, ProviderError};
