//! Chat orchestration for CareChat.
//!
//! This crate provides the [`Orchestrator`] type, which turns one user
//! message into a stored, sentiment-scored reply.
//!
//! # Features
//!
//! - Greeting and urgent-message short circuits
//! - Sentiment from an optional hosted model, with a keyword fallback
//! - Personalized prompts built from the stored profile and recent history
//! - Ordered provider fallback (OpenAI, Ollama, Gemini, in-process model)
//! - A rule-based responder when every provider is unavailable
//! - Urgent and mental-health-risk alerts
//!
//! # Architecture
//!
//! ```text
//! ChatRequest (from the api crate)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Reject empty messages                                   │
//! │         ↓                                                   │
//! │  2. Detect intent                                           │
//! │     • greeting → greeting prompt, NEUTRAL 50                │
//! │     • urgent   → crisis prompt, NEGATIVE 95, urgent alert   │
//! │     • normal   → classify sentiment, load history           │
//! │         ↓                                                   │
//! │  3. Generate (registry in priority order → rule-based)      │
//! │         ↓                                                   │
//! │  4. Store the turn                                          │
//! │         ↓                                                   │
//! │  5. Check the last two turns for a mental-health alert      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use database::Database;
//! use orchestrator::{ChatRequest, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:carechat.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let orchestrator = Orchestrator::from_env(db.pool().clone());
//!     let response = orchestrator
//!         .process(ChatRequest::new(1, "I have a headache"))
//!         .await?;
//!
//!     println!("{} [{}]", response.ai_response, response.sentiment.label);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod fallback;
pub mod intent;
mod orchestrator;
pub mod profile_context;
pub mod prompt;
mod registry;
pub mod sentiment;
mod text;

// Public exports
pub use config::{ChatConfig, ChatConfigBuilder};
pub use error::OrchestratorError;
pub use intent::Intent;
pub use orchestrator::{
    AlertInfo, ChatRequest, ChatResponse, Orchestrator, MENTAL_HEALTH_ALERT_MESSAGE,
    URGENT_ALERT_MESSAGE,
};
pub use profile_context::{ProfileContext, ResponseStyle};
pub use prompt::{ComposedPrompt, GenerationParams};
pub use registry::{ProviderRegistry, ProviderStatus};
pub use sentiment::{
    HuggingFaceConfig, HuggingFaceSentiment, RawSentiment, Sentiment, SentimentClassifier,
    SentimentError, SentimentLabel, SentimentModel,
};

// Re-export commonly used types from dependencies
pub use provider_core::{GenerationRequest, Provider, ProviderError};
