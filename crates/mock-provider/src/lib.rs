//! Mock provider implementations for testing.
//!
//! - `StaticProvider` - always available, returns a fixed reply
//! - `FailingProvider` - unavailable, or available but every call errors
//! - `DelayedProvider` - wraps another provider with artificial delay
//! - `CountingProvider` - wraps another provider and counts probes/calls
//!
//! # Example
//!
//! ```rust
//! use mock_provider::{GenerationRequest, Provider, StaticProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_provider::ProviderError> {
//!     let provider = StaticProvider::new("Drink water and rest.");
//!     let reply = provider.generate(&GenerationRequest::new("", "hello")).await?;
//!     assert_eq!(reply, "Drink water and rest.");
//!     Ok(())
//! }
//! ```

mod counting;
mod delayed;
mod failing;
mod static_reply;

pub use provider_core::{async_trait, GenerationRequest, Provider, ProviderError};

pub use counting::{Counters, CountingProvider};
pub use delayed::DelayedProvider;
pub use failing::FailingProvider;
pub use static_reply::StaticProvider;
