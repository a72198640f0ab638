//! Error types for orchestrator operations.

use thiserror::Error;

/// Errors surfaced to callers of [`Orchestrator::process`](crate::Orchestrator::process).
///
/// Provider, persistence and alert failures are logged and absorbed by the
/// pipeline; only request problems reach the caller.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The message was empty or whitespace only.
    #[error("message must not be empty")]
    EmptyMessage,
}

impl OrchestratorError {
    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, OrchestratorError::EmptyMessage)
    }
}
