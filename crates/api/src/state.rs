//! Application state shared across handlers.

use database::Database;
use orchestrator::Orchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Chat pipeline.
    pub orchestrator: Orchestrator,
    /// Secret required by admin routes.
    pub admin_key: String,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, orchestrator: Orchestrator, admin_key: impl Into<String>) -> Self {
        Self {
            db,
            orchestrator,
            admin_key: admin_key.into(),
        }
    }
}
