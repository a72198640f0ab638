//! SQLite persistence layer for CareChat.
//!
//! This crate provides async database operations for users, profiles,
//! conversations, chat history and alerts using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{chat_history, profile, user, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:carechat.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let user = user::create_user(db.pool(), "sara@example.com", "argon2-hash").await?;
//!     let profile = profile::ensure_profile(db.pool(), user.id).await?;
//!     assert_eq!(profile.response_style, "concise");
//!
//!     let recent = chat_history::recent_for_user(db.pool(), user.id, None, 6).await?;
//!     assert!(recent.is_empty());
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod chat_history;
pub mod conversation;
pub mod error;
pub mod models;
pub mod profile;
pub mod user;
pub mod validation;

pub use chat_history::NewChatEntry;
pub use error::{DatabaseError, Result};
pub use models::{Alert, AlertType, ChatHistoryEntry, Conversation, Profile, User};
pub use profile::ProfileUpdate;
pub use validation::ValidationError;

// Re-export the pool type so callers need not depend on sqlx directly
pub use sqlx::SqlitePool;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/carechat.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
