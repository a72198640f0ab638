//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use provider_core::parse_flag;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:carechat.db?mode=rwc";

/// Admin key used when `ADMIN_KEY` is unset.
pub const DEFAULT_ADMIN_KEY: &str = "123";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Shared secret for admin routes.
    pub admin_key: String,
    /// Probe providers in the background at startup.
    pub prefetch_models: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `CARECHAT_ADDR` | Server bind address | `127.0.0.1:5000` |
    /// | `DATABASE_URL` | SQLite database URL | `sqlite:carechat.db?mode=rwc` |
    /// | `ADMIN_KEY` | Admin route secret | `123` |
    /// | `PREFETCH_MODELS` | Warm up providers at startup | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("CARECHAT_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let admin_key = env::var("ADMIN_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_KEY.to_string());

        let prefetch_models = env::var("PREFETCH_MODELS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            addr,
            database_url,
            admin_key,
            prefetch_models,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid CARECHAT_ADDR format")]
    InvalidAddr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_vars() {
        for var in ["CARECHAT_ADDR", "DATABASE_URL", "ADMIN_KEY", "PREFETCH_MODELS"] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.admin_key, "123");
        assert!(!config.prefetch_models);
    }

    #[test]
    fn test_overrides_and_invalid_addr() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_vars();

        env::set_var("CARECHAT_ADDR", "0.0.0.0:8080");
        env::set_var("ADMIN_KEY", "s3cret");
        env::set_var("PREFETCH_MODELS", "yes");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.admin_key, "s3cret");
        assert!(config.prefetch_models);

        env::set_var("CARECHAT_ADDR", "not an address");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        clear_vars();
    }
}
