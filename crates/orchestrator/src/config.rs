//! Configuration for the chat pipeline.

use std::env;

/// Default number of history turns included in prompts.
pub const DEFAULT_HISTORY_TURNS: i64 = 6;

/// Default score at which two consecutive negative turns raise an alert.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 85.0;

/// Configuration for the [`Orchestrator`](crate::Orchestrator).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// How many recent turns feed the prompt and the rule-based topic.
    pub history_turns: i64,

    /// Minimum NEGATIVE score for the mental-health-risk check.
    pub alert_threshold: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_turns: DEFAULT_HISTORY_TURNS,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

impl ChatConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `CHAT_HISTORY_TURNS` - turns of history (default: 6)
    /// - `ALERT_NEGATIVE_THRESHOLD` - alert score threshold (default: 85.0)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let history_turns = env::var("CHAT_HISTORY_TURNS")
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .unwrap_or(DEFAULT_HISTORY_TURNS);

        let alert_threshold = env::var("ALERT_NEGATIVE_THRESHOLD")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|t| t.is_finite())
            .unwrap_or(DEFAULT_ALERT_THRESHOLD);

        Self {
            history_turns,
            alert_threshold,
        }
    }

    /// Create a new config builder.
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder::default()
    }
}

/// Builder for ChatConfig.
#[derive(Debug, Default)]
pub struct ChatConfigBuilder {
    config: ChatConfig,
}

impl ChatConfigBuilder {
    /// Set the number of history turns.
    pub fn history_turns(mut self, turns: i64) -> Self {
        self.config.history_turns = turns;
        self
    }

    /// Set the alert threshold.
    pub fn alert_threshold(mut self, threshold: f64) -> Self {
        self.config.alert_threshold = threshold;
        self
    }

    /// Build the config.
    pub fn build(self) -> ChatConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_vars() {
        std::env::remove_var("CHAT_HISTORY_TURNS");
        std::env::remove_var("ALERT_NEGATIVE_THRESHOLD");
    }

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.history_turns, 6);
        assert_eq!(config.alert_threshold, 85.0);
    }

    #[test]
    fn test_builder() {
        let config = ChatConfig::builder()
            .history_turns(3)
            .alert_threshold(70.0)
            .build();
        assert_eq!(config.history_turns, 3);
        assert_eq!(config.alert_threshold, 70.0);
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        clear_vars();
        assert_eq!(ChatConfig::from_env(), ChatConfig::default());

        std::env::set_var("CHAT_HISTORY_TURNS", "10");
        std::env::set_var("ALERT_NEGATIVE_THRESHOLD", "90.5");
        let config = ChatConfig::from_env();
        assert_eq!(config.history_turns, 10);
        assert_eq!(config.alert_threshold, 90.5);

        std::env::set_var("CHAT_HISTORY_TURNS", "many");
        std::env::set_var("ALERT_NEGATIVE_THRESHOLD", "-");
        assert_eq!(ChatConfig::from_env(), ChatConfig::default());

        clear_vars();
    }
}
