//! Intent detection: greeting, urgent, or a normal message.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::text::contains_any;

static GREETING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(hi+|hello|hey|hiya|hii)\b").expect("valid greeting regex"));

/// Phrases that escalate a message to the urgent path.
pub const URGENT_TRIGGERS: &[&str] = &[
    "urgent",
    "help needed",
    "need help",
    "emergency",
    "call an ambulance",
    "suicid",
    "i want to die",
    "kill myself",
    "hurt myself",
    "immediately",
    "in danger",
    "help me now",
];

/// Which generation path a message takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Greeting,
    Urgent,
    Normal,
}

impl Intent {
    /// Classify a message. Greetings win over urgent triggers.
    pub fn detect(message: &str) -> Self {
        if is_greeting(message) {
            Intent::Greeting
        } else if is_urgent(message) {
            Intent::Urgent
        } else {
            Intent::Normal
        }
    }
}

/// Whether the message opens with a greeting word.
pub fn is_greeting(message: &str) -> bool {
    GREETING.is_match(message)
}

/// Whether the message contains an urgent or self-harm trigger.
pub fn is_urgent(message: &str) -> bool {
    contains_any(&message.to_lowercase(), URGENT_TRIGGERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greetings() {
        for msg in ["hi", "Hiii there", "  hello", "HEY!", "hiya", "hii doc"] {
            assert_eq!(Intent::detect(msg), Intent::Greeting, "{msg}");
        }
    }

    #[test]
    fn test_not_greetings() {
        for msg in ["history of asthma", "high fever", "they said hi", "heyday"] {
            assert!(!is_greeting(msg), "{msg}");
        }
    }

    #[test]
    fn test_urgent() {
        assert_eq!(Intent::detect("I want to kill myself"), Intent::Urgent);
        assert_eq!(Intent::detect("I've been feeling suicidal"), Intent::Urgent);
        assert_eq!(Intent::detect("Please call an ambulance"), Intent::Urgent);
        assert_eq!(Intent::detect("I NEED HELP"), Intent::Urgent);
    }

    #[test]
    fn test_greeting_wins_over_urgent() {
        assert_eq!(Intent::detect("hi, I need help"), Intent::Greeting);
    }

    #[test]
    fn test_normal() {
        assert_eq!(Intent::detect("I have a bad headache"), Intent::Normal);
    }
}
