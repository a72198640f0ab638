//! Deterministic replies used when no provider produced text.
//!
//! Nothing here performs I/O or fails, and every reply is non-empty.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile_context::{ProfileContext, ResponseStyle};
use crate::sentiment::{Sentiment, SentimentLabel};
use crate::text::{contains_any, format_decimal};

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z][a-zA-Z\-']+").expect("valid word regex"));

const STOPWORDS: &[&str] = &[
    "the", "is", "are", "a", "an", "and", "or", "to", "of", "in", "on", "for", "with", "it",
    "this", "that", "you", "i", "me", "my", "your", "we", "our", "user",
];

const NON_HEALTH_TRIGGERS: &[&str] = &[
    "friend",
    "friends",
    "relationship",
    "advice",
    "suggest",
    "suggestion",
    "how to",
    "how do",
];

const CLOSING_OFFER: &str = "If you want, I can suggest a short breathing or grounding exercise, \
or help you decide whether to contact a provider.";

/// Canned guidance for one symptom family.
struct SymptomCategory {
    terms: &'static [&'static str],
    reason: &'static str,
    tip: &'static str,
    suggestions: &'static [&'static str],
    red_flags: &'static [&'static str],
}

const NAUSEA: SymptomCategory = SymptomCategory {
    terms: &["nausea", "nauseous", "vomit", "sick to my stomach"],
    reason: "Common causes of nausea include viral gastroenteritis (stomach flu), food poisoning, \
             medication side effects, migraines, motion sickness, pregnancy, or acid reflux.",
    tip: "Try sipping small amounts of fluid, resting, and eating bland foods if tolerated.",
    suggestions: &[
        "Try to rest and avoid strong smells.",
        "Sip small amounts of clear fluids (water, oral rehydration) to avoid dehydration.",
        "Eat bland foods (toast, crackers, bananas) if you can tolerate them.",
        "Avoid alcohol and heavy fatty meals until symptoms improve.",
    ],
    red_flags: &[
        "High fever with severe abdominal pain",
        "Repeated vomiting and inability to keep fluids down",
        "Signs of dehydration (very little urine, dizziness when standing)",
        "Blood in vomit or black stools",
    ],
};

const HEADACHE: SymptomCategory = SymptomCategory {
    terms: &["headache", "migraine", "pain in head"],
    reason: "Headaches are often caused by tension, dehydration, lack of sleep, eye strain, \
             skipped meals, caffeine changes, or migraine.",
    tip: "Try resting in a quiet, dim room and drinking some water.",
    suggestions: &[
        "Rest in a quiet, dimly lit room and take a break from screens.",
        "Drink a glass of water and have a light snack if you haven't eaten.",
        "Apply a cool or warm compress to your forehead or neck.",
    ],
    red_flags: &[
        "A sudden, severe headache that feels like the worst of your life",
        "Headache with fever and a stiff neck",
        "Headache after a head injury",
        "Confusion, weakness, or trouble speaking",
    ],
};

const DIZZINESS: SymptomCategory = SymptomCategory {
    terms: &["dizzy", "dizziness", "see clearly", "vision"],
    reason: "Dizziness can be caused by low blood pressure, dehydration, inner ear issues, \
             low blood sugar, or medication effects.",
    tip: "Try sitting or lying down and getting up slowly.",
    suggestions: &[
        "Sit or lie down until the feeling passes and get up slowly.",
        "Ensure you are hydrated and have eaten something light if you haven't in a while.",
    ],
    red_flags: &[
        "Sudden severe dizziness with difficulty speaking or weakness — seek emergency care.",
    ],
};

const CATEGORIES: &[&SymptomCategory] = &[&NAUSEA, &HEADACHE, &DIZZINESS];

/// Most frequent non-stopword of three or more letters, if it appears at
/// least twice. Ties go to the alphabetically first word.
pub fn extract_topic(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for word in WORD.find_iter(&lower).map(|m| m.as_str()) {
        if word.len() < 3 || STOPWORDS.contains(&word) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .min_by(|(a_word, a_count), (b_word, b_count)| {
            b_count.cmp(a_count).then_with(|| a_word.cmp(b_word))
        })
        .map(|(word, _)| word.to_string())
}

fn matched_categories(message_lower: &str) -> Vec<&'static SymptomCategory> {
    CATEGORIES
        .iter()
        .copied()
        .filter(|category| contains_any(message_lower, category.terms))
        .collect()
}

fn empathic_opener(label: SentimentLabel, name: Option<&str>) -> String {
    let greeting = name.map(|n| format!("Hello {n}, ")).unwrap_or_default();
    let line = match label {
        SentimentLabel::Negative => "I'm sorry you're experiencing this — I hear you.",
        SentimentLabel::Positive => "I'm glad to hear some positive signs — let's build on that.",
        SentimentLabel::Neutral => "Thanks for sharing — I want to help.",
    };
    format!("{greeting}{line}")
}

fn personalization(profile: &ProfileContext) -> String {
    let mut out = String::new();

    match profile.age {
        Some(age) if age < 18 => out.push_str("As someone under 18, "),
        Some(age) if age > 65 => out.push_str("Given your age, "),
        _ => {}
    }

    if let Some(conditions) = &profile.health_conditions {
        let first = conditions
            .split(',')
            .next()
            .and_then(|c| c.split('.').next())
            .map(str::trim)
            .unwrap_or_default();
        if !first.is_empty() {
            out.push_str(&format!("and considering you have {first}, "));
        }
    }

    if profile.previous_medication_history.is_some() {
        out.push_str("I'll keep your medication history in mind. ");
    }

    if out.is_empty() {
        out.push_str("Based on your profile, ");
    }
    out
}

/// Template reply for a normal message.
///
/// `history_text` only feeds topic extraction.
pub fn generate(
    message: &str,
    sentiment: &Sentiment,
    history_text: &str,
    profile: &ProfileContext,
) -> String {
    let lower = message.to_lowercase();
    let topic = extract_topic(&format!("{history_text} {message}"));
    let categories = matched_categories(&lower);
    let non_health = categories.is_empty() && contains_any(&lower, NON_HEALTH_TRIGGERS);
    let empathic = empathic_opener(sentiment.label, profile.name.as_deref());
    let pct = format_decimal(sentiment.score.clamp(0.0, 100.0));

    match profile.response_style {
        ResponseStyle::Detailed => {
            render_detailed(&empathic, topic.as_deref(), &categories, sentiment.label, &pct)
        }
        ResponseStyle::Concise => render_concise(
            &empathic,
            topic.as_deref(),
            &categories,
            non_health,
            profile,
            sentiment.label,
            &pct,
        ),
    }
}

fn render_detailed(
    empathic: &str,
    topic: Option<&str>,
    categories: &[&SymptomCategory],
    label: SentimentLabel,
    pct: &str,
) -> String {
    let mut parts = vec![empathic.to_string()];

    if let Some(topic) = topic {
        parts.push(format!("\nTopic: {topic}"));
    }

    if !categories.is_empty() {
        let reasons: Vec<&str> = categories.iter().map(|c| c.reason).collect();
        parts.push(format!("\nReasons: {}", reasons.join(" ")));

        parts.push("\nWhat you can try now:".to_string());
        for suggestion in categories.iter().flat_map(|c| c.suggestions) {
            parts.push(format!("- {suggestion}"));
        }

        parts.push("\nWhen to seek urgent care:".to_string());
        for flag in categories.iter().flat_map(|c| c.red_flags) {
            parts.push(format!("- {flag}"));
        }
    }

    parts.push(format!("\nSentiment: {label} ({pct}%)"));
    parts.push(format!("\n{CLOSING_OFFER}"));
    parts.join("\n")
}

fn render_concise(
    empathic: &str,
    topic: Option<&str>,
    categories: &[&SymptomCategory],
    non_health: bool,
    profile: &ProfileContext,
    label: SentimentLabel,
    pct: &str,
) -> String {
    let prefix = topic.map(|t| format!("[{t}] ")).unwrap_or_default();

    let mut reply = if !categories.is_empty() {
        let reasons: Vec<&str> = categories.iter().map(|c| c.reason).collect();
        let tips: Vec<&str> = categories.iter().map(|c| c.tip).collect();
        format!(
            "{empathic} {prefix}Possible causes include: {} {}",
            reasons.join(" "),
            tips.join(" ")
        )
    } else if non_health {
        format!(
            "{empathic} {prefix}For questions about friends or relationships, try to be specific \
             about the situation — e.g., what happened, how it made you feel, and what outcome \
             you want. If you'd like, tell me one detail and I can suggest a next step."
        )
    } else {
        format!(
            "{empathic} {}{prefix}Could you tell me when this started or how severe it is? \
             A quick detail helps me give a more useful suggestion tailored to your situation.",
            personalization(profile)
        )
    };

    if !categories.is_empty() {
        reply.push_str(
            " If you have severe pain, repeated vomiting, or dehydration signs, please seek urgent care.",
        );
    }

    reply.push_str(&format!(" Sentiment: {label} ({pct}%)"));
    reply
}

/// Greeting used when no provider answered.
pub fn greeting_reply(profile: &ProfileContext) -> String {
    match (&profile.name, profile.health_conditions.is_some()) {
        (Some(name), true) => format!(
            "Hello {name}! I'm here to help you with your health questions. I see you have some \
             health conditions in your profile - I'll keep those in mind when assisting you. \
             How can I help you today?"
        ),
        (Some(name), false) => format!(
            "Hello {name}! I'm here to help you with your health questions. \
             How can I assist you today?"
        ),
        (None, _) => "Hello! I'm here to help you with your health questions. \
                      How can I assist you today?"
            .to_string(),
    }
}

/// Crisis-support message used when no provider answered an urgent message.
pub fn crisis_reply(profile: &ProfileContext) -> String {
    let address = profile
        .name
        .as_deref()
        .map(|name| format!("I hear you, {name} —"))
        .unwrap_or_else(|| "I hear you —".to_string());

    format!(
        "{address} it sounds like you're in urgent distress. If you are in immediate danger, \
         please call your local emergency number now (for example, 911 in the US). If you are \
         able, consider contacting a crisis line or a trusted person nearby. I'm here to help \
         you stay safe right now."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negative() -> Sentiment {
        Sentiment::new(SentimentLabel::Negative, 85.0)
    }

    #[test]
    fn test_topic_requires_two_occurrences() {
        assert_eq!(extract_topic("my knee hurts"), None);
        assert_eq!(
            extract_topic("User: my knee hurts | AI: rest it\nknee still sore"),
            Some("knee".to_string())
        );
    }

    #[test]
    fn test_topic_ties_break_alphabetically_and_skip_stopwords() {
        assert_eq!(
            extract_topic("sleep sleep back back the the the"),
            Some("back".to_string())
        );
        assert_eq!(extract_topic("it it it is is is"), None);
    }

    #[test]
    fn test_concise_symptom_reply() {
        let reply = generate(
            "I have a headache and nausea",
            &negative(),
            "",
            &ProfileContext::empty(),
        );

        assert!(reply.starts_with("I'm sorry you're experiencing this — I hear you."));
        assert!(reply.contains("Common causes of nausea"));
        assert!(reply.contains("Headaches are often caused by"));
        assert!(reply.contains("please seek urgent care."));
        assert!(reply.ends_with("Sentiment: NEGATIVE (85.0%)"));
    }

    #[test]
    fn test_detailed_symptom_reply() {
        let profile = ProfileContext {
            name: Some("Sara".into()),
            response_style: ResponseStyle::Detailed,
            ..Default::default()
        };
        let reply = generate("I feel dizzy", &negative(), "", &profile);

        assert!(reply.starts_with("Hello Sara, I'm sorry you're experiencing this"));
        assert!(reply.contains("\nReasons: Dizziness can be caused by"));
        assert!(reply.contains("What you can try now:\n- Sit or lie down"));
        assert!(reply.contains("When to seek urgent care:\n- Sudden severe dizziness"));
        assert!(reply.contains("\nSentiment: NEGATIVE (85.0%)"));
        assert!(reply.ends_with(CLOSING_OFFER));
    }

    #[test]
    fn test_non_health_reply() {
        let reply = generate(
            "any advice about my friend?",
            &Sentiment::new(SentimentLabel::Neutral, 50.0),
            "",
            &ProfileContext::empty(),
        );
        assert!(reply.starts_with("Thanks for sharing — I want to help."));
        assert!(reply.contains("For questions about friends or relationships"));
        assert!(!reply.contains("seek urgent care"));
        assert!(reply.ends_with("Sentiment: NEUTRAL (50.0%)"));
    }

    #[test]
    fn test_symptoms_win_over_non_health() {
        let reply = generate(
            "how do I stop vomiting",
            &negative(),
            "",
            &ProfileContext::empty(),
        );
        assert!(reply.contains("Possible causes include"));
        assert!(!reply.contains("friends or relationships"));
    }

    #[test]
    fn test_personalized_follow_up() {
        let profile = ProfileContext {
            age: Some(70),
            health_conditions: Some("diabetes, hypertension".into()),
            previous_medication_history: Some("metformin".into()),
            ..Default::default()
        };
        let reply = generate(
            "my back feels stiff",
            &Sentiment::new(SentimentLabel::Positive, 90.0),
            "",
            &profile,
        );
        assert!(reply.contains(
            "Given your age, and considering you have diabetes, \
             I'll keep your medication history in mind. Could you tell me"
        ));
        assert!(reply.ends_with("Sentiment: POSITIVE (90.0%)"));
    }

    #[test]
    fn test_follow_up_without_profile() {
        let reply = generate(
            "something feels off",
            &Sentiment::new(SentimentLabel::Neutral, 50.0),
            "",
            &ProfileContext::empty(),
        );
        assert!(reply.contains("Based on your profile, Could you tell me"));
    }

    #[test]
    fn test_topic_prefix_in_concise_reply() {
        let reply = generate(
            "my shoulder is worse",
            &Sentiment::new(SentimentLabel::Neutral, 50.0),
            "User: my shoulder aches | AI: rest it",
            &ProfileContext::empty(),
        );
        assert!(reply.contains("[shoulder] Could you tell me"));
    }

    #[test]
    fn test_greeting_reply_variants() {
        let mut profile = ProfileContext::empty();
        assert!(greeting_reply(&profile).starts_with("Hello! I'm here"));

        profile.name = Some("Sara".into());
        assert!(greeting_reply(&profile).starts_with("Hello Sara! I'm here"));
        assert!(!greeting_reply(&profile).contains("health conditions"));

        profile.health_conditions = Some("asthma".into());
        assert!(greeting_reply(&profile).contains("I see you have some health conditions"));
    }

    #[test]
    fn test_crisis_reply_variants() {
        let mut profile = ProfileContext::empty();
        assert!(crisis_reply(&profile).starts_with("I hear you — it sounds like"));

        profile.name = Some("Sara".into());
        let reply = crisis_reply(&profile);
        assert!(reply.starts_with("I hear you, Sara — it sounds like"));
        assert!(reply.contains("emergency number"));
    }
}
