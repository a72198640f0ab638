//! Prompt composition for each intent.

use std::time::Duration;

use database::ChatHistoryEntry;
use provider_core::GenerationRequest;

use crate::intent::Intent;
use crate::profile_context::{ProfileContext, ResponseStyle};
use crate::sentiment::{Sentiment, SentimentLabel};
use crate::text::format_decimal;

/// Safety rules included in every system prompt.
pub const SAFETY_RULES: &str = "Safety rules:\n\
- Never prescribe medication or give dosages.\n\
- Always recommend consulting a qualified healthcare professional for serious or persistent concerns.";

const NORMAL_SYSTEM: &str = "You are a personalized healthcare AI assistant. Your responses MUST be:\n\
1. PERSONALIZED - Tailored to the patient's profile (age, weight, gender, health conditions, medication history, family history)\n\
2. CONTEXT-AWARE - Consider all medical history when giving advice\n\
3. SAFE - Never prescribe medications, always recommend consulting healthcare providers for serious concerns\n\
4. EMPATHETIC - Match the patient's emotional state based on sentiment analysis\n\
5. RELEVANT - Stay focused on the patient's specific health context";

const GREETING_SYSTEM: &str =
    "You are a friendly healthcare AI assistant. Create warm, personalized greetings.";

const URGENT_SYSTEM: &str = "You are a healthcare AI assistant responding to an urgent crisis situation. \
Be immediate, empathetic, and action-oriented.";

/// Sampling limits for one intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl GenerationParams {
    /// Limits used for each intent.
    pub fn for_intent(intent: Intent) -> Self {
        match intent {
            Intent::Normal => Self {
                temperature: 0.7,
                max_tokens: 500,
                timeout: Duration::from_secs(30),
            },
            Intent::Greeting => Self {
                temperature: 0.8,
                max_tokens: 150,
                timeout: Duration::from_secs(10),
            },
            Intent::Urgent => Self {
                temperature: 0.8,
                max_tokens: 300,
                timeout: Duration::from_secs(15),
            },
        }
    }
}

/// System instructions plus user content, ready for a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
    pub intent: Intent,
}

impl ComposedPrompt {
    /// Attach the intent's generation limits.
    pub fn into_request(self) -> GenerationRequest {
        let params = GenerationParams::for_intent(self.intent);
        GenerationRequest::new(self.system, self.user)
            .with_temperature(params.temperature)
            .with_max_tokens(params.max_tokens)
            .with_timeout(params.timeout)
    }
}

/// Serialize turns as `User: … | AI: …` lines, in the order given.
pub fn format_history(entries: &[ChatHistoryEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("User: {} | AI: {}", e.user_message, e.ai_response))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt for `intent`.
pub fn compose(
    message: &str,
    history_text: &str,
    profile: &ProfileContext,
    sentiment: &Sentiment,
    intent: Intent,
) -> ComposedPrompt {
    let (system, user) = match intent {
        Intent::Greeting => (GREETING_SYSTEM, greeting_content(message, profile)),
        Intent::Urgent => (URGENT_SYSTEM, urgent_content(message, profile)),
        Intent::Normal => (
            NORMAL_SYSTEM,
            normal_content(message, history_text, profile, sentiment),
        ),
    };

    ComposedPrompt {
        system: format!("{system}\n\n{SAFETY_RULES}"),
        user,
        intent,
    }
}

fn greeting_content(message: &str, profile: &ProfileContext) -> String {
    let rendered = profile.render();
    let profile_block = if rendered.is_empty() {
        "New patient".to_string()
    } else {
        rendered
    };

    format!(
        "Generate a warm, personalized greeting for this healthcare conversation.\n\n\
         PATIENT PROFILE:\n{profile_block}\n\n\
         The patient just said: \"{message}\"\n\n\
         Create a friendly, personalized greeting that:\n\
         1. Uses their name if available\n\
         2. Acknowledges their profile context naturally\n\
         3. Is warm, professional, and inviting\n\
         4. Keeps it to 1-2 sentences\n\
         5. Sets a supportive tone for a healthcare conversation\n\n\
         Generate the personalized greeting:"
    )
}

fn urgent_content(message: &str, profile: &ProfileContext) -> String {
    let rendered = profile.render();
    let profile_block = if rendered.is_empty() {
        "Limited profile available".to_string()
    } else {
        rendered
    };

    format!(
        "URGENT SITUATION - IMMEDIATE RESPONSE NEEDED\n\n\
         PATIENT PROFILE:\n{profile_block}\n\n\
         PATIENT URGENT MESSAGE: {message}\n\n\
         The patient is expressing an urgent need for help. Provide an empathetic, personalized, and immediate response that:\n\
         1. Acknowledges their distress personally (use their name if available)\n\
         2. Provides immediate crisis support information\n\
         3. Takes into account their age, health conditions, and medical history when giving safety advice\n\
         4. Is warm, supportive, and action-oriented\n\
         5. Directs them to immediate help (emergency services, crisis lines)\n\
         6. Keeps it concise but personalized - this is an emergency\n\n\
         Generate an immediate, personalized urgent response:"
    )
}

fn normal_content(
    message: &str,
    history_text: &str,
    profile: &ProfileContext,
    sentiment: &Sentiment,
) -> String {
    let rendered = profile.render();
    let profile_section = if rendered.is_empty() {
        "Note: Limited patient profile available. Provide general health advice but encourage \
         the patient to complete their profile for better personalization."
            .to_string()
    } else {
        format!(
            "PATIENT PROFILE FOR PERSONALIZATION:\n{rendered}\n\n\
             IMPORTANT: Use this profile to personalize ALL responses:\n\
             - Consider the patient's age when suggesting remedies\n\
             - Consider weight when discussing medication interactions\n\
             - Factor in existing health conditions when giving any advice\n\
             - Consider medication history to avoid suggesting things that might interact with their medications\n\
             - Factor in family medical history for risk assessment"
        )
    };

    let mut sections = vec![profile_section];

    if !history_text.trim().is_empty() {
        sections.push(format!(
            "RECENT CONVERSATION HISTORY:\n{history_text}\n\n\
             Use this history to maintain conversation continuity and context."
        ));
    }

    let score = format_decimal(sentiment.score);
    sections.push(match sentiment.label {
        SentimentLabel::Negative => format!(
            "The patient is expressing negative emotions (sentiment score: {score}%). Be extra \
             empathetic, supportive, and reassuring. Focus on understanding and providing comfort \
             while addressing their concerns."
        ),
        SentimentLabel::Positive => format!(
            "The patient seems positive (sentiment score: {score}%). Maintain an encouraging, \
             friendly tone and build on their positive state."
        ),
        SentimentLabel::Neutral => "The patient's sentiment is neutral. Provide clear, balanced \
                                    information and support."
            .to_string(),
    });

    sections.push(format!("CURRENT PATIENT MESSAGE: {message}"));

    let length_rule = match profile.response_style {
        ResponseStyle::Concise => "Keep the response concise: 1-3 sentences.",
        ResponseStyle::Detailed => {
            "Give a detailed response organized into short labeled sections \
             (possible causes, what to try now, when to seek care)."
        }
    };

    sections.push(format!(
        "INSTRUCTIONS:\n\
         - Reference the patient's specific profile factors (age, weight, health conditions, medication history) when relevant\n\
         - Personalize any remedies or suggestions to the patient's age, weight, conditions and medications\n\
         - Speak directly to the patient, using their name when known\n\
         - {length_rule}"
    ));

    sections.join("\n\n")
}
