//! The generator seam and output cleanup.

use provider_core::ProviderError;

/// Number of sentences kept from raw local-model output.
pub const MAX_SENTENCES: usize = 4;

/// A blocking, in-process text generator.
///
/// Implementations wrap a locally loaded model. Both methods may block
/// for a long time; the provider always calls them from the blocking
/// thread pool.
pub trait TextGenerator: Send + Sync + 'static {
    /// Load (or download) the named model. Called until it succeeds once.
    fn load(&self, model_name: &str) -> Result<(), ProviderError>;

    /// Generate a continuation of `prompt`. The returned text may include
    /// the prompt itself.
    fn generate(
        &self,
        prompt: &str,
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

/// Remove an echoed prompt and keep the first [`MAX_SENTENCES`] sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace.
pub fn clean_output(raw: &str, prompt: &str) -> String {
    let text = if prompt.is_empty() {
        raw.to_string()
    } else {
        raw.replace(prompt, "")
    };
    let text = text.trim();

    let mut sentences: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next, n)) = chars.peek() {
            if n.is_whitespace() {
                sentences.push(text[start..next].trim());
                start = next;
                if sentences.len() == MAX_SENTENCES {
                    break;
                }
            }
        }
    }
    if sentences.len() < MAX_SENTENCES && start < text.len() {
        sentences.push(text[start..].trim());
    }

    sentences
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
