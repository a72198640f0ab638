//! Small text helpers shared by the classifiers and templates.

/// Whether `term` occurs in `haystack_lower` starting at a word boundary.
///
/// `haystack_lower` must already be lowercased; `term` is lowercase.
/// Only the start of the match is anchored, so `ill` matches "illness"
/// but not "will", and `suicid` matches "suicidal".
pub fn contains_term(haystack_lower: &str, term: &str) -> bool {
    haystack_lower.match_indices(term).any(|(start, _)| {
        haystack_lower[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

/// Whether any of `terms` occurs in `haystack_lower` (see [`contains_term`]).
pub fn contains_any(haystack_lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| contains_term(haystack_lower, term))
}

/// Render a number the way scores and weights are shown to users:
/// whole numbers keep one decimal (`85.0`), others print as-is (`61.25`).
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whether a stored free-text value carries information.
///
/// Empty strings and the placeholders `none` / `n/a` (any case) do not.
pub fn is_meaningful(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    !(value.is_empty() || value == "none" || value == "n/a")
}
