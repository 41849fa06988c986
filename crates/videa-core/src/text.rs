//! Helpers for cleaning LLM output before JSON parsing.

use std::sync::OnceLock;

use regex::Regex;

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"```(?:json)?\s*|\s*```").expect("valid fence regex"))
}

/// Strips markdown code fences (```json … ``` or bare ``` … ```) from a
/// model response and trims surrounding whitespace. Models are instructed
/// to return raw JSON but wrap it in fences often enough that every parse
/// site cleans first.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    fence_pattern().replace_all(text, "").trim().to_owned()
}
