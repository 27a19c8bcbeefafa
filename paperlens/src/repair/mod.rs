//! Lenient JSON recovery at the generation-service boundary.
//!
//! The service returns free text that is supposed to be JSON but often
//! arrives wrapped in code fences, prefixed with prose, or carrying small
//! syntax slips. Recovery is bounded: isolate the JSON span, try a strict
//! parse, apply one repair pass, then give up with a [`ParseError`]. The
//! runner only ever sees the structured value or the error.

use crate::errors::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

#[allow(clippy::expect_used)]
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("static pattern compiles")
}

static FENCE: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)```json|```"));
static OBJECT_SPAN: Lazy<Regex> = Lazy::new(|| pattern(r"(?s)\{.*\}"));
static ARRAY_SPAN: Lazy<Regex> = Lazy::new(|| pattern(r"(?s)\[.*\]"));
static BACKSLASH: Lazy<Regex> =
    Lazy::new(|| pattern(r#"(\\u[0-9a-fA-F]{4})|(\\["\\/bfnrt])|(\\)"#));
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| pattern(r",\s*([}\]])"));

/// Removes markdown code fences around a response.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    FENCE.replace_all(text, "").trim().to_string()
}

/// Isolates the outermost JSON object or array span from surrounding prose.
#[must_use]
pub fn extract_json_span(text: &str) -> String {
    let trimmed = strip_code_fences(text);

    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    {
        return trimmed;
    }

    if let Some(found) = OBJECT_SPAN.find(&trimmed) {
        return found.as_str().to_string();
    }
    if let Some(found) = ARRAY_SPAN.find(&trimmed) {
        return found.as_str().to_string();
    }

    trimmed
}

/// One repair pass over a candidate: escape lone backslashes (valid
/// `\uXXXX` and standard escapes survive) and delete trailing commas.
#[must_use]
pub fn repair_candidate(candidate: &str) -> String {
    let escaped = BACKSLASH.replace_all(candidate, |caps: &regex::Captures<'_>| {
        if caps.get(1).is_some() || caps.get(2).is_some() {
            caps[0].to_string()
        } else {
            "\\\\".to_string()
        }
    });

    TRAILING_COMMA.replace_all(&escaped, "$1").to_string()
}

/// Recovers a typed value from raw service output.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is irrecoverable after the bounded
/// repair passes.
pub fn parse<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let candidate = extract_json_span(raw);

    match serde_json::from_str(&candidate) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let repaired = repair_candidate(&candidate);
            serde_json::from_str(&repaired).map_err(|_| {
                tracing::debug!(error = %first_err, "strict parse failed and repair did not recover");
                ParseError::new(first_err.to_string(), &candidate)
            })
        }
    }
}

/// Recovers an untyped value from raw service output.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is irrecoverable.
pub fn parse_value(raw: &str) -> Result<serde_json::Value, ParseError> {
    parse(raw)
}
