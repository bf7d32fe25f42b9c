//! Response normalizer: markdown fence stripping and JSON parsing.
//!
//! Purely syntactic. Shape checks belong to the validator.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::errors::ParseError;

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*\s*").expect("valid regex"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("valid regex"));

/// Trim the text and drop a surrounding code fence, with or without a
/// language tag. Text without an opening fence is returned trimmed.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(open) = OPENING_FENCE.find(trimmed) else {
        return trimmed;
    };
    let body = &trimmed[open.end()..];
    match CLOSING_FENCE.find(body) {
        Some(close) => &body[..close.start()],
        None => body,
    }
}

/// Recover a JSON value from raw model output
pub fn normalize(raw: &str) -> Result<Value, ParseError> {
    let text = strip_fences(raw);
    serde_json::from_str(text).map_err(|err| ParseError::new(text, err))
}
