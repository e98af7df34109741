//! Recovering JSON from model output.
//!
//! Models asked for JSON still wrap it in prose or Markdown fences. Recovery
//! tries, in order: a direct parse of the trimmed text, a parse with code
//! fences stripped, and a parse of the slice from the first `{` or `[` to the
//! last `}` or `]`.

use serde_json::Value;

/// Parse model text into JSON, tolerating fences and surrounding prose.
///
/// # Examples
///
/// ```
/// use chalkboard_pipeline::extract_json;
///
/// let wrapped = "Sure! Here you go:\n```json\n{\"topics\": []}\n```";
/// assert_eq!(extract_json(wrapped).unwrap(), serde_json::json!({"topics": []}));
/// ```
pub fn extract_json(text: &str) -> Result<Value, String> {
    let trimmed = text.trim();
    let direct_err = match serde_json::from_str(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let unfenced = strip_code_fences(trimmed);
    if unfenced != trimmed {
        if let Ok(value) = serde_json::from_str(unfenced) {
            return Ok(value);
        }
    }

    let start = unfenced.find(['{', '[']);
    let end = unfenced.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if end > start => serde_json::from_str(&unfenced[start..=end])
            .map_err(|e| format!("no parseable JSON in response: {}", e)),
        _ => Err(format!("no JSON found in response: {}", direct_err)),
    }
}

/// Remove a leading ```` ```lang ```` line and a trailing ```` ``` ````.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}
