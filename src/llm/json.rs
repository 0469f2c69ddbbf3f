//! Cleanup of model text before JSON parsing.

use crate::error::LlmError;
use serde::de::DeserializeOwned;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Remove Markdown code-fence wrappers (```` ```json ```` / ```` ``` ````)
/// wherever they appear, then trim surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find(FENCE) {
        cleaned.push_str(&rest[..pos]);
        let after = if rest[pos..].starts_with(JSON_FENCE) {
            &rest[pos + JSON_FENCE.len()..]
        } else {
            &rest[pos + FENCE.len()..]
        };
        rest = after.strip_prefix('\n').unwrap_or(after);
    }
    cleaned.push_str(rest);
    cleaned.trim().to_string()
}

/// Parse model output as JSON after stripping code fences.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned).map_err(|e| LlmError::InvalidJson(e.to_string()))
}
