use super::anthropic::AnthropicProvider;
use super::gemini::GeminiProvider;
use super::traits::Provider;
use crate::error::LlmError;
use std::sync::Arc;

/// Resolve API key for a provider from config and environment variables.
///
/// Resolution order:
/// 1. Explicitly provided `api_key` parameter (trimmed, filtered if empty)
/// 2. Provider-specific environment variables
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env_candidates: &[&str] = match name {
        "gemini" | "google" => &["AI_SDK_GEMINI_KEY", "GEMINI_API_KEY"],
        "anthropic" | "claude" => &["ANTHROPIC_API_KEY"],
        _ => &[],
    };

    provider_env_candidates.iter().find_map(|env_var| {
        std::env::var(env_var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Build a provider by name. `base_url` overrides the public endpoint.
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    base_url: Option<&str>,
) -> Result<Arc<dyn Provider>, LlmError> {
    let key = resolve_api_key(name, api_key);
    match name {
        "gemini" | "google" => Ok(Arc::new(GeminiProvider::with_base_url(
            key.as_deref(),
            base_url,
        ))),
        "anthropic" | "claude" => Ok(Arc::new(AnthropicProvider::with_base_url(
            key.as_deref(),
            base_url,
        ))),
        other => Err(LlmError::UnknownProvider(other.to_string())),
    }
}
