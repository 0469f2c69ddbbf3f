//! Google Gemini provider (`generateContent` REST endpoint).

use crate::error::LlmError;
use crate::llm::{
    build_provider_client, sanitize_api_error,
    traits::{Provider, ProviderFuture},
    types::{ChatTurn, GenerateRequest},
};
use crate::model::ChatRole;
use reqwest::Client;

mod types;
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PROVIDER: &str = "gemini";

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(api_key, None)
    }

    pub fn with_base_url(api_key: Option<&str>, base_url: Option<&str>) -> Self {
        let resolved_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from);
        let base_url = base_url
            .map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'))
            .to_string();

        Self {
            api_key: resolved_key,
            base_url,
            client: build_provider_client(),
        }
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn role_name(role: ChatRole) -> &'static str {
        match role {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }

    fn map_turn(turn: &ChatTurn) -> Content {
        Content {
            role: Some(Self::role_name(turn.role).to_string()),
            parts: vec![Part::text(turn.text.clone())],
        }
    }

    fn build_request(request: &GenerateRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: request.turns.iter().map(Self::map_turn).collect(),
            system_instruction: request.system.as_ref().map(|system| Content {
                role: None,
                parts: vec![Part::text(system.clone())],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request.json_response.then_some("application/json"),
            },
        }
    }

    fn extract_text(result: &GenerateContentResponse) -> Result<String, LlmError> {
        let text = result
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: PROVIDER.to_string(),
            });
        }

        Ok(text)
    }

    async fn call_api(&self, request: &GenerateRequest) -> anyhow::Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::Auth {
            provider: PROVIDER.to_string(),
        })?;

        let url = format!(
            "{}/v1beta/{}:generateContent",
            self.base_url,
            Self::model_name(&request.model)
        );
        let body = Self::build_request(request);

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Request {
                provider: PROVIDER.to_string(),
                message: sanitize_api_error(&e.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Request {
                provider: PROVIDER.to_string(),
                message: format!("{status}: {}", sanitize_api_error(&error_text)),
            }
            .into());
        }

        let result: GenerateContentResponse = response.json().await?;
        if let Some(err) = result.error.as_ref() {
            return Err(LlmError::Request {
                provider: PROVIDER.to_string(),
                message: sanitize_api_error(&err.message),
            }
            .into());
        }

        Ok(Self::extract_text(&result)?)
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn generate<'a>(&'a self, request: &'a GenerateRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            tracing::debug!(model = %request.model, turns = request.turns.len(), "gemini generate");
            self.call_api(request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })
    }

    #[test]
    fn model_name_adds_prefix_once() {
        assert_eq!(
            GeminiProvider::model_name("gemini-2.5-flash-lite"),
            "models/gemini-2.5-flash-lite"
        );
        assert_eq!(GeminiProvider::model_name("models/x"), "models/x");
    }

    #[test]
    fn build_request_maps_roles_and_json_mode() {
        let request = GenerateRequest::prompt("m", "hi")
            .with_system("be brief")
            .with_turns(vec![ChatTurn::user("[start]"), ChatTurn::model("hello")])
            .json();
        let body = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn plain_request_omits_mime_type() {
        let request = GenerateRequest::prompt("m", "hi");
        let body = serde_json::to_value(GeminiProvider::build_request(&request)).unwrap();
        assert!(body["generationConfig"].get("responseMimeType").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[tokio::test]
    async fn generate_posts_to_model_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash-lite:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "run 3x a week" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("{\"frequency\":3}")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::with_base_url(Some("test-key"), Some(&server.uri()));
        let request = GenerateRequest::prompt("gemini-2.5-flash-lite", "run 3x a week");
        let text = provider.generate(&request).await.unwrap();
        assert_eq!(text, "{\"frequency\":3}");
    }

    #[tokio::test]
    async fn upstream_error_is_sanitized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string("API key AIzaSyBadKey123 not valid"),
            )
            .mount(&server)
            .await;

        let provider = GeminiProvider::with_base_url(Some("AIzaSyBadKey123"), Some(&server.uri()));
        let err = provider
            .generate(&GenerateRequest::prompt("m", "x"))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("400"));
        assert!(!err.contains("AIzaSyBadKey123"));
    }

    #[tokio::test]
    async fn empty_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::with_base_url(Some("k"), Some(&server.uri()));
        let err = provider
            .generate(&GenerateRequest::prompt("m", "x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LlmError>(),
            Some(LlmError::EmptyResponse { .. })
        ));
    }
}
