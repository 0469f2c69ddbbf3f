use crate::error::LlmError;
use crate::llm::{
    build_provider_client, sanitize_api_error,
    traits::{Provider, ProviderFuture},
    types::GenerateRequest,
};
use crate::model::ChatRole;
use reqwest::Client;

mod types;
use types::{ChatRequest, ChatResponse, Message, ResponseContentBlock};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "anthropic";

pub struct AnthropicProvider {
    api_key: Option<String>,
    cached_messages_url: String,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(api_key, None)
    }

    pub fn with_base_url(api_key: Option<&str>, base_url: Option<&str>) -> Self {
        let base = base_url
            .map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'))
            .to_string();
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from);
        Self {
            api_key,
            cached_messages_url: format!("{base}/v1/messages"),
            client: build_provider_client(),
        }
    }

    fn build_request(request: &GenerateRequest) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            system: request.system.clone(),
            messages: request
                .turns
                .iter()
                .map(|turn| Message {
                    role: match turn.role {
                        ChatRole::User => "user",
                        ChatRole::Model => "assistant",
                    },
                    content: turn.text.clone(),
                })
                .collect(),
            temperature: request.temperature,
        }
    }

    fn extract_text(response: &ChatResponse) -> Result<String, LlmError> {
        let text = response
            .content
            .iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text.as_str()),
                ResponseContentBlock::Unsupported => None,
            })
            .collect::<String>();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: PROVIDER.to_string(),
            });
        }
        Ok(text)
    }

    async fn call_api(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::Auth {
            provider: PROVIDER.to_string(),
        })?;

        let response = self
            .client
            .post(&self.cached_messages_url)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("x-api-key", api_key)
            .json(request)
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

        response.json().await.map_err(anyhow::Error::msg)
    }
}

impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn generate<'a>(&'a self, request: &'a GenerateRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            let chat_request = Self::build_request(request);
            let chat_response = self.call_api(&chat_request).await?;
            if chat_response.stop_reason.as_deref() == Some("max_tokens") {
                tracing::warn!(model = %request.model, "anthropic response hit max_tokens");
            }
            Ok(Self::extract_text(&chat_response)?)
        })
    }
}
