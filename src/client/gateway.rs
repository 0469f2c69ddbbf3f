use crate::config::BackendConfig;
use crate::error::{ConfigError, GatewayError};
use crate::llm::{build_provider_client, sanitize_api_error, strip_code_fences};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

/// Call-and-parse access to the remote functions.
///
/// Stateless: no caching, no retries, no session affinity. Errors surface
/// exactly as the transport or the body produced them.
pub trait FunctionGateway: Send + Sync {
    fn invoke<'a>(&'a self, function: &'a str, payload: Value) -> GatewayFuture<'a, Value>;
}

/// Invokes functions over HTTP at `{base}/functions/v1/{name}`.
pub struct HttpFunctionGateway {
    client: Client,
    functions_url: String,
    anon_key: Option<String>,
    bearer: Option<String>,
}

impl HttpFunctionGateway {
    pub fn new(base_url: &str, anon_key: Option<&str>, bearer: Option<&str>) -> Self {
        Self {
            client: build_provider_client(),
            functions_url: format!("{}/functions/v1", base_url.trim_end_matches('/')),
            anon_key: anon_key.map(String::from),
            bearer: bearer.or(anon_key).map(String::from),
        }
    }

    pub fn from_config(backend: &BackendConfig) -> Result<Self, ConfigError> {
        let base_url = backend.base_url().ok_or_else(|| {
            ConfigError::Validation(
                "backend.url is not set (PROVA_BACKEND_URL or EXPO_PUBLIC_SUPABASE_URL)".into(),
            )
        })?;
        Ok(Self::new(
            base_url,
            backend.anon_key.as_deref(),
            backend.bearer_token(),
        ))
    }

    async fn call(&self, function: &str, payload: Value) -> Result<Value, GatewayError> {
        let url = format!("{}/{function}", self.functions_url);
        let mut request = self.client.post(url).json(&payload);
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key);
        }
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| GatewayError::Transport {
            function: function.to_string(),
            message: sanitize_api_error(&e.to_string()),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GatewayError::Transport {
            function: function.to_string(),
            message: sanitize_api_error(&e.to_string()),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Service {
                function: function.to_string(),
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        serde_json::from_str(&strip_code_fences(&body)).map_err(|e| GatewayError::Malformed {
            function: function.to_string(),
            message: e.to_string(),
        })
    }
}

impl FunctionGateway for HttpFunctionGateway {
    fn invoke<'a>(&'a self, function: &'a str, payload: Value) -> GatewayFuture<'a, Value> {
        Box::pin(async move {
            tracing::debug!(function, "invoking remote function");
            let result = self.call(function, payload).await;
            if let Err(e) = &result {
                tracing::warn!("{e}");
            }
            result
        })
    }
}
