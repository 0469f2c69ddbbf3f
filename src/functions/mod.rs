//! Serverless functions behind `POST /functions/v1/{name}`.
//!
//! Each function wraps one upstream model call: build the prompt, call the
//! routed provider, strip code fences and decode the JSON reply. The axum
//! router adds body limits, timeouts and CORS.

mod goal_parse;
mod handlers;
mod onboarding_chat;
pub mod prompts;
mod reality_check;
mod smart_grade;
#[cfg(test)]
pub(crate) mod test_support;

pub use goal_parse::{MIN_PARSE_CHARS, goal_parse};
pub use onboarding_chat::onboarding_chat;
pub use reality_check::reality_check;
pub use smart_grade::{MIN_GRADE_CHARS, smart_grade};

use crate::config::{Config, FunctionRoute, FunctionsConfig, GatewayConfig};
use crate::error::LlmError;
use crate::llm::{GenerateRequest, Provider, create_provider};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use handlers::{handle_function, handle_health};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum FunctionName {
    SmartGrade,
    GoalParse,
    RealityCheck,
    OnboardingChat,
}

/// A provider bound to the model settings of one function.
#[derive(Clone)]
pub struct RoutedProvider {
    pub provider: Arc<dyn Provider>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl RoutedProvider {
    pub fn new(provider: Arc<dyn Provider>, route: &FunctionRoute) -> Self {
        Self {
            provider,
            model: route.model.clone(),
            max_tokens: route.max_tokens,
            temperature: route.temperature,
        }
    }

    pub fn from_config(
        route: &FunctionRoute,
        functions: &FunctionsConfig,
    ) -> Result<Self, LlmError> {
        let provider = create_provider(
            &route.provider,
            functions.api_key_for(&route.provider),
            functions.base_url_for(&route.provider),
        )?;
        Ok(Self::new(provider, route))
    }

    /// JSON-mode request carrying this route's model settings.
    pub fn request(&self, prompt: impl Into<String>) -> GenerateRequest {
        GenerateRequest::prompt(self.model.clone(), prompt)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .json()
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        self.provider
            .generate(request)
            .await
            .with_context(|| format!("{} call failed", self.provider.name()))
    }
}

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub smart_grade: RoutedProvider,
    pub goal_parse: RoutedProvider,
    pub reality_check: RoutedProvider,
    pub onboarding_chat: RoutedProvider,
}

impl AppState {
    pub fn from_config(functions: &FunctionsConfig) -> Result<Self, LlmError> {
        Ok(Self {
            smart_grade: RoutedProvider::from_config(&functions.smart_grade, functions)?,
            goal_parse: RoutedProvider::from_config(&functions.goal_parse, functions)?,
            reality_check: RoutedProvider::from_config(&functions.reality_check, functions)?,
            onboarding_chat: RoutedProvider::from_config(&functions.onboarding_chat, functions)?,
        })
    }

    pub fn route(&self, function: FunctionName) -> &RoutedProvider {
        match function {
            FunctionName::SmartGrade => &self.smart_grade,
            FunctionName::GoalParse => &self.goal_parse,
            FunctionName::RealityCheck => &self.reality_check,
            FunctionName::OnboardingChat => &self.onboarding_chat,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

pub fn build_app(state: AppState, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/functions/v1/{name}", post(handle_function))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(gateway.request_timeout_secs),
        ))
        .layer(cors_layer(&gateway.cors_origins))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("functions server shutting down");
}

/// Run the functions server.
pub async fn run_functions_server(host: &str, port: u16, config: &Config) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    run_functions_server_with_listener(listener, config).await
}

/// Run the functions server from a pre-bound listener.
pub async fn run_functions_server_with_listener(
    listener: tokio::net::TcpListener,
    config: &Config,
) -> Result<()> {
    let state = AppState::from_config(&config.functions)?;
    let local_addr = listener.local_addr()?;

    for (name, route) in config.functions.routes() {
        tracing::info!(function = name, provider = %route.provider, model = %route.model, "route");
    }
    tracing::info!("functions server listening on http://{local_addr}/functions/v1/");

    let app = build_app(state, &config.gateway);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
