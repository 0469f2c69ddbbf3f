use prova::config::Config;
use prova::functions::run_functions_server_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Functions server on an ephemeral port with both upstreams mocked.
pub struct FunctionsTestServer {
    pub port: u16,
    pub gemini: MockServer,
    pub anthropic: MockServer,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl FunctionsTestServer {
    pub async fn start() -> Self {
        let gemini = MockServer::start().await;
        let anthropic = MockServer::start().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral listener should bind");
        let port = listener
            .local_addr()
            .expect("listener should expose local address")
            .port();

        let mut config = Config::default();
        config.functions.gemini_api_key = Some("gemini-test-key".into());
        config.functions.anthropic_api_key = Some("anthropic-test-key".into());
        config.functions.gemini_base_url = Some(gemini.uri());
        config.functions.anthropic_base_url = Some(anthropic.uri());

        let handle = tokio::spawn(async move {
            run_functions_server_with_listener(listener, &config).await
        });
        wait_until_ready(port).await;

        Self {
            port,
            gemini,
            anthropic,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    /// Queue one Gemini reply whose text is `text`.
    pub async fn gemini_says(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": text}]}}]
            })))
            .up_to_n_times(1)
            .mount(&self.gemini)
            .await;
    }

    /// Queue one Anthropic reply whose text is `text`.
    pub async fn anthropic_says(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": text}],
                "stop_reason": "end_turn"
            })))
            .up_to_n_times(1)
            .mount(&self.anthropic)
            .await;
    }

    pub async fn gemini_requests(&self) -> Vec<Value> {
        self.gemini
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("upstream body should be json"))
            .collect()
    }
}

impl Drop for FunctionsTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("functions server did not become ready on port {port}");
}
