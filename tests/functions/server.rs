use crate::harness::FunctionsTestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn call(server: &FunctionsTestServer, function: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(server.url(&format!("/functions/v1/{function}")))
        .json(&body)
        .send()
        .await
        .expect("request should complete");
    let status = response.status();
    let body = response.json().await.expect("response should be json");
    (status, body)
}

#[tokio::test]
async fn smart_grade_routes_to_anthropic_and_strips_fences() {
    let server = FunctionsTestServer::start().await;
    server
        .anthropic_says(
            "```json\n{\"score\": 42, \"scores\": {\"specific\": 50, \"measurable\": 85}, \
             \"tips\": {\"specific\": \"Be more concrete\", \"measurable\": null}}\n```",
        )
        .await;

    let (status, body) = call(
        &server,
        "smart-grade",
        json!({"goalText": "Get healthier this year", "proofTypes": ["photo"], "proofDescription": "",
               "userProfile": null, "parsedFrequency": null}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 42);
    assert_eq!(body["scores"]["achievable"], 0);
    assert_eq!(body["tips"]["specific"], "Be more concrete");
    assert!(server.gemini_requests().await.is_empty());
}

#[tokio::test]
async fn short_goal_is_graded_without_an_upstream_call() {
    let server = FunctionsTestServer::start().await;

    let (status, body) = call(&server, "smart-grade", json!({"goalText": " gym "})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 0);
    let upstream = server.anthropic.received_requests().await.unwrap_or_default();
    assert!(upstream.is_empty());
}

#[tokio::test]
async fn goal_parse_routes_to_gemini_in_json_mode() {
    let server = FunctionsTestServer::start().await;
    server
        .gemini_says(
            r#"{"frequencyCount": 3, "frequencyUnit": "week", "durationValue": "8 weeks", "humanReadable": "3× per week"}"#,
        )
        .await;

    let (status, body) = call(&server, "goal-parse", json!({"goalText": "Run 3x a week for 8 weeks"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["humanReadable"], "3× per week");
    assert_eq!(body["frequencyUnit"], "week");
    let sent = &server.gemini_requests().await[0];
    assert_eq!(
        sent["generationConfig"]["responseMimeType"],
        "application/json"
    );
}

#[tokio::test]
async fn onboarding_opening_never_returns_done() {
    let server = FunctionsTestServer::start().await;
    server
        .gemini_says(r#"{"type": "done", "text": "Hi! What brings you here?", "profile": {}}"#)
        .await;

    let (status, body) = call(&server, "onboarding-chat", json!({"history": [], "message": ""})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"type": "message", "text": "Hi! What brings you here?"}));
}

#[tokio::test]
async fn onboarding_replay_starts_with_a_user_turn() {
    let server = FunctionsTestServer::start().await;
    server
        .gemini_says(r#"{"type": "message", "text": "Why health?"}"#)
        .await;

    let (status, _) = call(
        &server,
        "onboarding-chat",
        json!({"history": [{"role": "model", "text": "Hi!"}], "message": "Health"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sent = &server.gemini_requests().await[0];
    let contents = sent["contents"].as_array().expect("contents array");
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["text"], "[start]");
    assert_eq!(contents[2]["parts"][0]["text"], "Health");
    assert!(sent.get("systemInstruction").is_some());
}

#[tokio::test]
async fn upstream_failure_is_reported_as_500() {
    let server = FunctionsTestServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .respond_with(wiremock::ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server.anthropic)
        .await;

    let (status, body) = call(
        &server,
        "reality-check",
        json!({"goalText": "Read 20 pages a day", "proofTypes": ["text"], "parsedFrequency": "daily"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "reality-check failed");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn unknown_function_and_bad_json_are_rejected() {
    let server = FunctionsTestServer::start().await;
    let client = reqwest::Client::new();

    let missing = client
        .post(server.url("/functions/v1/onboarding-extract"))
        .json(&json!({}))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let garbled = client
        .post(server.url("/functions/v1/goal-parse"))
        .header("content-type", "application/json")
        .body("{goalText")
        .send()
        .await
        .expect("request should complete");
    assert_eq!(garbled.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin_by_default() {
    let server = FunctionsTestServer::start().await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/functions/v1/smart-grade"))
        .header("origin", "http://localhost:8081")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,apikey,content-type")
        .send()
        .await
        .expect("preflight should complete");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
