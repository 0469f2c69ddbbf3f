use crate::harness::FunctionsTestServer;
use prova::auth::{AuthContext, PostgrestProfileStore, Route, Session};
use prova::client::{FunctionClient, HttpFunctionGateway};
use prova::composer::GoalComposer;
use prova::config::{ComposerConfig, OnboardingConfig};
use prova::model::ProofType;
use prova::onboarding::{OnboardingPhase, OnboardingSession, TurnOutcome};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &FunctionsTestServer) -> FunctionClient {
    let gateway = HttpFunctionGateway::new(&server.base_url(), Some("anon"), None);
    FunctionClient::new(Arc::new(gateway))
}

#[tokio::test]
async fn composer_grades_parses_and_checks_through_the_server() {
    let server = FunctionsTestServer::start().await;
    server
        .gemini_says(r#"{"frequencyCount": 3, "frequencyUnit": "week", "humanReadable": "3× per week"}"#)
        .await;
    server
        .anthropic_says(r#"{"score": 60, "scores": {"specific": 70}, "tips": {"specific": "Say how far"}}"#)
        .await;
    server
        .anthropic_says(r#"{"score": 78, "scores": {"specific": 85}, "tips": {}}"#)
        .await;
    server
        .anthropic_says(r#"{"likelihood": 64, "pitfalls": ["Bad weather", "Busy weeks"], "suggestions": ["Plan a treadmill fallback"]}"#)
        .await;

    let composer = GoalComposer::new(
        client_for(&server),
        ComposerConfig {
            debounce_ms: 20,
            min_goal_chars: 5,
        },
        None,
    );
    composer.set_goal_text("Run 5km three times a week");
    composer.toggle_proof_type(ProofType::Photo);
    composer.goal_blurred().expect("goal is long enough");
    composer.settle().await;

    let draft = composer.draft();
    assert_eq!(draft.grade.as_ref().map(|g| g.score), Some(78));
    assert_eq!(draft.frequency_chip(), Some("3× per week"));
    assert!(draft.grade_error.is_none());

    composer.check_reality().await.expect("a proof type is selected");
    let draft = composer.draft();
    assert_eq!(draft.reality.as_ref().map(|r| r.likelihood), Some(64));
    assert!(composer.sections().invite);
}

#[tokio::test]
async fn onboarding_runs_from_greeting_to_saved_profile() {
    let server = FunctionsTestServer::start().await;
    server
        .gemini_says(r#"{"type": "message", "text": "Hey! What do you want to work on?"}"#)
        .await;
    server
        .gemini_says(
            r#"{"type": "done", "text": "Love it. Give me a second…", "profile": {"lifeAreas": ["health"], "direction": "Run a half marathon.", "values": "Consistency.", "blockers": "Late nights.", "weeklyHours": 4}}"#,
        )
        .await;

    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_profiles"))
        .and(query_param("user_id", "eq.user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/user_profiles"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "user_id": "user-1",
            "onboarding_done": true,
            "life_areas": ["health"],
            "direction": "Run a half marathon.",
            "values": "Consistency.",
            "blockers": "Late nights.",
            "weekly_hours": 4
        }])))
        .mount(&backend)
        .await;

    let store = PostgrestProfileStore::new(&backend.uri(), Some("anon"), Some("user-token"));
    let auth = AuthContext::new(Arc::new(store));
    auth.restore(Some(Session::new("user-1", "user-token")))
        .await
        .expect("profile lookup should succeed");
    assert_eq!(auth.route(), Route::Onboarding);

    let mut session = OnboardingSession::open(
        client_for(&server),
        OnboardingConfig {
            closing_pause_ms: 10,
        },
    )
    .await;
    assert_eq!(session.history().len(), 1);

    let outcome = session
        .send("Health, mostly running")
        .await
        .expect("chat is open");
    assert!(matches!(outcome, TurnOutcome::Closing(_)));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.settle().await, OnboardingPhase::Summary);

    let record = session.confirm(&auth).await.expect("profile should save");
    assert_eq!(record.weekly_hours, 4);
    assert_eq!(auth.route(), Route::Goals);
    assert_eq!(
        auth.grading_context().map(|c| c.life_areas),
        Some(vec!["health".to_string()])
    );
}
