use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{AppState, FunctionName, goal_parse, onboarding_chat, reality_check, smart_grade};
use crate::llm::sanitize_api_error;

enum Failure {
    BadRequest(String),
    Upstream(anyhow::Error),
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, Failure> {
    serde_json::from_value(payload).map_err(|e| Failure::BadRequest(e.to_string()))
}

fn encode<T: Serialize>(result: anyhow::Result<T>) -> Result<Value, Failure> {
    let value = result.map_err(Failure::Upstream)?;
    serde_json::to_value(value).map_err(|e| Failure::Upstream(e.into()))
}

async fn dispatch(
    state: &AppState,
    function: FunctionName,
    payload: Value,
) -> Result<Value, Failure> {
    let route = state.route(function);
    match function {
        FunctionName::SmartGrade => encode(smart_grade(route, &decode(payload)?).await),
        FunctionName::GoalParse => encode(goal_parse(route, &decode(payload)?).await),
        FunctionName::RealityCheck => encode(reality_check(route, &decode(payload)?).await),
        FunctionName::OnboardingChat => encode(onboarding_chat(route, &decode(payload)?).await),
    }
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// POST /functions/v1/{name}
pub(super) async fn handle_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let Ok(function) = name.parse::<FunctionName>() else {
        let err = json!({ "error": format!("unknown function: {name}") });
        return (StatusCode::NOT_FOUND, Json(err)).into_response();
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            let err = json!({ "error": "invalid JSON body", "details": e.to_string() });
            return (StatusCode::BAD_REQUEST, Json(err)).into_response();
        }
    };

    tracing::debug!(%function, "function invoked");
    match dispatch(&state, function, payload).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(Failure::BadRequest(details)) => {
            let err = json!({ "error": format!("invalid {function} request"), "details": details });
            (StatusCode::BAD_REQUEST, Json(err)).into_response()
        }
        Err(Failure::Upstream(e)) => {
            let details = sanitize_api_error(&format!("{e:#}"));
            tracing::warn!(%function, "function failed: {details}");
            let err = json!({ "error": format!("{function} failed"), "details": details });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err)).into_response()
        }
    }
}
