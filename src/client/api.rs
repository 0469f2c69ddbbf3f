use super::gateway::FunctionGateway;
use crate::error::GatewayError;
use crate::model::{
    GoalParseRequest, GoalParseResult, OnboardingChatRequest, OnboardingReply,
    RealityCheckRequest, RealityCheckResult, SmartGradeRequest, SmartGradeResult,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const SMART_GRADE: &str = "smart-grade";
pub const GOAL_PARSE: &str = "goal-parse";
pub const REALITY_CHECK: &str = "reality-check";
pub const ONBOARDING_CHAT: &str = "onboarding-chat";

/// Typed calls over a [`FunctionGateway`].
#[derive(Clone)]
pub struct FunctionClient {
    gateway: Arc<dyn FunctionGateway>,
}

impl FunctionClient {
    pub fn new(gateway: Arc<dyn FunctionGateway>) -> Self {
        Self { gateway }
    }

    async fn call<Req, Resp>(&self, function: &str, request: &Req) -> Result<Resp, GatewayError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_value(request).map_err(|e| GatewayError::Malformed {
            function: function.to_string(),
            message: format!("request could not be encoded: {e}"),
        })?;
        let value = self.gateway.invoke(function, payload).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Malformed {
            function: function.to_string(),
            message: e.to_string(),
        })
    }

    pub async fn grade_goal(
        &self,
        request: &SmartGradeRequest,
    ) -> Result<SmartGradeResult, GatewayError> {
        self.call(SMART_GRADE, request).await
    }

    pub async fn parse_goal(&self, goal_text: &str) -> Result<GoalParseResult, GatewayError> {
        let request = GoalParseRequest {
            goal_text: goal_text.to_string(),
        };
        self.call(GOAL_PARSE, &request).await
    }

    pub async fn reality_check(
        &self,
        request: &RealityCheckRequest,
    ) -> Result<RealityCheckResult, GatewayError> {
        self.call(REALITY_CHECK, request).await
    }

    pub async fn onboarding_chat(
        &self,
        request: &OnboardingChatRequest,
    ) -> Result<OnboardingReply, GatewayError> {
        self.call(ONBOARDING_CHAT, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::FakeGateway;
    use crate::model::{HistoryTurn, SmartDimension};
    use serde_json::json;

    #[tokio::test]
    async fn grade_decodes_scores_and_tips() {
        let gateway = FakeGateway::new();
        gateway.reply(
            SMART_GRADE,
            Ok(json!({
                "score": 42,
                "scores": {"specific": 50, "measurable": 90},
                "tips": {"specific": "Be more concrete", "measurable": null}
            })),
        );
        let client = FunctionClient::new(gateway.clone());

        let result = client
            .grade_goal(&SmartGradeRequest {
                goal_text: "Get fit".into(),
                proof_types: vec![],
                proof_description: String::new(),
                user_profile: None,
                parsed_frequency: None,
            })
            .await
            .unwrap();

        assert_eq!(result.score, 42);
        assert_eq!(
            result.visible_tips(),
            vec![(SmartDimension::Specific, "Be more concrete")]
        );
        assert_eq!(gateway.calls(SMART_GRADE)[0]["goalText"], "Get fit");
    }

    #[tokio::test]
    async fn shape_mismatch_is_malformed() {
        let gateway = FakeGateway::new();
        gateway.reply(REALITY_CHECK, Ok(json!({"likelihood": "very likely"})));
        let client = FunctionClient::new(gateway);

        let err = client
            .reality_check(&RealityCheckRequest {
                goal_text: "Read".into(),
                proof_types: vec![],
                parsed_frequency: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.function(), REALITY_CHECK);
    }

    #[tokio::test]
    async fn chat_request_carries_history_and_message() {
        let gateway = FakeGateway::new();
        gateway.reply(ONBOARDING_CHAT, Ok(json!({"type": "message", "text": "Why?"})));
        let client = FunctionClient::new(gateway.clone());

        let reply = client
            .onboarding_chat(&OnboardingChatRequest {
                history: vec![HistoryTurn::model("Hi!")],
                message: "health".into(),
            })
            .await
            .unwrap();

        assert_eq!(reply.text(), "Why?");
        assert_eq!(
            gateway.calls(ONBOARDING_CHAT)[0],
            json!({"history": [{"role": "model", "text": "Hi!"}], "message": "health"})
        );
    }

    #[tokio::test]
    async fn parse_goal_wraps_text() {
        let gateway = FakeGateway::new();
        gateway.reply(GOAL_PARSE, Ok(json!({"humanReadable": "daily"})));
        let client = FunctionClient::new(gateway.clone());

        let parsed = client.parse_goal("Meditate daily").await.unwrap();
        assert_eq!(parsed.readable_frequency(), Some("daily"));
        assert_eq!(
            gateway.calls(GOAL_PARSE)[0],
            json!({"goalText": "Meditate daily"})
        );
    }
}
