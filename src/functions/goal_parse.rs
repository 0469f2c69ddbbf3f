use super::RoutedProvider;
use super::prompts::goal_parse_prompt;
use crate::llm::parse_model_json;
use crate::model::{GoalParseRequest, GoalParseResult};
use anyhow::Result;

/// Goals shorter than this (trimmed) parse to all-null without a model call.
pub const MIN_PARSE_CHARS: usize = 3;

pub async fn goal_parse(
    route: &RoutedProvider,
    request: &GoalParseRequest,
) -> Result<GoalParseResult> {
    if request.goal_text.trim().chars().count() < MIN_PARSE_CHARS {
        return Ok(GoalParseResult::default());
    }

    let raw = route
        .generate(&route.request(goal_parse_prompt(&request.goal_text)))
        .await?;
    Ok(parse_model_json(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FunctionsConfig;
    use crate::functions::test_support::ScriptedProvider;
    use crate::model::FrequencyUnit;

    fn routed(provider: std::sync::Arc<ScriptedProvider>) -> RoutedProvider {
        RoutedProvider::new(provider, &FunctionsConfig::default().goal_parse)
    }

    #[tokio::test]
    async fn tiny_goal_returns_nulls() {
        let provider = ScriptedProvider::arc(Vec::new());
        let request = GoalParseRequest {
            goal_text: " ab ".into(),
        };
        let result = goal_parse(&routed(provider.clone()), &request).await.unwrap();
        assert_eq!(result, GoalParseResult::default());
        assert!(provider.recorded().is_empty());
    }

    #[tokio::test]
    async fn extracts_frequency_fields() {
        let provider = ScriptedProvider::replying(
            r#"{"frequencyCount":3,"frequencyUnit":"week","durationValue":"8 weeks","humanReadable":"3× per week"}"#,
        );
        let request = GoalParseRequest {
            goal_text: "Gym 3 times a week for 8 weeks".into(),
        };
        let result = goal_parse(&routed(provider.clone()), &request).await.unwrap();
        assert_eq!(result.frequency_count, Some(3));
        assert_eq!(result.frequency_unit, Some(FrequencyUnit::Week));
        assert_eq!(result.readable_frequency(), Some("3× per week"));
        assert!(provider.recorded()[0].json_response);
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let provider = ScriptedProvider::arc(vec![Err(anyhow::anyhow!("quota exceeded"))]);
        let request = GoalParseRequest {
            goal_text: "Journal nightly".into(),
        };
        let err = goal_parse(&routed(provider), &request).await.unwrap_err();
        assert!(format!("{err:#}").contains("quota exceeded"));
    }
}
