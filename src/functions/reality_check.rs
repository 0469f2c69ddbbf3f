use super::RoutedProvider;
use super::prompts::reality_check_prompt;
use crate::llm::parse_model_json;
use crate::model::{RealityCheckRequest, RealityCheckResult};
use anyhow::Result;

pub async fn reality_check(
    route: &RoutedProvider,
    request: &RealityCheckRequest,
) -> Result<RealityCheckResult> {
    let raw = route
        .generate(&route.request(reality_check_prompt(request)))
        .await?;
    let mut result: RealityCheckResult = parse_model_json(&raw)?;
    result.likelihood = result.likelihood.min(100);
    Ok(result)
}
