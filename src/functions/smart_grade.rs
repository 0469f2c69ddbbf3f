use super::RoutedProvider;
use super::prompts::smart_grade_prompt;
use crate::llm::parse_model_json;
use crate::model::{SmartGradeRequest, SmartGradeResult};
use anyhow::Result;

/// Goals shorter than this (trimmed) score 0 without a model call.
pub const MIN_GRADE_CHARS: usize = 5;
const MAX_SCORE: u8 = 100;

pub async fn smart_grade(
    route: &RoutedProvider,
    request: &SmartGradeRequest,
) -> Result<SmartGradeResult> {
    if request.goal_text.trim().chars().count() < MIN_GRADE_CHARS {
        return Ok(SmartGradeResult::default());
    }

    let raw = route
        .generate(&route.request(smart_grade_prompt(request)))
        .await?;
    let mut result: SmartGradeResult = parse_model_json(&raw)?;
    result.score = result.score.min(MAX_SCORE);
    Ok(result)
}
