use super::RoutedProvider;
use super::prompts::{ONBOARDING_COACH_PROMPT, ONBOARDING_OPENING_PROMPT};
use crate::llm::{ChatTurn, GenerateRequest, parse_model_json};
use crate::model::{OnboardingChatRequest, OnboardingReply, replay_history};
use anyhow::Result;

fn chat_turns(request: &OnboardingChatRequest) -> Vec<ChatTurn> {
    if request.is_opening() {
        return vec![ChatTurn::user(ONBOARDING_OPENING_PROMPT)];
    }
    replay_history(&request.history)
        .iter()
        .map(ChatTurn::from)
        .chain(std::iter::once(ChatTurn::user(request.message.clone())))
        .collect()
}

fn build_request(route: &RoutedProvider, request: &OnboardingChatRequest) -> GenerateRequest {
    route
        .request(String::new())
        .with_turns(chat_turns(request))
        .with_system(ONBOARDING_COACH_PROMPT)
}

/// One coach turn. The opening call never terminates the conversation: a
/// `done` reply there is downgraded to a plain message.
pub async fn onboarding_chat(
    route: &RoutedProvider,
    request: &OnboardingChatRequest,
) -> Result<OnboardingReply> {
    let raw = route.generate(&build_request(route, request)).await?;
    let reply: OnboardingReply = parse_model_json(&raw)?;

    if request.is_opening()
        && let OnboardingReply::Done { text, .. } = reply
    {
        tracing::warn!("coach tried to finish on the opening turn; treating as message");
        return Ok(OnboardingReply::Message { text });
    }
    Ok(reply)
}
