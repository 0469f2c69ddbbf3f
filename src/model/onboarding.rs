use serde::{Deserialize, Serialize};

/// Placeholder user turn prepended when a replayed history opens with the
/// model speaking first. Chat upstreams reject histories that start with a
/// model turn.
pub const SYNTHETIC_START_TURN: &str = "[start]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry of the API-facing replay history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: ChatRole,
    pub text: String,
}

impl HistoryTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// History as it must be replayed upstream: non-empty histories always open
/// with a user turn.
pub fn replay_history(history: &[HistoryTurn]) -> Vec<HistoryTurn> {
    let mut replay = Vec::with_capacity(history.len() + 1);
    if history
        .first()
        .is_some_and(|turn| turn.role == ChatRole::Model)
    {
        replay.push(HistoryTurn::user(SYNTHETIC_START_TURN));
    }
    replay.extend(history.iter().cloned());
    replay
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingChatRequest {
    /// Prior turns, not including `message`.
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    /// Latest user message; empty on the opening call.
    #[serde(default)]
    pub message: String,
}

impl OnboardingChatRequest {
    pub fn is_opening(&self) -> bool {
        self.message.trim().is_empty()
    }
}

/// Structured summary extracted from the onboarding interview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedProfile {
    pub life_areas: Vec<String>,
    pub direction: String,
    pub values: String,
    pub blockers: String,
    pub weekly_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OnboardingReply {
    /// The coach keeps the conversation going.
    Message { text: String },
    /// The coach has enough to build (or rebuild) the profile.
    Done {
        text: String,
        profile: ExtractedProfile,
    },
}

impl OnboardingReply {
    pub fn text(&self) -> &str {
        match self {
            Self::Message { text } | Self::Done { text, .. } => text,
        }
    }
}
