//! Wire types shared by the client core and the edge functions.

pub mod goal;
pub mod onboarding;
pub mod profile;

pub use goal::{
    ACCEPTABLE_DIMENSION_SCORE, FrequencyUnit, GoalParseRequest, GoalParseResult, ProofType,
    RealityCheckRequest, RealityCheckResult, ScoreBand, SmartDimension, SmartGradeRequest,
    SmartGradeResult, SmartScores, SmartTips, UserProfileContext,
};
pub use onboarding::{
    ChatRole, ExtractedProfile, HistoryTurn, OnboardingChatRequest, OnboardingReply,
    SYNTHETIC_START_TURN, replay_history,
};
pub use profile::UserProfileRecord;
