use super::disclosure::SectionVisibility;
use crate::model::{
    GoalParseResult, ProofType, RealityCheckRequest, RealityCheckResult, SmartGradeRequest,
    SmartGradeResult, UserProfileContext,
};
use std::collections::BTreeSet;

/// In-memory goal being composed. Discarded when the screen is abandoned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalDraft {
    pub goal_text: String,
    pub proof_types: BTreeSet<ProofType>,
    pub proof_description: String,
    pub parsed: Option<GoalParseResult>,
    pub parse_chip_dismissed: bool,
    pub grade: Option<SmartGradeResult>,
    pub grade_error: Option<String>,
    pub reality: Option<RealityCheckResult>,
    pub reality_error: Option<String>,
    /// Set by the first successful reality check; never cleared.
    pub reality_done: bool,
}

impl GoalDraft {
    pub fn trimmed_goal_len(&self) -> usize {
        self.goal_text.trim().chars().count()
    }

    /// Human readable frequency from the last successful parse.
    pub fn parsed_frequency(&self) -> Option<&str> {
        self.parsed
            .as_ref()
            .and_then(GoalParseResult::readable_frequency)
    }

    /// Frequency chip text, unless the user dismissed it.
    pub fn frequency_chip(&self) -> Option<&str> {
        if self.parse_chip_dismissed {
            None
        } else {
            self.parsed_frequency()
        }
    }

    pub fn proof_list(&self) -> Vec<ProofType> {
        self.proof_types.iter().copied().collect()
    }

    pub fn grade_request(
        &self,
        profile: Option<&UserProfileContext>,
        parsed_frequency: Option<&str>,
    ) -> SmartGradeRequest {
        SmartGradeRequest {
            goal_text: self.goal_text.clone(),
            proof_types: self.proof_list(),
            proof_description: self.proof_description.clone(),
            user_profile: profile.cloned(),
            parsed_frequency: parsed_frequency.map(String::from),
        }
    }

    pub fn reality_request(&self) -> RealityCheckRequest {
        RealityCheckRequest {
            goal_text: self.goal_text.clone(),
            proof_types: self.proof_list(),
            parsed_frequency: self.parsed_frequency().map(String::from),
        }
    }

    pub fn sections(&self) -> SectionVisibility {
        SectionVisibility::of(self)
    }
}
