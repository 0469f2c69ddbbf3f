//! Which goal form sections are visible, derived from the draft alone.

use super::draft::GoalDraft;

/// The proof section opens once the trimmed goal is longer than this.
pub const PROOF_SECTION_MIN_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionVisibility {
    pub proof: bool,
    pub reality_check: bool,
    pub invite: bool,
}

impl SectionVisibility {
    pub fn of(draft: &GoalDraft) -> Self {
        Self {
            proof: draft.trimmed_goal_len() > PROOF_SECTION_MIN_CHARS,
            reality_check: !draft.proof_types.is_empty(),
            invite: draft.reality_done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProofType;

    fn draft(goal: &str) -> GoalDraft {
        GoalDraft {
            goal_text: goal.into(),
            ..GoalDraft::default()
        }
    }

    #[test]
    fn proof_section_needs_more_than_five_trimmed_chars() {
        assert!(SectionVisibility::of(&draft("I will run")).proof);
        assert!(!SectionVisibility::of(&draft("hi")).proof);
        assert!(!SectionVisibility::of(&draft("  12345  ")).proof);
        assert!(SectionVisibility::of(&draft("123456")).proof);
    }

    #[test]
    fn reality_section_follows_proof_selection() {
        let mut d = draft("I will run");
        assert!(!SectionVisibility::of(&d).reality_check);
        d.proof_types.insert(ProofType::Photo);
        assert!(SectionVisibility::of(&d).reality_check);
        d.proof_types.clear();
        assert!(!SectionVisibility::of(&d).reality_check);
    }

    #[test]
    fn invite_section_stays_open_once_reality_is_done() {
        let mut d = draft("I will run");
        d.reality_done = true;
        d.goal_text = "hi".into();
        d.proof_types.clear();
        let visible = SectionVisibility::of(&d);
        assert!(visible.invite);
        assert!(!visible.proof);
    }
}
