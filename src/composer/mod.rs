//! Goal composer: the draft, its derived form sections, and the debounced
//! grader that keeps the SMART score current while the user types.
//!
//! Triggers (goal blur, proof edits) restart a single quiet-period timer.
//! When the timer fires, the grading tick is spawned as its own task so a
//! later trigger only cancels the timer, never a request already in flight.
//! Responses land in arrival order: whichever finishes last wins.

mod disclosure;
mod draft;

pub use disclosure::{PROOF_SECTION_MIN_CHARS, SectionVisibility};
pub use draft::GoalDraft;

use crate::client::FunctionClient;
use crate::config::ComposerConfig;
use crate::model::{ProofType, SmartGradeRequest, UserProfileContext};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// A trigger or action that was suppressed instead of issuing a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardRejection {
    #[error("goal is too short to grade")]
    GoalTooShort,
    #[error("select at least one proof type first")]
    NoProofType,
    #[error("a reality check is already running")]
    AlreadyChecking,
}

/// What a fired timer should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickKind {
    /// Parse the goal and grade it, then re-grade with the parsed frequency.
    ParseAndGrade,
    /// Grade using whatever frequency is already known.
    GradeOnly,
}

impl TickKind {
    fn merge(self, other: Self) -> Self {
        if self == Self::ParseAndGrade || other == Self::ParseAndGrade {
            Self::ParseAndGrade
        } else {
            Self::GradeOnly
        }
    }
}

struct PendingTick {
    kind: TickKind,
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct ComposerState {
    draft: GoalDraft,
    grades_in_flight: usize,
    checking_reality: bool,
    generation: u64,
    pending: Option<PendingTick>,
    ticks: Vec<JoinHandle<()>>,
}

/// Read-only view of the composer for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerSnapshot {
    pub draft: GoalDraft,
    pub grading: bool,
    pub checking_reality: bool,
    pub tick_pending: bool,
    pub sections: SectionVisibility,
}

pub struct GoalComposer {
    client: FunctionClient,
    config: ComposerConfig,
    profile: Option<UserProfileContext>,
    state: Mutex<ComposerState>,
}

impl GoalComposer {
    pub fn new(
        client: FunctionClient,
        config: ComposerConfig,
        profile: Option<UserProfileContext>,
    ) -> Arc<Self> {
        Arc::new(Self {
            client,
            config,
            profile,
            state: Mutex::new(ComposerState::default()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ComposerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn long_enough(&self, goal_text: &str) -> bool {
        goal_text.trim().chars().count() >= self.config.min_goal_chars
    }

    pub fn snapshot(&self) -> ComposerSnapshot {
        let state = self.lock();
        ComposerSnapshot {
            draft: state.draft.clone(),
            grading: state.grades_in_flight > 0,
            checking_reality: state.checking_reality,
            tick_pending: state.pending.is_some(),
            sections: state.draft.sections(),
        }
    }

    pub fn draft(&self) -> GoalDraft {
        self.lock().draft.clone()
    }

    pub fn sections(&self) -> SectionVisibility {
        self.lock().draft.sections()
    }

    pub fn is_grading(&self) -> bool {
        self.lock().grades_in_flight > 0
    }

    /// Update the goal text. Grading waits for [`Self::goal_blurred`].
    pub fn set_goal_text(&self, text: impl Into<String>) {
        self.lock().draft.goal_text = text.into();
    }

    /// The goal field lost focus: schedule a parse and a grade.
    pub fn goal_blurred(self: &Arc<Self>) -> Result<(), GuardRejection> {
        let goal = self.lock().draft.goal_text.clone();
        if !self.long_enough(&goal) {
            return Err(GuardRejection::GoalTooShort);
        }
        self.schedule(TickKind::ParseAndGrade);
        Ok(())
    }

    /// Toggle a proof type and schedule a re-grade.
    pub fn toggle_proof_type(self: &Arc<Self>, proof: ProofType) -> bool {
        let selected = {
            let mut state = self.lock();
            let proofs = &mut state.draft.proof_types;
            if proofs.remove(&proof) {
                false
            } else {
                proofs.insert(proof);
                true
            }
        };
        self.schedule(TickKind::GradeOnly);
        selected
    }

    pub fn set_proof_description(self: &Arc<Self>, text: impl Into<String>) {
        self.lock().draft.proof_description = text.into();
        self.schedule(TickKind::GradeOnly);
    }

    /// Hide the frequency chip until the next parse.
    pub fn dismiss_parse_chip(&self) {
        self.lock().draft.parse_chip_dismissed = true;
    }

    fn schedule(self: &Arc<Self>, kind: TickKind) {
        let mut state = self.lock();
        state.generation += 1;
        let generation = state.generation;
        let kind = match state.pending.take() {
            Some(previous) => {
                previous.timer.abort();
                previous.kind.merge(kind)
            }
            None => kind,
        };

        let this = Arc::clone(self);
        let delay = Duration::from_millis(self.config.debounce_ms);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.fire(generation);
        });
        state.pending = Some(PendingTick {
            kind,
            generation,
            timer,
        });
    }

    fn fire(self: &Arc<Self>, generation: u64) {
        let mut state = self.lock();
        let Some(pending) = state.pending.take_if(|p| p.generation == generation) else {
            return;
        };
        let this = Arc::clone(self);
        let tick = tokio::spawn(async move { this.run_tick(pending.kind).await });
        state.ticks.retain(|t| !t.is_finished());
        state.ticks.push(tick);
    }

    async fn run_tick(&self, kind: TickKind) {
        let (goal, base) = {
            let mut state = self.lock();
            if kind == TickKind::ParseAndGrade {
                state.draft.parse_chip_dismissed = false;
            }
            let frequency = match kind {
                TickKind::ParseAndGrade => None,
                TickKind::GradeOnly => state.draft.parsed_frequency().map(String::from),
            };
            let request = state
                .draft
                .grade_request(self.profile.as_ref(), frequency.as_deref());
            (state.draft.goal_text.clone(), request)
        };
        if !self.long_enough(&goal) {
            tracing::debug!("grading skipped: goal too short");
            return;
        }

        match kind {
            TickKind::GradeOnly => self.grade(&base).await,
            TickKind::ParseAndGrade => {
                let (parsed, ()) = tokio::join!(self.client.parse_goal(&goal), self.grade(&base));
                match parsed {
                    Ok(parsed) => {
                        let frequency = parsed.readable_frequency().map(String::from);
                        self.lock().draft.parsed = Some(parsed);
                        if let Some(frequency) = frequency {
                            let request = SmartGradeRequest {
                                parsed_frequency: Some(frequency),
                                ..base
                            };
                            self.grade(&request).await;
                        }
                    }
                    Err(e) => tracing::debug!("goal parse gave no hint: {e}"),
                }
            }
        }
    }

    async fn grade(&self, request: &SmartGradeRequest) {
        {
            let mut state = self.lock();
            state.grades_in_flight += 1;
            state.draft.grade_error = None;
        }
        let result = self.client.grade_goal(request).await;
        let mut state = self.lock();
        state.grades_in_flight -= 1;
        match result {
            Ok(grade) => state.draft.grade = Some(grade),
            Err(e) => {
                tracing::warn!("grading failed: {e}");
                state.draft.grade_error = Some(e.to_string());
            }
        }
    }

    /// Run the reality check for the current draft. The outcome lands in the
    /// draft; a failure leaves the previous result in place and can be retried.
    pub async fn check_reality(&self) -> Result<(), GuardRejection> {
        let request = {
            let mut state = self.lock();
            if state.draft.proof_types.is_empty() {
                return Err(GuardRejection::NoProofType);
            }
            if state.checking_reality {
                return Err(GuardRejection::AlreadyChecking);
            }
            state.checking_reality = true;
            state.draft.reality_error = None;
            state.draft.reality_request()
        };

        let result = self.client.reality_check(&request).await;
        let mut state = self.lock();
        state.checking_reality = false;
        match result {
            Ok(reality) => {
                state.draft.reality = Some(reality);
                state.draft.reality_done = true;
            }
            Err(e) => {
                tracing::warn!("reality check failed: {e}");
                state.draft.reality_error = Some(e.to_string());
            }
        }
        Ok(())
    }

    /// Wait until no timer is pending and every dispatched tick has finished.
    pub async fn settle(&self) {
        let delay = Duration::from_millis(self.config.debounce_ms);
        loop {
            let (pending, ticks) = {
                let mut state = self.lock();
                (state.pending.is_some(), std::mem::take(&mut state.ticks))
            };
            if !pending && ticks.is_empty() {
                return;
            }
            for tick in ticks {
                if let Err(e) = tick.await {
                    tracing::warn!("grading task ended abnormally: {e}");
                }
            }
            if pending {
                tokio::time::sleep(delay).await;
            }
        }
    }
}
