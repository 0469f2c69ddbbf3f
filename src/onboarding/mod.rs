//! Onboarding interview: a free-form chat with the coach that ends in an
//! extracted profile, a summary the user can edit or refine, and a save.
//!
//! The session keeps two logs. The transcript is what the user sees,
//! including apologies for failed turns. The history is what gets replayed
//! to the coach and only ever holds completed, non-terminal exchanges.

mod summary;

pub use summary::{LIFE_AREA_SEPARATOR, ProfileField, split_life_areas};

use crate::auth::AuthContext;
use crate::client::FunctionClient;
use crate::config::OnboardingConfig;
use crate::error::{GatewayError, OnboardingError};
use crate::model::{
    ExtractedProfile, HistoryTurn, OnboardingChatRequest, OnboardingReply, UserProfileRecord,
};
use std::time::Duration;

/// Shown in place of a coach reply when a turn fails.
pub const APOLOGY: &str = "Sorry, I lost my train of thought there. Could you say that again?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    App,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptEntry {
    fn app(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::App,
            text: text.into(),
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OnboardingPhase {
    Chat,
    /// The coach wrapped up; the summary opens after a short pause.
    Closing,
    Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The coach keeps the interview going.
    Reply(String),
    /// The coach has a profile. Call [`OnboardingSession::settle`] to show it.
    Closing(String),
    /// A refinement produced a new profile.
    ProfileUpdated,
    /// A refinement got a question back instead of a profile.
    FollowUp(String),
    /// The call failed. The history is unchanged, so the turn can be resent.
    Failed(GatewayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnKind {
    Chat,
    Refine,
}

/// A turn the session has shown as in flight. It owns everything the call
/// needs, so the session stays readable while the reply is awaited.
pub struct PendingTurn {
    kind: TurnKind,
    client: FunctionClient,
    request: OnboardingChatRequest,
}

impl PendingTurn {
    pub fn message(&self) -> &str {
        &self.request.message
    }

    pub async fn reply(&self) -> Result<OnboardingReply, GatewayError> {
        self.client.onboarding_chat(&self.request).await
    }
}

pub struct OnboardingSession {
    client: FunctionClient,
    config: OnboardingConfig,
    transcript: Vec<TranscriptEntry>,
    history: Vec<HistoryTurn>,
    phase: OnboardingPhase,
    typing: bool,
    profile: Option<ExtractedProfile>,
    pending_follow_up: Option<String>,
}

impl OnboardingSession {
    /// Start the interview; the coach speaks first.
    pub async fn open(client: FunctionClient, config: OnboardingConfig) -> Self {
        let mut session = Self {
            client,
            config,
            transcript: Vec::new(),
            history: Vec::new(),
            phase: OnboardingPhase::Chat,
            typing: true,
            profile: None,
            pending_follow_up: None,
        };

        let result = session
            .client
            .onboarding_chat(&OnboardingChatRequest::default())
            .await;
        session.typing = false;
        match result {
            // An opening call never ends the interview, whatever its shape.
            Ok(reply) => {
                let text = reply.text().to_string();
                session.transcript.push(TranscriptEntry::app(&text));
                session.history.push(HistoryTurn::model(text));
            }
            Err(e) => {
                tracing::warn!("onboarding opening failed: {e}");
                session.transcript.push(TranscriptEntry::app(APOLOGY));
            }
        }
        session
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn history(&self) -> &[HistoryTurn] {
        &self.history
    }

    pub fn phase(&self) -> OnboardingPhase {
        self.phase
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn profile(&self) -> Option<&ExtractedProfile> {
        self.profile.as_ref()
    }

    /// Question the coach asked in reply to the last refinement, if any.
    pub fn pending_follow_up(&self) -> Option<&str> {
        self.pending_follow_up.as_deref()
    }

    fn ensure_idle(&self, phase: OnboardingPhase) -> Result<(), OnboardingError> {
        if self.phase != phase {
            return Err(OnboardingError::WrongPhase(self.phase.to_string()));
        }
        if self.typing {
            return Err(OnboardingError::TurnInFlight);
        }
        Ok(())
    }

    fn begin(&mut self, kind: TurnKind, message: &str) -> PendingTurn {
        self.typing = true;
        PendingTurn {
            kind,
            client: self.client.clone(),
            request: OnboardingChatRequest {
                history: self.history.clone(),
                message: message.to_string(),
            },
        }
    }

    fn record_exchange(&mut self, message: &str, reply: &str) {
        self.history.push(HistoryTurn::user(message));
        self.history.push(HistoryTurn::model(reply));
    }

    /// Show the user's chat message and mark the coach as typing. Await the
    /// returned turn, then hand its reply to [`Self::complete`].
    pub fn begin_send(&mut self, text: &str) -> Result<PendingTurn, OnboardingError> {
        self.ensure_idle(OnboardingPhase::Chat)?;
        let message = text.trim();
        if message.is_empty() {
            return Err(OnboardingError::EmptyMessage);
        }
        self.transcript.push(TranscriptEntry::user(message));
        Ok(self.begin(TurnKind::Chat, message))
    }

    /// Start a free-text correction from the summary. The transcript is
    /// left alone; only the profile or the follow-up question changes.
    pub fn begin_refine(&mut self, text: &str) -> Result<PendingTurn, OnboardingError> {
        self.ensure_idle(OnboardingPhase::Summary)?;
        let message = text.trim();
        if message.is_empty() {
            return Err(OnboardingError::EmptyMessage);
        }
        Ok(self.begin(TurnKind::Refine, message))
    }

    /// Apply the coach's reply to a turn started with `begin_*`.
    pub fn complete(
        &mut self,
        turn: PendingTurn,
        reply: Result<OnboardingReply, GatewayError>,
    ) -> TurnOutcome {
        self.typing = false;
        let message = turn.request.message;
        match turn.kind {
            TurnKind::Chat => self.complete_chat(&message, reply),
            TurnKind::Refine => self.complete_refine(&message, reply),
        }
    }

    fn complete_chat(
        &mut self,
        message: &str,
        reply: Result<OnboardingReply, GatewayError>,
    ) -> TurnOutcome {
        match reply {
            Ok(OnboardingReply::Message { text }) => {
                self.transcript.push(TranscriptEntry::app(&text));
                self.record_exchange(message, &text);
                TurnOutcome::Reply(text)
            }
            // The closing exchange is never replayed, so it stays out of history.
            Ok(OnboardingReply::Done { text, profile }) => {
                self.transcript.push(TranscriptEntry::app(&text));
                self.profile = Some(profile);
                self.phase = OnboardingPhase::Closing;
                tracing::debug!(turns = self.history.len(), "onboarding interview closed");
                TurnOutcome::Closing(text)
            }
            Err(e) => {
                tracing::warn!("onboarding turn failed: {e}");
                self.transcript.push(TranscriptEntry::app(APOLOGY));
                TurnOutcome::Failed(e)
            }
        }
    }

    fn complete_refine(
        &mut self,
        message: &str,
        reply: Result<OnboardingReply, GatewayError>,
    ) -> TurnOutcome {
        match reply {
            Ok(OnboardingReply::Done { profile, .. }) => {
                self.profile = Some(profile);
                self.pending_follow_up = None;
                TurnOutcome::ProfileUpdated
            }
            Ok(OnboardingReply::Message { text }) => {
                self.record_exchange(message, &text);
                self.pending_follow_up = Some(text.clone());
                TurnOutcome::FollowUp(text)
            }
            Err(e) => {
                tracing::warn!("profile refinement failed: {e}");
                TurnOutcome::Failed(e)
            }
        }
    }

    /// Send a chat message during the interview and wait for the coach.
    pub async fn send(&mut self, text: &str) -> Result<TurnOutcome, OnboardingError> {
        let turn = self.begin_send(text)?;
        let reply = turn.reply().await;
        Ok(self.complete(turn, reply))
    }

    /// Let the closing remark breathe, then move to the summary.
    pub async fn settle(&mut self) -> OnboardingPhase {
        if self.phase == OnboardingPhase::Closing {
            tokio::time::sleep(Duration::from_millis(self.config.closing_pause_ms)).await;
            self.phase = OnboardingPhase::Summary;
        }
        self.phase
    }

    /// Free-text correction sent from the summary.
    pub async fn refine(&mut self, text: &str) -> Result<TurnOutcome, OnboardingError> {
        let turn = self.begin_refine(text)?;
        let reply = turn.reply().await;
        Ok(self.complete(turn, reply))
    }

    /// Overwrite one summary field. Returns false when the input was ignored.
    pub fn edit_field(&mut self, field: ProfileField, input: &str) -> Result<bool, OnboardingError> {
        if self.phase != OnboardingPhase::Summary {
            return Err(OnboardingError::WrongPhase(self.phase.to_string()));
        }
        let profile = self.profile.as_mut().ok_or(OnboardingError::NoProfile)?;
        Ok(field.apply(profile, input))
    }

    /// Save the profile for the signed-in user and refresh the auth context.
    /// A failed save leaves the session untouched so it can be retried.
    pub async fn confirm(&self, auth: &AuthContext) -> Result<UserProfileRecord, OnboardingError> {
        if self.phase != OnboardingPhase::Summary {
            return Err(OnboardingError::WrongPhase(self.phase.to_string()));
        }
        let profile = self.profile.as_ref().ok_or(OnboardingError::NoProfile)?;
        let user_id = auth.user_id().ok_or(OnboardingError::NotSignedIn)?;

        let record = UserProfileRecord::completed(user_id, profile);
        auth.store().upsert(&record).await?;
        auth.refresh_profile().await?;
        tracing::info!(user_id = %record.user_id, "onboarding complete");
        Ok(record)
    }
}
