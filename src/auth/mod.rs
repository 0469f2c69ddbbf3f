//! Signed-in state, the user's onboarding profile, and which screen to show.

mod store;

pub use store::{InMemoryProfileStore, PostgrestProfileStore, ProfileStore, StoreFuture};

use crate::error::StoreError;
use crate::model::{UserProfileContext, UserProfileRecord};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const FALLBACK_DISPLAY_NAME: &str = "You";

/// An authenticated session handed over by the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub display_name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            display_name: None,
            expires_at: None,
        }
    }

    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthState {
    Initializing,
    Authenticated(Session),
    Anonymous,
}

/// Top-level screen selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Route {
    Loading,
    Landing,
    Onboarding,
    Goals,
}

struct AuthInner {
    state: AuthState,
    profile: Option<UserProfileRecord>,
    profile_loading: bool,
}

/// Explicit auth context shared by the screens that need it.
pub struct AuthContext {
    store: Arc<dyn ProfileStore>,
    inner: Mutex<AuthInner>,
}

impl AuthContext {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            inner: Mutex::new(AuthInner {
                state: AuthState::Initializing,
                profile: None,
                profile_loading: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuthInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    pub fn state(&self) -> AuthState {
        self.lock().state.clone()
    }

    pub fn session(&self) -> Option<Session> {
        match &self.lock().state {
            AuthState::Authenticated(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<String> {
        self.session().map(|s| s.user_id)
    }

    pub fn profile(&self) -> Option<UserProfileRecord> {
        self.lock().profile.clone()
    }

    /// Profile fields the grader uses to judge relevance.
    pub fn grading_context(&self) -> Option<UserProfileContext> {
        self.lock()
            .profile
            .as_ref()
            .filter(|p| p.onboarding_done)
            .map(UserProfileRecord::grading_context)
    }

    pub fn route(&self) -> Route {
        let inner = self.lock();
        match &inner.state {
            AuthState::Initializing => Route::Loading,
            AuthState::Anonymous => Route::Landing,
            AuthState::Authenticated(_) if inner.profile_loading => Route::Loading,
            AuthState::Authenticated(_) => {
                if inner.profile.as_ref().is_some_and(|p| p.onboarding_done) {
                    Route::Goals
                } else {
                    Route::Onboarding
                }
            }
        }
    }

    /// Resolve the initial state from a persisted session, if any. A session
    /// that has already expired counts as signed out.
    pub async fn restore(&self, session: Option<Session>) -> Result<(), StoreError> {
        let session = session.filter(|s| {
            let expired = s.is_expired(Utc::now());
            if expired {
                tracing::info!(user_id = %s.user_id, "stored session expired");
            }
            !expired
        });
        self.on_auth_change(session).await
    }

    /// Sign-in, sign-out or token refresh. Signing out drops the profile.
    pub async fn on_auth_change(&self, session: Option<Session>) -> Result<(), StoreError> {
        let Some(session) = session else {
            let mut inner = self.lock();
            inner.state = AuthState::Anonymous;
            inner.profile = None;
            inner.profile_loading = false;
            tracing::debug!("signed out");
            return Ok(());
        };

        let user_id = session.user_id.clone();
        {
            let mut inner = self.lock();
            let same_user = matches!(&inner.state, AuthState::Authenticated(s) if s.user_id == user_id);
            if !same_user {
                inner.profile = None;
            }
            inner.state = AuthState::Authenticated(session);
        }
        tracing::debug!(user_id = %user_id, "signed in");
        self.load_profile(&user_id).await
    }

    /// Re-read the signed-in user's profile.
    pub async fn refresh_profile(&self) -> Result<(), StoreError> {
        match self.user_id() {
            Some(user_id) => self.load_profile(&user_id).await,
            None => Ok(()),
        }
    }

    async fn load_profile(&self, user_id: &str) -> Result<(), StoreError> {
        self.lock().profile_loading = true;
        let result = self.store.fetch(user_id).await;

        let mut inner = self.lock();
        let still_current =
            matches!(&inner.state, AuthState::Authenticated(s) if s.user_id == user_id);
        if !still_current {
            return Ok(());
        }
        inner.profile_loading = false;
        match result {
            Ok(profile) => {
                inner.profile = profile;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(user_id, "profile load failed: {e}");
                inner.profile = None;
                Err(e)
            }
        }
    }
}
