//! Owned session state.
//!
//! Single writer for [`SessionState`]. Components receive an `Arc<SessionStore>` instead of
//! reaching for a global.

use mm_core::bootstrap::AppFlags;
use mm_core::session::{SessionState, UserProfile};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("refusing to mark session authenticated without a user id")]
    MissingUserId,
}

#[derive(Default)]
struct Inner {
    state: SessionState,
    profile_stale: bool,
}

#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<Inner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// Apply the bootstrap result in one update.
    pub async fn apply_bootstrap(
        &self,
        flags: AppFlags,
        user_id: Option<String>,
        profile: Option<UserProfile>,
    ) -> Result<(), SessionStoreError> {
        let user_id = user_id.filter(|id| !id.trim().is_empty());
        if flags.authenticated && user_id.is_none() {
            return Err(SessionStoreError::MissingUserId);
        }

        let mut inner = self.inner.lock().await;
        inner.state = SessionState {
            authenticated: flags.authenticated,
            user_id,
            profile,
            has_macros: flags.has_macros,
            is_pro: flags.is_pro,
            ready_for_dashboard: flags.ready_for_dashboard,
            is_session_validated: flags.is_session_validated,
            is_onboarding_completed: flags.is_onboarding_completed,
        };
        inner.profile_stale = false;
        debug!(route = ?flags.route(), "Session state applied");
        Ok(())
    }

    /// Store a freshly fetched profile and clear the stale marker.
    pub async fn set_profile(&self, profile: UserProfile) {
        let mut inner = self.inner.lock().await;
        inner.state.has_macros = profile.has_macros;
        inner.state.profile = Some(profile);
        inner.profile_stale = false;
    }

    /// The cached profile no longer reflects the backend (e.g. after a referral redemption).
    pub async fn mark_profile_stale(&self) {
        self.inner.lock().await.profile_stale = true;
    }

    /// Cached profile, unless it is stale.
    pub async fn profile_for_paywall(&self) -> Option<UserProfile> {
        let inner = self.inner.lock().await;
        if inner.profile_stale {
            None
        } else {
            inner.state.profile.clone()
        }
    }

    pub async fn set_is_pro(&self, is_pro: bool) {
        self.inner.lock().await.state.is_pro = is_pro;
    }

    pub async fn set_ready_for_dashboard(&self, ready: bool) {
        self.inner.lock().await.state.ready_for_dashboard = ready;
    }

    /// Drop everything tied to the signed-in user.
    pub async fn sign_out(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = SessionState {
            is_onboarding_completed: inner.state.is_onboarding_completed,
            is_session_validated: inner.state.is_session_validated,
            ..SessionState::default()
        };
        inner.profile_stale = false;
    }
}
