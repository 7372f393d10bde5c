use std::sync::Arc;

use mm_core::ports::{ApiError, Endpoint};
use mm_core::session::SessionValidation;
use tracing::{info, info_span, warn, Instrument};

use super::refresh::AuthenticatedCaller;

/// Cold-start check of the stored session against `GET /user/me`.
///
/// The only place that decides whether the app starts authenticated.
pub struct ValidateSession {
    caller: Arc<AuthenticatedCaller>,
}

impl ValidateSession {
    pub fn new(caller: Arc<AuthenticatedCaller>) -> Self {
        Self { caller }
    }

    pub async fn execute(&self) -> SessionValidation {
        let span = info_span!("usecase.validate_session.execute");
        async {
            let credentials = self.caller.credentials();
            match credentials.access_token().await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    info!("No stored access token, starting signed out");
                    return SessionValidation::anonymous();
                }
                Err(err) => {
                    warn!(error = %err, "Failed to read stored credentials");
                    return SessionValidation::failed(err.to_string());
                }
            }

            let backend = self.caller.backend();
            let result = self
                .caller
                .call(Endpoint::Profile, |token| {
                    let backend = Arc::clone(&backend);
                    async move { backend.fetch_profile(&token).await }
                })
                .await;

            match result {
                Ok(profile) => {
                    self.remember_user_id(&profile.id).await;
                    info!(has_macros = profile.has_macros, "Session is valid");
                    SessionValidation::valid(profile)
                }
                Err(err) => self.invalid(err).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn remember_user_id(&self, user_id: &str) {
        let credentials = self.caller.credentials();
        let stored = credentials.user_id().await.ok().flatten();
        if stored.as_deref() == Some(user_id) {
            return;
        }
        if let Err(err) = credentials.store_user_id(user_id).await {
            warn!(error = %err, "Failed to persist user id");
        }
    }

    async fn invalid(&self, err: ApiError) -> SessionValidation {
        if err.is_transient() {
            warn!(error = %err, "Session validation failed, keeping credentials");
        } else {
            warn!(error = %err, "Session rejected, clearing credentials");
            if let Err(clear_err) = self.caller.credentials().clear().await {
                warn!(error = %clear_err, "Failed to clear credentials");
            }
        }
        SessionValidation::failed(err.user_message())
    }
}
