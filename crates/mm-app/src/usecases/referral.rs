//! Referral code redemption.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mm_core::ports::{ApiError, Endpoint};
use tracing::{info, info_span, warn, Instrument};

use crate::session_store::SessionStore;
use crate::usecases::session::AuthenticatedCaller;

pub const CODE_NOT_FOUND_MESSAGE: &str = "Referral code not found. Please check and try again.";
pub const INVALID_CODE_MESSAGE: &str = "Invalid referral code. Please check and try again.";
pub const ALREADY_USED_MESSAGE: &str = "This referral code has already been used.";
pub const REDEMPTION_FAILED_MESSAGE: &str = "Failed to redeem referral code. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferralError {
    #[error("referral code is empty")]
    EmptyCode,
    #[error("a redemption is already in progress")]
    AlreadyInProgress,
    /// Backend refused the code or the request failed. Carries the message to show.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionOutcome {
    /// The refreshed profile now skips the paywall.
    pub is_pro: bool,
}

#[derive(Clone, Copy)]
enum Stage {
    Validate,
    Redeem,
}

fn user_message(stage: Stage, err: &ApiError) -> String {
    let Some(detail) = err.detail() else {
        return match err {
            ApiError::Rejected { .. } | ApiError::Decode(_) => REDEMPTION_FAILED_MESSAGE.into(),
            _ => err.user_message(),
        };
    };

    let lowered = detail.to_lowercase();
    if lowered.contains("not found") {
        match stage {
            Stage::Validate => CODE_NOT_FOUND_MESSAGE.into(),
            Stage::Redeem => INVALID_CODE_MESSAGE.into(),
        }
    } else if lowered.contains("already") {
        ALREADY_USED_MESSAGE.into()
    } else {
        detail.to_string()
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct RedeemReferralCode {
    caller: Arc<AuthenticatedCaller>,
    session: Arc<SessionStore>,
    in_flight: AtomicBool,
}

impl RedeemReferralCode {
    pub fn new(caller: Arc<AuthenticatedCaller>, session: Arc<SessionStore>) -> Self {
        Self {
            caller,
            session,
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn execute(&self, code: &str) -> Result<RedemptionOutcome, ReferralError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ReferralError::EmptyCode);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ReferralError::AlreadyInProgress);
        }
        let _guard = InFlight(&self.in_flight);

        let span = info_span!("usecase.redeem_referral_code.execute");
        async {
            self.submit(Stage::Validate, Endpoint::ReferralValidate, code)
                .await?;
            self.submit(Stage::Redeem, Endpoint::ReferralRedeem, code)
                .await?;
            info!("Referral code redeemed");

            self.session.mark_profile_stale().await;
            Ok(RedemptionOutcome {
                is_pro: self.reload_profile().await,
            })
        }
        .instrument(span)
        .await
    }

    async fn submit(&self, stage: Stage, endpoint: Endpoint, code: &str) -> Result<(), ReferralError> {
        let backend = self.caller.backend();
        self.caller
            .call(endpoint, |token| {
                let backend = Arc::clone(&backend);
                let code = code.to_string();
                async move {
                    match endpoint {
                        Endpoint::ReferralValidate => backend.validate_referral(&token, &code).await,
                        _ => backend.redeem_referral(&token, &code).await,
                    }
                }
            })
            .await
            .map_err(|err| {
                warn!(error = %err, ?endpoint, "Referral request failed");
                ReferralError::Rejected(user_message(stage, &err))
            })
    }

    /// Redemption already succeeded, so a failed reload only leaves the profile stale.
    async fn reload_profile(&self) -> bool {
        let backend = self.caller.backend();
        let fetched = self
            .caller
            .call(Endpoint::Profile, |token| {
                let backend = Arc::clone(&backend);
                async move { backend.fetch_profile(&token).await }
            })
            .await;

        match fetched {
            Ok(profile) => {
                let is_pro = profile.should_skip_paywall();
                self.session.set_profile(profile).await;
                if is_pro {
                    self.session.set_is_pro(true).await;
                }
                is_pro
            }
            Err(err) => {
                warn!(error = %err, "Profile reload after redemption failed");
                false
            }
        }
    }
}
