//! Pro entitlement resolution.

use std::sync::Arc;

use mm_core::ports::{Endpoint, PurchasesPort};
use mm_core::session::UserProfile;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn, Instrument};

use crate::session_store::SessionStore;
use crate::usecases::session::AuthenticatedCaller;

/// Decides `is_pro` for a validated session.
pub struct ResolveEntitlement {
    purchases: Arc<dyn PurchasesPort>,
}

impl ResolveEntitlement {
    pub fn new(purchases: Arc<dyn PurchasesPort>) -> Self {
        Self { purchases }
    }

    /// The profile wins when it already grants pro. Otherwise the purchases SDK is asked,
    /// and any SDK failure counts as "not pro".
    pub async fn for_profile(&self, profile: &UserProfile) -> bool {
        let span = info_span!("usecase.resolve_entitlement", user_id = %profile.id);
        async {
            if profile.should_skip_paywall() {
                // The SDK still needs the user id for receipts.
                if let Err(err) = self.purchases.set_user_id(&profile.id).await {
                    warn!(error = %err, "Failed to set purchases user id");
                }
                return true;
            }

            if let Err(err) = self.purchases.set_user_id(&profile.id).await {
                warn!(error = %err, "Failed to set purchases user id, treating as not pro");
                return false;
            }
            match self.purchases.check_entitlement().await {
                Ok(active) => active,
                Err(err) => {
                    warn!(error = %err, "Entitlement check failed, treating as not pro");
                    false
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostSetupRoute {
    Dashboard,
    Paywall,
}

/// Runs after the macro plan is confirmed and picks dashboard or paywall.
pub struct CompleteGoalSetup {
    caller: Arc<AuthenticatedCaller>,
    purchases: Arc<dyn PurchasesPort>,
    session: Arc<SessionStore>,
}

impl CompleteGoalSetup {
    pub fn new(
        caller: Arc<AuthenticatedCaller>,
        purchases: Arc<dyn PurchasesPort>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            caller,
            purchases,
            session,
        }
    }

    /// `dev_mode` lets non-production builds skip the paywall when the entitlement check
    /// comes back inactive.
    pub async fn execute(&self, dev_mode: bool) -> PostSetupRoute {
        let span = info_span!("usecase.complete_goal_setup.execute", dev_mode);
        async {
            let profile = self.current_profile().await;

            let route = if profile.as_ref().is_some_and(UserProfile::should_skip_paywall) {
                info!("Profile grants pro, skipping paywall");
                PostSetupRoute::Dashboard
            } else {
                self.route_from_purchases(dev_mode).await
            };

            let is_pro = route == PostSetupRoute::Dashboard;
            self.session.set_is_pro(is_pro).await;
            self.session.set_ready_for_dashboard(is_pro).await;
            info!(?route, "Goal setup completed");
            route
        }
        .instrument(span)
        .await
    }

    async fn current_profile(&self) -> Option<UserProfile> {
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
                self.session.set_profile(profile.clone()).await;
                Some(profile)
            }
            Err(err) => {
                warn!(error = %err, "Profile refresh failed, using cached profile");
                self.session.profile_for_paywall().await
            }
        }
    }

    async fn route_from_purchases(&self, dev_mode: bool) -> PostSetupRoute {
        if let Err(err) = self.purchases.sync_purchases().await {
            warn!(error = %err, "Purchase sync failed");
        }
        match self.purchases.check_entitlement().await {
            Ok(true) => PostSetupRoute::Dashboard,
            Ok(false) if dev_mode => {
                info!("Development mode, bypassing paywall");
                PostSetupRoute::Dashboard
            }
            Ok(false) => PostSetupRoute::Paywall,
            Err(err) => {
                warn!(error = %err, "Entitlement check failed, showing paywall");
                PostSetupRoute::Paywall
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use mm_core::ports::ApiError;
    use mm_core::session::Referral;

    fn pro_profile() -> UserProfile {
        UserProfile {
            is_pro: true,
            ..profile("u-1")
        }
    }

    #[tokio::test]
    async fn profile_pro_still_sets_user_id_and_tolerates_failure() {
        let mut purchases = MockPurchases::new();
        purchases
            .expect_set_user_id()
            .withf(|id| id == "u-1")
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("sdk offline")));
        purchases.expect_check_entitlement().never();

        let resolve = ResolveEntitlement::new(Arc::new(purchases));

        assert!(resolve.for_profile(&pro_profile()).await);
    }

    #[tokio::test]
    async fn active_referral_counts_as_pro() {
        let mut purchases = MockPurchases::new();
        purchases.expect_set_user_id().returning(|_| Ok(()));
        purchases.expect_check_entitlement().never();
        let profile = UserProfile {
            referral: Some(Referral { is_active: true }),
            ..profile("u-1")
        };

        let resolve = ResolveEntitlement::new(Arc::new(purchases));

        assert!(resolve.for_profile(&profile).await);
    }

    #[tokio::test]
    async fn entitlement_error_means_not_pro() {
        let mut purchases = MockPurchases::new();
        purchases.expect_set_user_id().returning(|_| Ok(()));
        purchases
            .expect_check_entitlement()
            .returning(|| Err(anyhow::anyhow!("store unavailable")));

        let resolve = ResolveEntitlement::new(Arc::new(purchases));

        assert!(!resolve.for_profile(&profile("u-1")).await);
    }

    #[tokio::test]
    async fn entitlement_from_sdk() {
        let mut purchases = MockPurchases::new();
        purchases.expect_set_user_id().returning(|_| Ok(()));
        purchases.expect_check_entitlement().returning(|| Ok(true));

        let resolve = ResolveEntitlement::new(Arc::new(purchases));

        assert!(resolve.for_profile(&profile("u-1")).await);
    }

    fn complete_setup(
        backend: &Arc<FakeBackend>,
        purchases: MockPurchases,
        session: &Arc<SessionStore>,
    ) -> CompleteGoalSetup {
        let caller = AuthenticatedCaller::new(backend.clone(), signed_in_storage());
        CompleteGoalSetup::new(Arc::new(caller), Arc::new(purchases), session.clone())
    }

    #[tokio::test]
    async fn fresh_pro_profile_goes_to_dashboard_without_purchases() {
        let backend = FakeBackend::new();
        backend.push_profile(Ok(pro_profile()));
        let mut purchases = MockPurchases::new();
        purchases.expect_sync_purchases().never();
        purchases.expect_check_entitlement().never();
        let session = Arc::new(SessionStore::new());

        let route = complete_setup(&backend, purchases, &session).execute(false).await;

        assert_eq!(route, PostSetupRoute::Dashboard);
        let state = session.snapshot().await;
        assert!(state.is_pro);
        assert!(state.ready_for_dashboard);
        assert_eq!(state.profile.map(|p| p.id).as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn sync_failure_is_logged_and_entitlement_still_checked() {
        let backend = FakeBackend::new();
        backend.push_profile(Ok(profile("u-1")));
        let mut purchases = MockPurchases::new();
        purchases
            .expect_sync_purchases()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("receipt error")));
        purchases
            .expect_check_entitlement()
            .times(1)
            .returning(|| Ok(true));
        let session = Arc::new(SessionStore::new());

        let route = complete_setup(&backend, purchases, &session).execute(false).await;

        assert_eq!(route, PostSetupRoute::Dashboard);
    }

    #[tokio::test]
    async fn inactive_entitlement_shows_paywall_unless_dev_mode() {
        for (dev_mode, expected) in [
            (false, PostSetupRoute::Paywall),
            (true, PostSetupRoute::Dashboard),
        ] {
            let backend = FakeBackend::new();
            backend.push_profile(Ok(profile("u-1")));
            let mut purchases = MockPurchases::new();
            purchases.expect_sync_purchases().returning(|| Ok(()));
            purchases.expect_check_entitlement().returning(|| Ok(false));
            let session = Arc::new(SessionStore::new());

            let route = complete_setup(&backend, purchases, &session)
                .execute(dev_mode)
                .await;

            assert_eq!(route, expected, "dev_mode = {dev_mode}");
            assert_eq!(session.snapshot().await.is_pro, dev_mode);
        }
    }

    #[tokio::test]
    async fn entitlement_error_shows_paywall() {
        let backend = FakeBackend::new();
        backend.push_profile(Ok(profile("u-1")));
        let mut purchases = MockPurchases::new();
        purchases.expect_sync_purchases().returning(|| Ok(()));
        purchases
            .expect_check_entitlement()
            .returning(|| Err(anyhow::anyhow!("store unavailable")));
        let session = Arc::new(SessionStore::new());

        let route = complete_setup(&backend, purchases, &session).execute(true).await;

        assert_eq!(route, PostSetupRoute::Paywall);
        assert!(!session.snapshot().await.ready_for_dashboard);
    }

    #[tokio::test]
    async fn falls_back_to_cached_profile_when_fetch_fails() {
        let backend = FakeBackend::new();
        backend.push_profile(Err(ApiError::ServerUnavailable { status: 503 }));
        let mut purchases = MockPurchases::new();
        purchases.expect_sync_purchases().never();
        purchases.expect_check_entitlement().never();
        let session = Arc::new(SessionStore::new());
        session.set_profile(pro_profile()).await;

        let route = complete_setup(&backend, purchases, &session).execute(false).await;

        assert_eq!(route, PostSetupRoute::Dashboard);
    }

    #[tokio::test]
    async fn stale_cached_profile_is_not_trusted_for_pro() {
        let backend = FakeBackend::new();
        backend.push_profile(Err(ApiError::Network("offline".into())));
        let mut purchases = MockPurchases::new();
        purchases.expect_sync_purchases().returning(|| Ok(()));
        purchases
            .expect_check_entitlement()
            .times(1)
            .returning(|| Ok(false));
        let session = Arc::new(SessionStore::new());
        session.set_profile(pro_profile()).await;
        session.mark_profile_stale().await;

        let route = complete_setup(&backend, purchases, &session).execute(false).await;

        assert_eq!(route, PostSetupRoute::Paywall);
        assert!(!session.snapshot().await.is_pro);
    }
}
