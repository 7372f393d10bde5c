use std::sync::Arc;
use std::time::Duration;

use mm_core::bootstrap::{AppFlags, BootstrapResult, BootstrapStep, StepReport};
use mm_core::ports::{
    CrashReporterPort, FontLoaderPort, KeyValueStorePort, MapsPort, PurchasesPort,
    PushNotificationsPort, SplashScreenPort,
};
use mm_core::session::credentials::{
    flag_value, stored_flag, ONBOARDING_COMPLETED_KEY, PURCHASES_SYNCED_KEY,
};
use mm_core::session::SessionValidation;
use tracing::{error, info, info_span, warn, Instrument};

use crate::session_store::SessionStore;
use crate::usecases::entitlement::ResolveEntitlement;
use crate::usecases::session::ValidateSession;

pub const DEFAULT_SPLASH_GRACE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    pub maps_api_key: String,
    /// Delay between the last step settling and hiding the splash.
    pub splash_grace: Duration,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            maps_api_key: String::new(),
            splash_grace: DEFAULT_SPLASH_GRACE,
        }
    }
}

/// Dependency bundle for [`BootstrapSequencer`].
pub struct BootstrapDeps {
    pub crash_reporter: Arc<dyn CrashReporterPort>,
    pub maps: Arc<dyn MapsPort>,
    pub purchases: Arc<dyn PurchasesPort>,
    pub push: Arc<dyn PushNotificationsPort>,
    pub fonts: Arc<dyn FontLoaderPort>,
    pub splash: Arc<dyn SplashScreenPort>,
    pub storage: Arc<dyn KeyValueStorePort>,
    pub validate_session: Arc<ValidateSession>,
    pub entitlement: Arc<ResolveEntitlement>,
    pub session: Arc<SessionStore>,
}

/// Runs the cold-start steps once, in order. A failing step is reported and logged but
/// never stops the steps after it.
pub struct BootstrapSequencer {
    deps: BootstrapDeps,
    settings: BootstrapSettings,
}

impl BootstrapSequencer {
    pub fn new(deps: BootstrapDeps, settings: BootstrapSettings) -> Self {
        Self { deps, settings }
    }

    pub async fn initialize(&self) -> BootstrapResult {
        let span = info_span!("usecase.bootstrap.initialize");
        async {
            let mut reports = Vec::with_capacity(11);

            reports.push(self.init_crash_reporter().await);
            reports.push(self.init_maps().await);
            let purchases_ready = self.init_purchases(&mut reports).await;
            reports.push(self.sync_purchases_once(purchases_ready).await);
            reports.push(self.init_push().await);
            reports.push(self.load_fonts().await);

            let (onboarding_report, is_onboarding_completed) = self.read_onboarding_flag().await;
            reports.push(onboarding_report);

            let validation = self.deps.validate_session.execute().await;
            reports.push(match (&validation.error, validation.is_valid) {
                (Some(err), _) => StepReport::failed(BootstrapStep::SessionValidation, err),
                (None, true) => StepReport::done(BootstrapStep::SessionValidation),
                (None, false) => StepReport::skipped(BootstrapStep::SessionValidation),
            });

            let is_pro = match validation.user.as_ref().filter(|_| validation.is_valid) {
                Some(profile) => {
                    let is_pro = self.deps.entitlement.for_profile(profile).await;
                    reports.push(StepReport::done(BootstrapStep::Entitlement));
                    is_pro
                }
                None => {
                    reports.push(StepReport::skipped(BootstrapStep::Entitlement));
                    false
                }
            };

            let flags = AppFlags {
                authenticated: validation.is_valid,
                has_macros: validation.is_complete,
                is_pro,
                ready_for_dashboard: validation.is_complete,
                is_onboarding_completed,
                is_session_validated: true,
            };
            let (apply_report, flags) = self.apply_session(flags, validation).await;
            reports.push(apply_report);

            reports.push(self.hide_splash().await);

            let result = BootstrapResult {
                flags,
                step_reports: reports,
            };
            info!(
                route = ?flags.route(),
                failed = ?result.failed_steps(),
                "Bootstrap finished"
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn init_crash_reporter(&self) -> StepReport {
        let step = BootstrapStep::CrashReporter;
        if self.deps.crash_reporter.is_initialized() {
            return StepReport::skipped(step);
        }
        match self.deps.crash_reporter.initialize().await {
            Ok(()) => StepReport::done(step),
            Err(err) => {
                error!(error = %err, "Crash reporter initialization failed");
                StepReport::failed(step, err)
            }
        }
    }

    async fn init_maps(&self) -> StepReport {
        let step = BootstrapStep::Maps;
        let key = self.settings.maps_api_key.trim();
        if key.is_empty() {
            warn!("No maps API key configured, skipping maps SDK");
            return StepReport::skipped(step);
        }
        match self.deps.maps.initialize(key).await {
            Ok(()) => StepReport::done(step),
            Err(err) => {
                warn!(error = %err, "Maps SDK initialization failed");
                StepReport::failed(step, err)
            }
        }
    }

    async fn init_purchases(&self, reports: &mut Vec<StepReport>) -> bool {
        let step = BootstrapStep::Purchases;
        match self.deps.purchases.initialize().await {
            Ok(()) => {
                reports.push(StepReport::done(step));
                true
            }
            Err(err) => {
                warn!(error = %err, "Purchases SDK initialization failed");
                reports.push(StepReport::failed(step, err));
                false
            }
        }
    }

    /// At most once per install. The flag is only written after a successful sync.
    async fn sync_purchases_once(&self, purchases_ready: bool) -> StepReport {
        let step = BootstrapStep::PurchaseSync;
        if !purchases_ready {
            return StepReport::skipped(step);
        }

        let synced = match self.deps.storage.get(PURCHASES_SYNCED_KEY).await {
            Ok(value) => stored_flag(value.as_deref()),
            Err(err) => {
                warn!(error = %err, "Failed to read purchase sync flag");
                return StepReport::failed(step, err);
            }
        };
        if synced {
            return StepReport::skipped(step);
        }

        if let Err(err) = self.deps.purchases.sync_purchases().await {
            warn!(error = %err, "Purchase sync failed");
            return StepReport::failed(step, err);
        }
        match self
            .deps
            .storage
            .set(PURCHASES_SYNCED_KEY, flag_value(true))
            .await
        {
            Ok(()) => {
                info!("Purchases synced");
                StepReport::done(step)
            }
            Err(err) => {
                warn!(error = %err, "Failed to persist purchase sync flag");
                StepReport::failed(step, err)
            }
        }
    }

    async fn init_push(&self) -> StepReport {
        let step = BootstrapStep::PushNotifications;
        match self.register_push().await {
            Ok(true) => StepReport::done(step),
            Ok(false) => {
                info!("Push permission denied, continuing without push");
                StepReport::skipped(step)
            }
            Err(err) => {
                warn!(error = %err, "Push notification setup failed");
                StepReport::failed(step, err)
            }
        }
    }

    /// `Ok(false)` when permission is denied.
    async fn register_push(&self) -> anyhow::Result<bool> {
        let push = &self.deps.push;
        if !push.request_permission().await? {
            return Ok(false);
        }
        let token = push.fetch_token().await?;
        push.register_token(&token).await?;
        Ok(true)
    }

    async fn load_fonts(&self) -> StepReport {
        match self.deps.fonts.load_fonts().await {
            Ok(count) => {
                info!(count, "Fonts loaded");
                StepReport::done(BootstrapStep::Fonts)
            }
            Err(err) => {
                warn!(error = %err, "Font loading failed");
                StepReport::failed(BootstrapStep::Fonts, err)
            }
        }
    }

    async fn read_onboarding_flag(&self) -> (StepReport, bool) {
        let step = BootstrapStep::OnboardingFlag;
        match self.deps.storage.get(ONBOARDING_COMPLETED_KEY).await {
            Ok(value) => (StepReport::done(step), stored_flag(value.as_deref())),
            Err(err) => {
                warn!(error = %err, "Failed to read onboarding flag");
                (StepReport::failed(step, err), false)
            }
        }
    }

    /// One batched write to the session store. If the store refuses the authenticated
    /// flags, the app starts signed out instead.
    async fn apply_session(
        &self,
        flags: AppFlags,
        validation: SessionValidation,
    ) -> (StepReport, AppFlags) {
        let step = BootstrapStep::ApplySession;
        let user_id = validation.user.as_ref().map(|user| user.id.clone());
        match self
            .deps
            .session
            .apply_bootstrap(flags, user_id, validation.user)
            .await
        {
            Ok(()) => (StepReport::done(step), flags),
            Err(err) => {
                error!(error = %err, "Session state rejected, starting signed out");
                let fallback = AppFlags {
                    is_onboarding_completed: flags.is_onboarding_completed,
                    is_session_validated: true,
                    ..AppFlags::default()
                };
                if let Err(err) = self.deps.session.apply_bootstrap(fallback, None, None).await {
                    error!(error = %err, "Failed to apply signed-out session state");
                }
                (StepReport::failed(step, err), fallback)
            }
        }
    }

    async fn hide_splash(&self) -> StepReport {
        tokio::time::sleep(self.settings.splash_grace).await;
        match self.deps.splash.hide().await {
            Ok(()) => StepReport::done(BootstrapStep::Splash),
            Err(err) => {
                warn!(error = %err, "Failed to hide splash screen");
                StepReport::failed(BootstrapStep::Splash, err)
            }
        }
    }
}
