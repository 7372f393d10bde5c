use mm_core::bootstrap::{BootstrapResult, Route};
use tracing::{info, info_span, warn, Instrument};

use super::wiring::AppServices;

/// Run the cold start and report where the app would land.
pub async fn run_app(services: &AppServices) -> anyhow::Result<BootstrapResult> {
    let span = info_span!("shell.run_app");
    async {
        let result = services.bootstrap.initialize().await;

        for report in &result.step_reports {
            info!(step = ?report.step, outcome = ?report.outcome, "Bootstrap step");
        }

        match result.flags.route() {
            Route::Auth => info!("No valid session, sign-in required"),
            Route::GoalSetup => {
                let state = services.goal_wizard.state().await;
                info!(step = ?state.current_step(), "Goal setup pending");
            }
            Route::Dashboard => {
                let session = services.session.snapshot().await;
                info!(is_pro = session.is_pro, "Ready for dashboard");
            }
        }
        if !result.flags.is_onboarding_completed {
            warn!("Onboarding has not been completed on this install");
        }

        Ok(result)
    }
    .instrument(span)
    .await
}
