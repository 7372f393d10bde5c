//! Cold-start bootstrap results.
//!
//! 冷启动结果：每一步的执行报告以及最终的应用标志。

use serde::{Deserialize, Serialize};

/// Bootstrap steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStep {
    CrashReporter,
    Maps,
    Purchases,
    PurchaseSync,
    PushNotifications,
    Fonts,
    OnboardingFlag,
    SessionValidation,
    Entitlement,
    ApplySession,
    Splash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Done,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: BootstrapStep,
    pub outcome: StepOutcome,
}

impl StepReport {
    pub fn done(step: BootstrapStep) -> Self {
        Self {
            step,
            outcome: StepOutcome::Done,
        }
    }

    pub fn skipped(step: BootstrapStep) -> Self {
        Self {
            step,
            outcome: StepOutcome::Skipped,
        }
    }

    pub fn failed(step: BootstrapStep, error: impl std::fmt::Display) -> Self {
        Self {
            step,
            outcome: StepOutcome::Failed(error.to_string()),
        }
    }
}

/// Where the app lands after the splash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Auth,
    GoalSetup,
    Dashboard,
}

/// Flags applied to the session store at the end of bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppFlags {
    pub authenticated: bool,
    pub has_macros: bool,
    pub is_pro: bool,
    pub ready_for_dashboard: bool,
    pub is_onboarding_completed: bool,
    pub is_session_validated: bool,
}

impl AppFlags {
    pub fn route(&self) -> Route {
        if !self.authenticated {
            Route::Auth
        } else if self.ready_for_dashboard {
            Route::Dashboard
        } else {
            Route::GoalSetup
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    pub flags: AppFlags,
    pub step_reports: Vec<StepReport>,
}

impl BootstrapResult {
    pub fn outcome(&self, step: BootstrapStep) -> Option<&StepOutcome> {
        self.step_reports
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }

    pub fn failed_steps(&self) -> Vec<BootstrapStep> {
        self.step_reports
            .iter()
            .filter(|report| matches!(report.outcome, StepOutcome::Failed(_)))
            .map(|report| report.step)
            .collect()
    }
}
