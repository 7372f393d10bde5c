//! MacroMeals Application Orchestration Layer
//!
//! Use cases that drive cold-start bootstrap, session validation, entitlement checks,
//! referral redemption and the goal wizard. Everything here talks to the outside world
//! through the ports defined in `mm-core`.

pub mod session_store;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;

pub use session_store::{SessionStore, SessionStoreError};
pub use usecases::bootstrap::{BootstrapDeps, BootstrapSequencer, BootstrapSettings};
pub use usecases::entitlement::{CompleteGoalSetup, PostSetupRoute, ResolveEntitlement};
pub use usecases::goals::{GoalWizardOrchestrator, WizardOutcome};
pub use usecases::referral::{RedeemReferralCode, RedemptionOutcome, ReferralError};
pub use usecases::session::{AuthenticatedCaller, CredentialStore, RefreshPolicy, ValidateSession};
