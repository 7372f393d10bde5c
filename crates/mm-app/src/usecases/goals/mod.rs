//! Goal setup and goal adjustment wizard.

mod context;
mod orchestrator;

pub use context::WizardContext;
pub use orchestrator::{GoalWizardOrchestrator, WizardOutcome};
