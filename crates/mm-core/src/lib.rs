//! # mm-core
//!
//! Core domain models and business logic for MacroMeals.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod bootstrap;
pub mod config;
pub mod goals;
pub mod ports;
pub mod session;

// Re-export commonly used types at the crate root
pub use bootstrap::{AppFlags, BootstrapResult, BootstrapStep, Route, StepOutcome, StepReport};
pub use config::AppConfig;
pub use goals::{
    CalculationStatus, ExitReason, FitnessGoal, GoalAnswer, GoalAnswers, GoalFlow,
    GoalWizardStateMachine, MacroSetupRequest, MacroTargets, MajorStep, StepId, UnitSystem,
    WizardAction, WizardEvent, WizardState,
};
pub use session::{SecretString, SessionState, SessionValidation, UserProfile};
