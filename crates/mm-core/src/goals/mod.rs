//! Goal wizard domain: answers, step table, validation gate and the pure state machine.

pub mod answers;
pub mod metrics;
pub mod request;
pub mod state_machine;
pub mod step;
pub mod validation;

pub use answers::{FitnessGoal, GoalAnswer, GoalAnswers, UnitSystem};
pub use request::{MacroSetupRequest, MacroTargets};
pub use state_machine::{
    CalculationStatus, ExitReason, GoalFlow, GoalWizardStateMachine, WizardAction, WizardEvent,
    WizardState,
};
pub use step::{MajorStep, StepId, SUB_STEP_COUNTS};
pub use validation::can_advance;
