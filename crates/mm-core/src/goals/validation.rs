//! Forward-navigation gate, one predicate per step.

use super::answers::{FitnessGoal, UnitSystem};
use super::state_machine::{CalculationStatus, WizardState};

/// Whether the user may leave the current step going forward.
pub fn can_advance(state: &WizardState) -> bool {
    match state.current_step() {
        Some(step) => (step.spec().can_advance)(state),
        None => false,
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub(crate) fn height_present(state: &WizardState) -> bool {
    let answers = &state.answers;
    match answers.height_unit {
        UnitSystem::Imperial => answers.height_ft.is_some() && answers.height_in.is_some(),
        UnitSystem::Metric => answers.height_cm.is_some(),
    }
}

pub(crate) fn weight_present(state: &WizardState) -> bool {
    state.answers.current_weight().is_some()
}

pub(crate) fn activity_level_selected(state: &WizardState) -> bool {
    non_empty(&state.answers.activity_level)
}

pub(crate) fn dietary_preference_selected(state: &WizardState) -> bool {
    non_empty(&state.answers.dietary_preference)
}

pub(crate) fn fitness_goal_selected(state: &WizardState) -> bool {
    state.answers.fitness_goal.is_some()
}

pub(crate) fn target_weight_consistent(state: &WizardState) -> bool {
    let answers = &state.answers;
    let Some(target) = answers.target_weight.filter(|t| *t != 0.0) else {
        return false;
    };
    match answers.fitness_goal {
        Some(FitnessGoal::Gain) => answers.current_weight().is_some_and(|c| target > c),
        Some(FitnessGoal::Lose) => answers.current_weight().is_some_and(|c| target < c),
        Some(FitnessGoal::Maintain) | None => true,
    }
}

pub(crate) fn progress_rate_set(state: &WizardState) -> bool {
    state.answers.progress_rate != 0.0
}

pub(crate) fn plan_ready(state: &WizardState) -> bool {
    state.answers.macro_targets.is_some() && state.calculation != CalculationStatus::Pending
}
