//! Goal wizard state machine.
//!
//! Defines a pure state transition function for the goal setup and goal adjustment flows.

use serde::{Deserialize, Serialize};

use super::answers::{FitnessGoal, GoalAnswer, GoalAnswers};
use super::metrics;
use super::request::MacroTargets;
use super::step::{EnterHook, MajorStep, StepId, SUB_STEP_COUNTS};
use super::validation::can_advance;

/// Which entry point opened the wizard.
///
/// 向导的入口。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalFlow {
    /// First-time goal setup after sign-up.
    ///
    /// 注册后的首次目标设置。
    Setup,
    /// Adjusting goals from settings.
    ///
    /// 从设置中调整目标。
    Adjust,
}

impl GoalFlow {
    /// Step the cursor starts on, and returns to on recalculation.
    pub fn entry_step(&self) -> StepId {
        match self {
            GoalFlow::Setup => StepId::Height,
            GoalFlow::Adjust => StepId::Weight,
        }
    }

    /// Steps where going back asks the user to leave the flow.
    pub fn exit_points(&self) -> &'static [StepId] {
        match self {
            GoalFlow::Setup => &[StepId::Height],
            GoalFlow::Adjust => &[StepId::Height, StepId::Weight],
        }
    }

    /// Steps the flow never shows. They start complete so the major step can finish.
    pub fn pre_completed(&self) -> &'static [StepId] {
        match self {
            GoalFlow::Setup => &[],
            GoalFlow::Adjust => &[StepId::Height],
        }
    }

    /// First visible step of `major` in this flow.
    pub fn first_step(&self, major: MajorStep) -> Option<StepId> {
        (0..major.sub_step_count())
            .filter_map(|sub| StepId::at(major.index(), sub))
            .find(|step| !self.pre_completed().contains(step))
    }
}

/// Remote macro calculation status.
///
/// 远程宏量计算状态。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalculationStatus {
    #[default]
    Idle,
    Pending,
    Failed { message: String },
}

/// Why the wizard closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Completed,
    Abandoned,
}

/// Wizard state.
///
/// 向导状态。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub flow: GoalFlow,
    pub major_step: usize,
    pub sub_steps: [usize; 3],
    pub completed: [Vec<bool>; 3],
    pub answers: GoalAnswers,
    pub calculation: CalculationStatus,
}

impl WizardState {
    pub fn new(flow: GoalFlow) -> Self {
        let mut state = Self {
            flow,
            major_step: 0,
            sub_steps: [0; 3],
            completed: SUB_STEP_COUNTS.map(|count| vec![false; count]),
            answers: GoalAnswers::default(),
            calculation: CalculationStatus::Idle,
        };
        for step in flow.pre_completed() {
            state.set_complete(*step, true);
        }
        state.set_cursor(flow.entry_step());
        state
    }

    pub fn current_step(&self) -> Option<StepId> {
        StepId::at(self.major_step, *self.sub_steps.get(self.major_step)?)
    }

    pub fn is_step_complete(&self, step: StepId) -> bool {
        let (major, sub) = step.position();
        self.completed[major][sub]
    }

    pub fn is_major_step_complete(&self, major: MajorStep) -> bool {
        self.completed[major.index()].iter().all(|done| *done)
    }

    fn set_cursor(&mut self, step: StepId) {
        let (major, sub) = step.position();
        self.major_step = major;
        self.sub_steps[major] = sub;
    }

    fn set_complete(&mut self, step: StepId, done: bool) {
        let (major, sub) = step.position();
        self.completed[major][sub] = done;
    }
}

/// Events that drive the wizard.
///
/// 驱动向导的事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardEvent {
    /// Continue button.
    ///
    /// 继续按钮。
    Advance,
    /// Back button.
    ///
    /// 返回按钮。
    Back,
    /// User accepted the exit prompt.
    ///
    /// 用户确认退出。
    ConfirmExitAccepted,
    /// User changed an answer.
    ///
    /// 用户修改了答案。
    Answer(GoalAnswer),
    /// Calculation succeeded (network).
    ///
    /// 计算成功（网络回调）。
    MacrosCalculated(MacroTargets),
    /// Calculation failed (network).
    ///
    /// 计算失败（网络回调）。
    MacrosFailed { message: String },
    /// Start over from the first major step.
    ///
    /// 从第一个主步骤重新开始。
    Recalculate,
    /// Jump from the hub screen to a finished major step.
    ///
    /// 从概览页跳转到已完成的主步骤。
    NavigateToMajorStep(MajorStep),
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardAction {
    /// Request macro targets for these answers.
    ///
    /// 根据这些答案请求宏量目标。
    CalculateMacros { answers: GoalAnswers },
    /// Ask the user whether to abandon the flow.
    ///
    /// 询问用户是否放弃流程。
    ConfirmExit,
    /// Leave the wizard.
    ///
    /// 离开向导。
    ExitFlow(ExitReason),
}

/// Pure goal wizard state machine.
///
/// 纯状态机：不包含副作用。
pub struct GoalWizardStateMachine;

impl GoalWizardStateMachine {
    pub fn transition(state: WizardState, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        match event {
            WizardEvent::Advance => advance(state),
            WizardEvent::Back => back(state),
            WizardEvent::ConfirmExitAccepted => {
                (state, vec![WizardAction::ExitFlow(ExitReason::Abandoned)])
            }
            WizardEvent::Answer(answer) => (answer_changed(state, answer), Vec::new()),
            WizardEvent::MacrosCalculated(targets) => {
                let mut state = state;
                if state.calculation == CalculationStatus::Pending {
                    state.answers.macro_targets = Some(targets);
                    state.calculation = CalculationStatus::Idle;
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(status = ?state.calculation, "Ignoring macro targets with no pending calculation");
                }
                (state, Vec::new())
            }
            WizardEvent::MacrosFailed { message } => {
                let mut state = state;
                if state.calculation == CalculationStatus::Pending {
                    state.answers.macro_targets = None;
                    state.calculation = CalculationStatus::Failed { message };
                }
                (state, Vec::new())
            }
            WizardEvent::Recalculate => (recalculate(state), Vec::new()),
            WizardEvent::NavigateToMajorStep(major) => {
                if !state.is_major_step_complete(major) {
                    return (state, Vec::new());
                }
                match state.flow.first_step(major) {
                    Some(step) => enter(state, step),
                    None => (state, Vec::new()),
                }
            }
        }
    }
}

fn advance(mut state: WizardState) -> (WizardState, Vec<WizardAction>) {
    let Some(step) = state.current_step() else {
        return (state, Vec::new());
    };
    if !can_advance(&state) {
        return (state, Vec::new());
    }
    state.set_complete(step, true);

    if step == StepId::FitnessGoal && state.answers.fitness_goal == Some(FitnessGoal::Maintain) {
        state.set_complete(StepId::TargetWeight, true);
        state.set_complete(StepId::ProgressRate, true);
        return enter(state, StepId::Plan);
    }

    let (major, sub) = step.position();
    if let Some(next) = StepId::at(major, sub + 1) {
        return enter(state, next);
    }
    // A major step is left only once all of its sub-steps are complete.
    if let Some(unfinished) = first_incomplete(&state, major) {
        return enter(state, unfinished);
    }
    if let Some(next) = StepId::at(major + 1, 0) {
        return enter(state, next);
    }
    (state, vec![WizardAction::ExitFlow(ExitReason::Completed)])
}

fn first_incomplete(state: &WizardState, major: usize) -> Option<StepId> {
    let position = state.completed[major].iter().position(|done| !done)?;
    StepId::at(major, position)
}

fn back(state: WizardState) -> (WizardState, Vec<WizardAction>) {
    let Some(step) = state.current_step() else {
        return (state, Vec::new());
    };
    if state.flow.exit_points().contains(&step) {
        return (state, vec![WizardAction::ConfirmExit]);
    }

    let (major, sub) = step.position();
    let previous = if sub > 0 {
        StepId::at(major, sub - 1)
    } else if major > 0 {
        let maintaining = state.answers.fitness_goal == Some(FitnessGoal::Maintain);
        if major - 1 == MajorStep::YourGoal.index() && maintaining {
            Some(StepId::FitnessGoal)
        } else {
            StepId::at(major - 1, SUB_STEP_COUNTS[major - 1] - 1)
        }
    } else {
        None
    };

    match previous {
        Some(previous) => enter(state, previous),
        None => (state, vec![WizardAction::ConfirmExit]),
    }
}

fn answer_changed(mut state: WizardState, answer: GoalAnswer) -> WizardState {
    let previous_goal = state.answers.fitness_goal;
    let selected_goal = match &answer {
        GoalAnswer::FitnessGoal(goal) => Some(*goal),
        _ => None,
    };
    state.answers.apply(answer);

    match selected_goal {
        Some(FitnessGoal::Maintain) => {
            state.answers.target_weight = state.answers.current_weight();
            state.answers.progress_rate = 0.0;
            state.set_complete(StepId::TargetWeight, true);
            state.set_complete(StepId::ProgressRate, true);
        }
        Some(goal) if previous_goal != Some(goal) => {
            state.answers.progress_rate = 0.0;
            state.set_complete(StepId::TargetWeight, false);
            state.set_complete(StepId::ProgressRate, false);
        }
        _ => {}
    }
    state
}

fn recalculate(mut state: WizardState) -> WizardState {
    state.answers.macro_targets = None;
    state.calculation = CalculationStatus::Idle;
    state.completed[MajorStep::YourPlan.index()].fill(false);
    state.sub_steps = [0; 3];
    state.set_cursor(state.flow.entry_step());
    state
}

/// Move the cursor onto `step` and run its enter hook.
fn enter(mut state: WizardState, step: StepId) -> (WizardState, Vec<WizardAction>) {
    state.set_cursor(step);

    let mut actions = Vec::new();
    match step.spec().on_enter {
        EnterHook::Nothing => {}
        EnterHook::DefaultProgressRate => {
            if state.answers.progress_rate == 0.0 {
                if let Some(goal) = state.answers.fitness_goal {
                    state.answers.progress_rate =
                        metrics::recommended_rate(goal, state.answers.weight_unit);
                }
            }
        }
        EnterHook::CalculateMacros => {
            state.answers.macro_targets = None;
            state.calculation = CalculationStatus::Pending;
            actions.push(WizardAction::CalculateMacros {
                answers: state.answers.clone(),
            });
        }
    }
    (state, actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::answers::UnitSystem;

    fn targets() -> MacroTargets {
        MacroTargets {
            carbs: 220.0,
            fat: 70.0,
            protein: 160.0,
            calories: 2150.0,
        }
    }

    /// Setup-flow state with every answer filled in for a weight-loss goal.
    fn filled_state() -> WizardState {
        let mut state = WizardState::new(GoalFlow::Setup);
        state.answers = GoalAnswers {
            height_unit: UnitSystem::Imperial,
            height_ft: Some(5),
            height_in: Some(10),
            weight_unit: UnitSystem::Imperial,
            weight_lb: Some(200.0),
            activity_level: Some("Active".into()),
            dietary_preference: Some("Balanced".into()),
            fitness_goal: Some(FitnessGoal::Lose),
            target_weight: Some(180.0),
            progress_rate: 1.0,
            sex: Some("Male".into()),
            date_of_birth: Some("15/06/1990".into()),
            ..Default::default()
        };
        state
    }

    /// Put the cursor on `step` as if every earlier step had been completed.
    fn at(mut state: WizardState, step: StepId) -> WizardState {
        let target = step.position();
        for major in MajorStep::ALL {
            for sub in 0..major.sub_step_count() {
                if (major.index(), sub) < target {
                    state.completed[major.index()][sub] = true;
                }
            }
        }
        state.set_cursor(step);
        state
    }

    fn run(state: WizardState, events: Vec<WizardEvent>) -> (WizardState, Vec<WizardAction>) {
        let mut state = state;
        let mut actions = Vec::new();
        for event in events {
            let (next, mut produced) = GoalWizardStateMachine::transition(state, event);
            state = next;
            actions.append(&mut produced);
        }
        (state, actions)
    }

    #[test]
    fn new_state_starts_on_flow_entry_step() {
        assert_eq!(
            WizardState::new(GoalFlow::Setup).current_step(),
            Some(StepId::Height)
        );
        assert_eq!(
            WizardState::new(GoalFlow::Adjust).current_step(),
            Some(StepId::Weight)
        );
    }

    #[test]
    fn advance_from_last_sub_step_moves_to_next_major_step() {
        let state = at(filled_state(), StepId::DietaryPreference);
        let (next, actions) = GoalWizardStateMachine::transition(state, WizardEvent::Advance);
        assert_eq!((next.major_step, next.sub_steps[1]), (1, 0));
        assert!(actions.is_empty());
        assert!(next.is_step_complete(StepId::DietaryPreference));

        let state = at(filled_state(), StepId::ProgressRate);
        let (next, actions) = GoalWizardStateMachine::transition(state, WizardEvent::Advance);
        assert_eq!((next.major_step, next.sub_steps[2]), (2, 0));
        assert_eq!(next.calculation, CalculationStatus::Pending);
        assert!(matches!(
            actions.as_slice(),
            [WizardAction::CalculateMacros { .. }]
        ));
    }

    #[test]
    fn advance_from_terminal_step_exits_flow() {
        let mut state = at(filled_state(), StepId::Plan);
        state.answers.macro_targets = Some(targets());

        let (next, actions) = GoalWizardStateMachine::transition(state, WizardEvent::Advance);

        assert_eq!(actions, vec![WizardAction::ExitFlow(ExitReason::Completed)]);
        assert!(next.is_major_step_complete(MajorStep::YourPlan));
    }

    #[test]
    fn advance_is_ignored_when_gate_fails() {
        let state = WizardState::new(GoalFlow::Setup);
        let (next, actions) =
            GoalWizardStateMachine::transition(state.clone(), WizardEvent::Advance);
        assert_eq!(next, state);
        assert!(actions.is_empty());
    }

    #[test]
    fn maintain_skips_target_and_rate_regardless_of_previous_values() {
        let state = at(filled_state(), StepId::FitnessGoal);
        let (next, actions) = run(
            state,
            vec![
                WizardEvent::Answer(GoalAnswer::FitnessGoal(FitnessGoal::Maintain)),
                WizardEvent::Advance,
            ],
        );

        assert!(next.is_step_complete(StepId::FitnessGoal));
        assert!(next.is_step_complete(StepId::TargetWeight));
        assert!(next.is_step_complete(StepId::ProgressRate));
        assert_eq!(next.current_step(), Some(StepId::Plan));
        assert_eq!(next.answers.target_weight, Some(200.0));
        assert_eq!(next.answers.progress_rate, 0.0);
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn back_from_plan_lands_on_fitness_goal_when_maintaining() {
        let mut state = at(filled_state(), StepId::Plan);
        state.answers.fitness_goal = Some(FitnessGoal::Maintain);

        let (next, _) = GoalWizardStateMachine::transition(state, WizardEvent::Back);

        assert_eq!(next.current_step(), Some(StepId::FitnessGoal));
    }

    #[test]
    fn back_from_first_sub_step_goes_to_previous_major_last_sub_step() {
        let state = at(filled_state(), StepId::FitnessGoal);
        let (next, actions) = GoalWizardStateMachine::transition(state, WizardEvent::Back);
        assert_eq!(next.current_step(), Some(StepId::DietaryPreference));
        assert!(actions.is_empty());
    }

    #[test]
    fn back_at_exit_point_asks_for_confirmation() {
        let state = WizardState::new(GoalFlow::Adjust);
        let (next, actions) = GoalWizardStateMachine::transition(state.clone(), WizardEvent::Back);
        assert_eq!(next, state);
        assert_eq!(actions, vec![WizardAction::ConfirmExit]);

        let (_, actions) = GoalWizardStateMachine::transition(next, WizardEvent::ConfirmExitAccepted);
        assert_eq!(actions, vec![WizardAction::ExitFlow(ExitReason::Abandoned)]);
    }

    #[test]
    fn weight_is_not_an_exit_point_during_setup() {
        let state = at(filled_state(), StepId::Weight);
        let (next, actions) = GoalWizardStateMachine::transition(state, WizardEvent::Back);
        assert_eq!(next.current_step(), Some(StepId::Height));
        assert!(actions.is_empty());
    }

    #[test]
    fn entering_progress_rate_seeds_recommended_rate() {
        let mut state = at(filled_state(), StepId::TargetWeight);
        state.answers.progress_rate = 0.0;
        state.answers.weight_unit = UnitSystem::Metric;
        state.answers.weight_kg = Some(90.0);
        state.answers.target_weight = Some(80.0);

        let (next, _) = GoalWizardStateMachine::transition(state, WizardEvent::Advance);

        assert_eq!(next.current_step(), Some(StepId::ProgressRate));
        assert_eq!(next.answers.progress_rate, 0.45);
    }

    #[test]
    fn switching_goal_direction_resets_rate_and_completion() {
        let mut state = at(filled_state(), StepId::FitnessGoal);
        state.set_complete(StepId::TargetWeight, true);
        state.set_complete(StepId::ProgressRate, true);

        let (next, _) = GoalWizardStateMachine::transition(
            state,
            WizardEvent::Answer(GoalAnswer::FitnessGoal(FitnessGoal::Gain)),
        );

        assert_eq!(next.answers.progress_rate, 0.0);
        assert!(!next.is_step_complete(StepId::TargetWeight));
        assert!(!next.is_step_complete(StepId::ProgressRate));
    }

    #[test]
    fn calculation_results_settle_pending_state() {
        let state = at(filled_state(), StepId::ProgressRate);
        let (pending, _) = GoalWizardStateMachine::transition(state, WizardEvent::Advance);

        let (done, _) = GoalWizardStateMachine::transition(
            pending.clone(),
            WizardEvent::MacrosCalculated(targets()),
        );
        assert_eq!(done.answers.macro_targets, Some(targets()));
        assert_eq!(done.calculation, CalculationStatus::Idle);

        let (failed, _) = GoalWizardStateMachine::transition(
            pending,
            WizardEvent::MacrosFailed {
                message: "Server is temporarily unavailable. Please try again later.".into(),
            },
        );
        assert_eq!(failed.answers.macro_targets, None);
        assert!(matches!(failed.calculation, CalculationStatus::Failed { .. }));
        assert!(!can_advance(&failed));
    }

    #[test]
    fn late_result_after_recalculate_is_ignored() {
        let state = at(filled_state(), StepId::ProgressRate);
        let (next, _) = run(
            state,
            vec![
                WizardEvent::Advance,
                WizardEvent::Recalculate,
                WizardEvent::MacrosCalculated(targets()),
            ],
        );

        assert_eq!(next.answers.macro_targets, None);
        assert_eq!(next.calculation, CalculationStatus::Idle);
    }

    #[test]
    fn recalculate_returns_to_flow_entry_step() {
        let mut state = at(filled_state(), StepId::Plan);
        state.flow = GoalFlow::Adjust;
        state.answers.macro_targets = Some(targets());
        state.completed[2][0] = true;

        let (next, actions) = GoalWizardStateMachine::transition(state, WizardEvent::Recalculate);

        assert_eq!(next.current_step(), Some(StepId::Weight));
        assert_eq!(next.answers.macro_targets, None);
        assert!(!next.is_major_step_complete(MajorStep::YourPlan));
        assert!(actions.is_empty());
    }

    #[test]
    fn hub_navigation_requires_completed_major_step() {
        let mut state = at(filled_state(), StepId::Plan);
        state.completed[0][2] = false;
        let (next, _) = GoalWizardStateMachine::transition(
            state.clone(),
            WizardEvent::NavigateToMajorStep(MajorStep::BasicInfo),
        );
        assert_eq!(next, state);

        let mut state = state;
        state.completed[0] = vec![true; 4];
        state.sub_steps[0] = 3;
        let (next, _) = GoalWizardStateMachine::transition(
            state,
            WizardEvent::NavigateToMajorStep(MajorStep::BasicInfo),
        );
        assert_eq!(next.current_step(), Some(StepId::Height));
    }

    #[test]
    fn adjust_flow_starts_with_hidden_height_complete() {
        let state = WizardState::new(GoalFlow::Adjust);
        assert!(state.is_step_complete(StepId::Height));
        assert!(!state.is_step_complete(StepId::Weight));

        let setup = WizardState::new(GoalFlow::Setup);
        assert!(!setup.is_step_complete(StepId::Height));
    }

    #[test]
    fn adjust_flow_finishes_basic_info_before_moving_on() {
        let mut state = WizardState::new(GoalFlow::Adjust);
        state.answers = filled_state().answers;

        let (next, actions) = run(
            state,
            vec![WizardEvent::Advance, WizardEvent::Advance, WizardEvent::Advance],
        );

        assert!(actions.is_empty());
        assert_eq!(next.current_step(), Some(StepId::FitnessGoal));
        assert!(next.is_major_step_complete(MajorStep::BasicInfo));

        let (back_to_basics, _) = GoalWizardStateMachine::transition(
            next,
            WizardEvent::NavigateToMajorStep(MajorStep::BasicInfo),
        );
        assert_eq!(back_to_basics.current_step(), Some(StepId::Weight));
    }

    #[test]
    fn unfinished_major_step_sends_cursor_to_first_gap() {
        let mut state = at(filled_state(), StepId::DietaryPreference);
        state.completed[0][1] = false;

        let (next, _) = GoalWizardStateMachine::transition(state, WizardEvent::Advance);

        assert_eq!(next.major_step, 0);
        assert_eq!(next.current_step(), Some(StepId::Weight));
        assert!(next.is_step_complete(StepId::DietaryPreference));
    }
}
