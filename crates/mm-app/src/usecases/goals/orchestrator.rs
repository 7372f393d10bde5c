//! Goal wizard orchestrator.
//!
//! This module coordinates the goal wizard state machine and its side effects.

use std::sync::Arc;

use mm_core::goals::metrics::feet_inches_from_decimal;
use mm_core::goals::{
    ExitReason, GoalAnswer, GoalAnswers, GoalFlow, GoalWizardStateMachine, MacroSetupRequest,
    MajorStep, UnitSystem, WizardAction, WizardEvent, WizardState,
};
use mm_core::ports::{ClockPort, DialogPort, Endpoint};
use mm_core::session::UserProfile;
use tracing::{debug, info, info_span, warn, Instrument};

use super::context::WizardContext;
use crate::usecases::session::AuthenticatedCaller;

const EXIT_TITLE: &str = "Exit";
const EXIT_SETUP_MESSAGE: &str = "Are you sure you want to exit setting up your goals?";
const EXIT_ADJUST_MESSAGE: &str = "Are you sure you want to exit adjusting your goals?";
const ERROR_TITLE: &str = "Error";

/// State after a dispatch, plus the exit reason when the wizard closed.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardOutcome {
    pub state: WizardState,
    pub exit: Option<ExitReason>,
}

/// Orchestrator that drives the goal wizard state and side effects.
pub struct GoalWizardOrchestrator {
    context: Arc<WizardContext>,
    caller: Arc<AuthenticatedCaller>,
    dialog: Arc<dyn DialogPort>,
    clock: Arc<dyn ClockPort>,
}

impl GoalWizardOrchestrator {
    pub fn new(
        caller: Arc<AuthenticatedCaller>,
        dialog: Arc<dyn DialogPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            context: WizardContext::default().arc(),
            caller,
            dialog,
            clock,
        }
    }

    /// Begin a new wizard session, discarding the previous one.
    ///
    /// Date of birth and sex come from the profile when it has them. The adjust flow
    /// also takes the stored height, since it opens on the weight screen.
    pub async fn start(&self, flow: GoalFlow, profile: Option<&UserProfile>) -> WizardState {
        let mut state = WizardState::new(flow);
        if let Some(profile) = profile {
            hydrate(&mut state.answers, flow, profile);
        }
        let generation = self.context.reset(state.clone()).await;
        info!(?flow, generation, "Goal wizard started");
        state
    }

    pub async fn state(&self) -> WizardState {
        self.context.get_state().await
    }

    pub async fn answer(&self, answer: GoalAnswer) -> WizardOutcome {
        self.dispatch(WizardEvent::Answer(answer)).await
    }

    pub async fn advance(&self) -> WizardOutcome {
        self.dispatch(WizardEvent::Advance).await
    }

    pub async fn back(&self) -> WizardOutcome {
        self.dispatch(WizardEvent::Back).await
    }

    pub async fn recalculate(&self) -> WizardOutcome {
        self.dispatch(WizardEvent::Recalculate).await
    }

    pub async fn navigate_to(&self, major: MajorStep) -> WizardOutcome {
        self.dispatch(WizardEvent::NavigateToMajorStep(major)).await
    }

    async fn dispatch(&self, event: WizardEvent) -> WizardOutcome {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.goal_wizard.dispatch", event = ?event);
        async {
            let generation = self.context.generation();
            let mut current = self.context.get_state().await;
            let mut pending_events = vec![event];
            let mut exit = None;

            while let Some(event) = pending_events.pop() {
                let from = current.current_step();
                let event_name = format!("{:?}", event);
                let (next, actions) = GoalWizardStateMachine::transition(current, event);
                info!(from = ?from, to = ?next.current_step(), event = %event_name, "goal wizard transition");

                if !self.context.set_state_if_current(next.clone(), generation).await {
                    return self.restarted_outcome().await;
                }
                current = next;

                let follow_up_events = self
                    .execute_actions(actions, current.flow, generation, &mut exit)
                    .await;
                pending_events.extend(follow_up_events);
            }

            if self.context.generation() != generation {
                return self.restarted_outcome().await;
            }

            WizardOutcome {
                state: current,
                exit,
            }
        }
        .instrument(span)
        .await
    }

    /// The wizard was restarted mid-dispatch. Report the new session's state instead.
    async fn restarted_outcome(&self) -> WizardOutcome {
        info!("Goal wizard restarted during dispatch, dropping stale result");
        WizardOutcome {
            state: self.context.get_state().await,
            exit: None,
        }
    }

    async fn execute_actions(
        &self,
        actions: Vec<WizardAction>,
        flow: GoalFlow,
        generation: u64,
        exit: &mut Option<ExitReason>,
    ) -> Vec<WizardEvent> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            debug!(?action, "goal wizard executing action");
            match action {
                WizardAction::CalculateMacros { answers } => {
                    if let Some(event) = self.calculate_macros(&answers, generation).await {
                        follow_up_events.push(event);
                    }
                }
                WizardAction::ConfirmExit => {
                    let message = match flow {
                        GoalFlow::Setup => EXIT_SETUP_MESSAGE,
                        GoalFlow::Adjust => EXIT_ADJUST_MESSAGE,
                    };
                    if self.dialog.confirm(EXIT_TITLE, message).await {
                        follow_up_events.push(WizardEvent::ConfirmExitAccepted);
                    }
                }
                WizardAction::ExitFlow(reason) => {
                    info!(?reason, "Goal wizard closed");
                    *exit = Some(reason);
                }
            }
        }
        follow_up_events
    }

    /// `None` when the wizard was restarted while the request was in flight.
    async fn calculate_macros(&self, answers: &GoalAnswers, generation: u64) -> Option<WizardEvent> {
        let request = MacroSetupRequest::from_answers(answers, self.clock.today());
        let backend = self.caller.backend();
        let result = self
            .caller
            .call(Endpoint::MacroSetup, |token| {
                let backend = Arc::clone(&backend);
                let request = request.clone();
                async move { backend.setup_macros(&token, &request).await }
            })
            .await;

        if self.context.generation() != generation {
            debug!("Discarding macro calculation from a previous wizard session");
            return None;
        }

        match result {
            Ok(targets) => {
                info!(calories = targets.calories, "Macro targets calculated");
                Some(WizardEvent::MacrosCalculated(targets))
            }
            Err(err) => {
                warn!(error = %err, "Macro calculation failed");
                let message = err.user_message();
                self.dialog.alert(ERROR_TITLE, &message).await;
                Some(WizardEvent::MacrosFailed { message })
            }
        }
    }
}

fn hydrate(answers: &mut GoalAnswers, flow: GoalFlow, profile: &UserProfile) {
    if answers.date_of_birth.is_none() {
        answers.date_of_birth = profile.dob.clone().filter(|dob| !dob.trim().is_empty());
    }
    if answers.sex.is_none() {
        answers.sex = profile.sex.clone().filter(|sex| !sex.trim().is_empty());
    }
    if flow != GoalFlow::Adjust {
        return;
    }

    let Some(height) = profile.height.filter(|h| *h > 0.0) else {
        return;
    };
    let unit = profile
        .height_unit_preference
        .as_deref()
        .and_then(UnitSystem::parse)
        .unwrap_or(UnitSystem::Imperial);
    answers.height_unit = unit;
    match unit {
        UnitSystem::Imperial => {
            if answers.height_ft.is_none() {
                let (ft, inches) = feet_inches_from_decimal(height);
                answers.height_ft = Some(ft);
                answers.height_in = Some(inches);
            }
        }
        UnitSystem::Metric => {
            if answers.height_cm.is_none() {
                answers.height_cm = Some(height);
            }
        }
    }
}
