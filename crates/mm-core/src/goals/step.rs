//! Step identifiers and the data table that drives the goal wizard.
//!
//! 目标向导的步骤标识与驱动表。

use serde::{Deserialize, Serialize};

use super::state_machine::WizardState;
use super::validation;

/// Number of sub-steps in each major step.
pub const SUB_STEP_COUNTS: [usize; 3] = [4, 3, 1];

/// Top-level phase of the wizard.
///
/// 向导的顶层阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorStep {
    BasicInfo,
    YourGoal,
    YourPlan,
}

impl MajorStep {
    pub const ALL: [MajorStep; 3] = [MajorStep::BasicInfo, MajorStep::YourGoal, MajorStep::YourPlan];

    pub fn index(&self) -> usize {
        match self {
            MajorStep::BasicInfo => 0,
            MajorStep::YourGoal => 1,
            MajorStep::YourPlan => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            MajorStep::BasicInfo => "Basic info",
            MajorStep::YourGoal => "Your goal",
            MajorStep::YourPlan => "Your plan",
        }
    }

    pub fn sub_step_count(&self) -> usize {
        SUB_STEP_COUNTS[self.index()]
    }
}

/// A single wizard screen.
///
/// 单个向导页面。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepId {
    Height,
    Weight,
    ActivityLevel,
    DietaryPreference,
    FitnessGoal,
    TargetWeight,
    ProgressRate,
    Plan,
}

/// Work to run when the cursor lands on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterHook {
    Nothing,
    /// Seed the slider with the recommended rate when none is chosen.
    DefaultProgressRate,
    /// Kick off the remote macro calculation.
    CalculateMacros,
}

/// One row of the step table.
pub struct StepSpec {
    pub id: StepId,
    pub major: MajorStep,
    pub sub: usize,
    pub can_advance: fn(&WizardState) -> bool,
    pub on_enter: EnterHook,
}

static STEP_TABLE: [StepSpec; 8] = [
    StepSpec {
        id: StepId::Height,
        major: MajorStep::BasicInfo,
        sub: 0,
        can_advance: validation::height_present,
        on_enter: EnterHook::Nothing,
    },
    StepSpec {
        id: StepId::Weight,
        major: MajorStep::BasicInfo,
        sub: 1,
        can_advance: validation::weight_present,
        on_enter: EnterHook::Nothing,
    },
    StepSpec {
        id: StepId::ActivityLevel,
        major: MajorStep::BasicInfo,
        sub: 2,
        can_advance: validation::activity_level_selected,
        on_enter: EnterHook::Nothing,
    },
    StepSpec {
        id: StepId::DietaryPreference,
        major: MajorStep::BasicInfo,
        sub: 3,
        can_advance: validation::dietary_preference_selected,
        on_enter: EnterHook::Nothing,
    },
    StepSpec {
        id: StepId::FitnessGoal,
        major: MajorStep::YourGoal,
        sub: 0,
        can_advance: validation::fitness_goal_selected,
        on_enter: EnterHook::Nothing,
    },
    StepSpec {
        id: StepId::TargetWeight,
        major: MajorStep::YourGoal,
        sub: 1,
        can_advance: validation::target_weight_consistent,
        on_enter: EnterHook::Nothing,
    },
    StepSpec {
        id: StepId::ProgressRate,
        major: MajorStep::YourGoal,
        sub: 2,
        can_advance: validation::progress_rate_set,
        on_enter: EnterHook::DefaultProgressRate,
    },
    StepSpec {
        id: StepId::Plan,
        major: MajorStep::YourPlan,
        sub: 0,
        can_advance: validation::plan_ready,
        on_enter: EnterHook::CalculateMacros,
    },
];

impl StepId {
    /// Resolve a cursor position. `None` when out of range.
    pub fn at(major: usize, sub: usize) -> Option<StepId> {
        STEP_TABLE
            .iter()
            .find(|spec| spec.major.index() == major && spec.sub == sub)
            .map(|spec| spec.id)
    }

    pub fn spec(&self) -> &'static StepSpec {
        // The table holds exactly one row per variant, in declaration order.
        &STEP_TABLE[*self as usize]
    }

    pub fn position(&self) -> (usize, usize) {
        let spec = self.spec();
        (spec.major.index(), spec.sub)
    }

    pub fn major(&self) -> MajorStep {
        self.spec().major
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_match_variant_order() {
        for (index, spec) in STEP_TABLE.iter().enumerate() {
            assert_eq!(spec.id as usize, index);
        }
    }

    #[test]
    fn every_cursor_position_resolves() {
        for major in MajorStep::ALL {
            for sub in 0..major.sub_step_count() {
                let id = StepId::at(major.index(), sub).unwrap();
                assert_eq!(id.position(), (major.index(), sub));
            }
            assert_eq!(StepId::at(major.index(), major.sub_step_count()), None);
        }
    }

    #[test]
    fn positions_match_layout() {
        assert_eq!(StepId::Height.position(), (0, 0));
        assert_eq!(StepId::DietaryPreference.position(), (0, 3));
        assert_eq!(StepId::FitnessGoal.position(), (1, 0));
        assert_eq!(StepId::ProgressRate.position(), (1, 2));
        assert_eq!(StepId::Plan.position(), (2, 0));
    }
}
