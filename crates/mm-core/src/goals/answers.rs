//! Answers collected by the goal wizard.

use serde::{Deserialize, Serialize};

use super::request::MacroTargets;

/// Unit system chosen for height or weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    Imperial,
    #[default]
    Metric,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "imperial" => Some(UnitSystem::Imperial),
            "metric" => Some(UnitSystem::Metric),
            _ => None,
        }
    }
}

/// Fitness goal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    Lose,
    Maintain,
    Gain,
}

impl FitnessGoal {
    /// Label shown on the selection screen.
    pub fn label(&self) -> &'static str {
        match self {
            FitnessGoal::Lose => "Lose weight",
            FitnessGoal::Maintain => "Maintain weight",
            FitnessGoal::Gain => "Gain weight",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Lose weight" => Some(FitnessGoal::Lose),
            "Maintain weight" => Some(FitnessGoal::Maintain),
            "Gain weight" => Some(FitnessGoal::Gain),
            _ => None,
        }
    }

    /// Value sent as `goal_type` to the macro setup endpoint.
    pub fn api_value(&self) -> &'static str {
        match self {
            FitnessGoal::Lose => "lose",
            FitnessGoal::Maintain => "maintain",
            FitnessGoal::Gain => "gain",
        }
    }
}

/// Everything the user entered so far.
///
/// `progress_rate == 0.0` means "not chosen yet".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalAnswers {
    pub height_unit: UnitSystem,
    pub height_ft: Option<u32>,
    pub height_in: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_unit: UnitSystem,
    pub weight_lb: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub dietary_preference: Option<String>,
    pub fitness_goal: Option<FitnessGoal>,
    pub target_weight: Option<f64>,
    pub progress_rate: f64,
    pub sex: Option<String>,
    pub date_of_birth: Option<String>,
    pub macro_targets: Option<MacroTargets>,
}

impl GoalAnswers {
    /// Current body weight in the active weight unit.
    pub fn current_weight(&self) -> Option<f64> {
        match self.weight_unit {
            UnitSystem::Imperial => self.weight_lb,
            UnitSystem::Metric => self.weight_kg,
        }
    }

    pub fn apply(&mut self, answer: GoalAnswer) {
        match answer {
            GoalAnswer::HeightUnit(unit) => self.height_unit = unit,
            GoalAnswer::HeightImperial { ft, inches } => {
                self.height_ft = Some(ft);
                self.height_in = Some(inches);
            }
            GoalAnswer::HeightMetric(cm) => self.height_cm = Some(cm),
            GoalAnswer::WeightUnit(unit) => self.weight_unit = unit,
            GoalAnswer::WeightLb(lb) => self.weight_lb = Some(lb),
            GoalAnswer::WeightKg(kg) => self.weight_kg = Some(kg),
            GoalAnswer::ActivityLevel(level) => self.activity_level = Some(level),
            GoalAnswer::DietaryPreference(pref) => self.dietary_preference = Some(pref),
            GoalAnswer::FitnessGoal(goal) => self.fitness_goal = Some(goal),
            GoalAnswer::TargetWeight(weight) => self.target_weight = Some(weight),
            GoalAnswer::ProgressRate(rate) => self.progress_rate = rate,
            GoalAnswer::Sex(sex) => self.sex = Some(sex),
            GoalAnswer::DateOfBirth(dob) => self.date_of_birth = Some(dob),
        }
    }
}

/// A single user input on a wizard screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GoalAnswer {
    HeightUnit(UnitSystem),
    HeightImperial { ft: u32, inches: u32 },
    HeightMetric(f64),
    WeightUnit(UnitSystem),
    WeightLb(f64),
    WeightKg(f64),
    ActivityLevel(String),
    DietaryPreference(String),
    FitnessGoal(FitnessGoal),
    TargetWeight(f64),
    ProgressRate(f64),
    Sex(String),
    DateOfBirth(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_weight_follows_active_unit() {
        let mut answers = GoalAnswers {
            weight_lb: Some(180.0),
            weight_kg: Some(82.0),
            ..Default::default()
        };
        assert_eq!(answers.current_weight(), Some(82.0));

        answers.apply(GoalAnswer::WeightUnit(UnitSystem::Imperial));
        assert_eq!(answers.current_weight(), Some(180.0));
    }

    #[test]
    fn fitness_goal_labels_round_trip() {
        for goal in [FitnessGoal::Lose, FitnessGoal::Maintain, FitnessGoal::Gain] {
            assert_eq!(FitnessGoal::from_label(goal.label()), Some(goal));
        }
        assert_eq!(FitnessGoal::from_label("Bulk"), None);
    }
}
