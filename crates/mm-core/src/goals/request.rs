//! Macro calculation request and response models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::answers::{GoalAnswers, UnitSystem};
use super::metrics;

/// Daily macro targets returned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroTargets {
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub calories: f64,
}

/// Body of the macro setup call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSetupRequest {
    pub activity_level: String,
    pub age: i32,
    pub dietary_preference: String,
    pub dob: String,
    pub goal_type: String,
    pub height: f64,
    pub progress_rate: f64,
    pub sex: String,
    pub target_weight: f64,
    pub height_unit_preference: String,
    pub weight_unit_preference: String,
    pub weight: f64,
}

impl MacroSetupRequest {
    /// Build the request from collected answers. Missing values become `0` or empty.
    pub fn from_answers(answers: &GoalAnswers, today: NaiveDate) -> Self {
        let height = match answers.height_unit {
            UnitSystem::Imperial => metrics::decimal_feet(
                answers.height_ft.unwrap_or(0),
                answers.height_in.unwrap_or(0),
            ),
            UnitSystem::Metric => answers.height_cm.unwrap_or(0.0),
        };

        let raw_dob = answers.date_of_birth.as_deref().unwrap_or("");
        let age = metrics::parse_date_of_birth(raw_dob)
            .map(|dob| metrics::age_on(dob, today))
            .unwrap_or(0);

        Self {
            activity_level: answers
                .activity_level
                .as_deref()
                .map(metrics::activity_level_api_value)
                .unwrap_or_default()
                .to_string(),
            age,
            dietary_preference: answers.dietary_preference.clone().unwrap_or_default(),
            dob: metrics::dob_api_format(raw_dob),
            goal_type: answers
                .fitness_goal
                .map(|goal| goal.api_value().to_string())
                .unwrap_or_default(),
            height,
            progress_rate: answers.progress_rate,
            sex: answers
                .sex
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default(),
            target_weight: answers.target_weight.unwrap_or(0.0),
            height_unit_preference: answers.height_unit.as_str().to_string(),
            weight_unit_preference: answers.weight_unit.as_str().to_string(),
            weight: answers.current_weight().unwrap_or(0.0),
        }
    }
}
