//! Numeric derivations used by the goal wizard.

use chrono::{Datelike, NaiveDate};

use super::answers::{FitnessGoal, UnitSystem};

/// Time-to-goal under this many weeks is considered too aggressive...
const MIN_WEEKS_TO_GOAL: f64 = 4.0;
/// ...but only when the total change exceeds this many units.
const LARGE_WEIGHT_DIFFERENCE: f64 = 10.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Imperial height as decimal feet, rounded to 2 dp.
pub fn decimal_feet(ft: u32, inches: u32) -> f64 {
    round2(f64::from(ft) + f64::from(inches) / 12.0)
}

/// Inverse of [`decimal_feet`], used to hydrate the wizard from a stored profile.
pub fn feet_inches_from_decimal(height: f64) -> (u32, u32) {
    let mut ft = height.floor().max(0.0) as u32;
    let mut inches = ((height - height.floor()) * 12.0).round() as u32;
    if inches >= 12 {
        ft += 1;
        inches = 0;
    }
    (ft, inches)
}

/// Parse a date of birth entered as `DD/MM/YYYY` or stored as `YYYY-MM-DD`.
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.contains('/') {
        let mut parts = raw.split('/');
        let day = parts.next()?.trim().parse().ok()?;
        let month = parts.next()?.trim().parse().ok()?;
        let year = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    } else {
        // Backend profiles may carry a full timestamp.
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}

/// Whole elapsed years between `dob` and `today`.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// `DD/MM/YYYY` → `YYYY-MM-DD`; other inputs pass through untouched.
pub fn dob_api_format(raw: &str) -> String {
    if raw.contains('/') {
        let parts: Vec<&str> = raw.split('/').map(str::trim).collect();
        if let [day, month, year] = parts.as_slice() {
            return format!("{year}-{month:0>2}-{day:0>2}");
        }
    }
    raw.to_string()
}

/// Initial slider value when the user has not chosen a rate yet.
pub fn recommended_rate(goal: FitnessGoal, unit: UnitSystem) -> f64 {
    match (goal, unit) {
        (FitnessGoal::Lose, UnitSystem::Imperial) => 1.0,
        (FitnessGoal::Lose, UnitSystem::Metric) => 0.45,
        (FitnessGoal::Gain, UnitSystem::Imperial) => 0.5,
        (FitnessGoal::Gain, UnitSystem::Metric) => 0.23,
        (FitnessGoal::Maintain, _) => 0.0,
    }
}

/// Boundary between recommended and unrecommended weekly rates.
pub fn rate_ceiling(goal: FitnessGoal, unit: UnitSystem) -> f64 {
    match (goal, unit) {
        (FitnessGoal::Lose, UnitSystem::Imperial) => 2.0,
        (FitnessGoal::Lose, UnitSystem::Metric) => 0.9,
        (FitnessGoal::Gain, UnitSystem::Imperial) => 1.0,
        (FitnessGoal::Gain, UnitSystem::Metric) => 0.45,
        (FitnessGoal::Maintain, _) => 0.0,
    }
}

/// Warning cue for the progress-rate screen. Never blocks submission.
pub fn is_unreasonable_rate(
    goal: FitnessGoal,
    unit: UnitSystem,
    rate: f64,
    current_weight: f64,
    target_weight: f64,
) -> bool {
    if rate == 0.0 {
        return false;
    }
    let difference = (target_weight - current_weight).abs();
    let weeks_to_goal = difference / rate;
    let too_fast = weeks_to_goal < MIN_WEEKS_TO_GOAL && difference > LARGE_WEIGHT_DIFFERENCE;
    rate > rate_ceiling(goal, unit) || too_fast
}

/// Maps the activity labels shown to the user onto backend values.
pub fn activity_level_api_value(label: &str) -> &'static str {
    match label {
        "Not very active" | "Lightly active" => "sedentary",
        "Active" => "moderate",
        "Very active" => "active",
        _ => "sedentary",
    }
}
