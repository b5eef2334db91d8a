use super::AuditError;
use crate::answers::AnswerSet;
use serde::{Deserialize, Serialize};

const SCENARIO_DOCUMENT: &str = include_str!("scenarios.json");

/// Battery entries reused as result-copy samples, one per taste direction.
const SAMPLE_CASE_IDS: [&str; 6] = [
    "classic_morning_focus",
    "balanced_daily_office",
    "fruity_iced_reset",
    "after_meal_minty_dessert",
    "soft_exotic_probe_a",
    "fruity_aftermeal_cold",
];

/// A named, complete answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub answers: AnswerSet,
}

/// The synthetic battery spanning the archetype space.
pub fn scenarios() -> Result<Vec<Scenario>, AuditError> {
    Ok(serde_json::from_str(SCENARIO_DOCUMENT)?)
}

pub fn sample_cases() -> Result<Vec<Scenario>, AuditError> {
    Ok(scenarios()?
        .into_iter()
        .filter(|scenario| SAMPLE_CASE_IDS.contains(&scenario.id.as_str()))
        .collect())
}
