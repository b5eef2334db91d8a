//! Runs the scorer over the synthetic battery and checks that its picks stay
//! spread across the catalog.

use super::{AuditError, Scenario};
use crate::engine::RecommendationEngine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityThresholds {
    pub max_top1_share: f64,
    pub max_top2_share: f64,
    pub max_pair_share: f64,
    pub min_distinct_top1: usize,
    pub min_distinct_top2: usize,
    pub min_distinct_archetypes: usize,
    pub require_every_tea_top1: bool,
}

impl Default for DiversityThresholds {
    fn default() -> Self {
        Self {
            max_top1_share: 0.5,
            max_top2_share: 0.5,
            max_pair_share: 0.33,
            min_distinct_top1: 3,
            min_distinct_top2: 3,
            min_distinct_archetypes: 4,
            require_every_tea_top1: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityRow {
    pub case_id: String,
    pub top_tea: String,
    pub top_ratio: u32,
    pub second_tea: String,
    pub second_ratio: u32,
    pub archetype: String,
    pub top_signals: Vec<String>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    case_id: &'a str,
    top_tea: &'a str,
    top_ratio: u32,
    second_tea: &'a str,
    second_ratio: u32,
    archetype: &'a str,
    top_signals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityReport {
    pub total_cases: usize,
    pub top1_counts: BTreeMap<String, usize>,
    pub top1_rates: BTreeMap<String, f64>,
    pub top2_counts: BTreeMap<String, usize>,
    pub archetype_counts: BTreeMap<String, usize>,
    pub pair_counts: BTreeMap<String, usize>,
    pub hard_fail: bool,
    pub hard_fail_reasons: Vec<String>,
    pub rows: Vec<DiversityRow>,
}

impl DiversityReport {
    /// Writes one CSV record per scenario; leading signals are `|`-joined.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AuditError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(CsvRow {
                case_id: &row.case_id,
                top_tea: &row.top_tea,
                top_ratio: row.top_ratio,
                second_tea: &row.second_tea,
                second_ratio: row.second_ratio,
                archetype: &row.archetype,
                top_signals: row.top_signals.join("|"),
            })?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

fn increment(counts: &mut BTreeMap<String, usize>, key: String) {
    *counts.entry(key).or_insert(0) += 1;
}

fn max_count(counts: &BTreeMap<String, usize>) -> usize {
    counts.values().copied().max().unwrap_or(0)
}

pub fn run_diversity_audit(
    engine: &RecommendationEngine<'_>,
    scenarios: &[Scenario],
    thresholds: &DiversityThresholds,
) -> Result<DiversityReport, AuditError> {
    if scenarios.is_empty() {
        return Err(AuditError::NoScenarios);
    }
    for scenario in scenarios {
        scenario
            .answers
            .validate(engine.catalog())
            .map_err(|source| {
                warn!(case = %scenario.id, "scenario failed validation");
                AuditError::InvalidScenario {
                    case: scenario.id.clone(),
                    source,
                }
            })?;
    }

    let mut top1_counts = BTreeMap::new();
    let mut top2_counts = BTreeMap::new();
    let mut archetype_counts = BTreeMap::new();
    let mut pair_counts = BTreeMap::new();
    let mut rows = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        let recommendation = engine.recommend(&scenario.answers);
        // Catalog validation guarantees at least two teas.
        let (Some(top), Some(second)) = (recommendation.top_tea(), recommendation.second_tea())
        else {
            continue;
        };
        let archetype = recommendation.analysis.archetype.id.as_str().to_string();

        increment(&mut top1_counts, top.id.to_string());
        increment(&mut top2_counts, second.id.to_string());
        increment(&mut archetype_counts, archetype.clone());
        increment(&mut pair_counts, format!("{}->{}", top.id, second.id));

        rows.push(DiversityRow {
            case_id: scenario.id.clone(),
            top_tea: top.id.to_string(),
            top_ratio: top.ratio,
            second_tea: second.id.to_string(),
            second_ratio: second.ratio,
            archetype,
            top_signals: recommendation
                .analysis
                .leading_signals(2)
                .iter()
                .map(|signal| signal.key.as_str().to_string())
                .collect(),
        });
    }

    let total = scenarios.len();
    let share = |fraction: f64| total as f64 * fraction;

    let top1_rates = top1_counts
        .iter()
        .map(|(tea, count)| {
            let rate = (*count as f64 / total as f64 * 1000.0).round() / 1000.0;
            (tea.clone(), rate)
        })
        .collect();

    let starved = engine
        .catalog()
        .teas
        .iter()
        .any(|tea| !top1_counts.contains_key(tea.id.as_str()));

    let mut reasons = Vec::new();
    if max_count(&top1_counts) as f64 > share(thresholds.max_top1_share) {
        reasons.push("top-1 collapse: one tea exceeds the top-1 share limit".to_string());
    }
    if thresholds.require_every_tea_top1 && starved {
        reasons.push("top-1 starvation: a tea never appears as top-1".to_string());
    }
    if max_count(&top2_counts) as f64 > share(thresholds.max_top2_share) {
        reasons.push("top-2 collapse: one tea exceeds the second-pick share limit".to_string());
    }
    if max_count(&pair_counts) as f64 > share(thresholds.max_pair_share) {
        reasons.push("pair lock-in: one top-1 -> top-2 pair exceeds the pair share limit".to_string());
    }
    if top1_counts.len() < thresholds.min_distinct_top1 {
        reasons.push(format!(
            "personalization gap: fewer than {} teas appear as top-1",
            thresholds.min_distinct_top1
        ));
    }
    if top2_counts.len() < thresholds.min_distinct_top2 {
        reasons.push(format!(
            "second-pick diversity: fewer than {} teas appear as top-2",
            thresholds.min_distinct_top2
        ));
    }
    if archetype_counts.len() < thresholds.min_distinct_archetypes {
        reasons.push(format!(
            "archetype diversity: fewer than {} archetypes appear",
            thresholds.min_distinct_archetypes
        ));
    }

    let hard_fail = !reasons.is_empty();
    info!(
        cases = total,
        distinct_top1 = top1_counts.len(),
        distinct_archetypes = archetype_counts.len(),
        hard_fail,
        "diversity audit finished"
    );

    Ok(DiversityReport {
        total_cases: total,
        top1_counts,
        top1_rates,
        top2_counts,
        archetype_counts,
        pair_counts,
        hard_fail,
        hard_fail_reasons: reasons,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerSet;
    use crate::audit::scenarios;
    use crate::catalog::Catalog;
    use crate::engine::EngineConfig;

    fn engine() -> RecommendationEngine<'static> {
        RecommendationEngine::new(
            Catalog::bundled().expect("bundled catalog"),
            EngineConfig::default(),
        )
    }

    #[test]
    fn bundled_battery_has_no_hard_failures() {
        let battery = scenarios().expect("battery");
        let report = run_diversity_audit(&engine(), &battery, &DiversityThresholds::default())
            .expect("audit runs");

        assert!(!report.hard_fail, "{:?}", report.hard_fail_reasons);
        assert_eq!(report.total_cases, 20);
        assert_eq!(report.top1_counts.len(), 4);
        assert!(report.archetype_counts.len() >= 4);
        assert_eq!(report.top1_counts.get("asian_gold"), Some(&7));
        assert_eq!(report.top1_rates.get("asian_gold"), Some(&0.35));
        assert_eq!(report.pair_counts.get("asian_gold->hibiscus_fruit"), Some(&6));
    }

    #[test]
    fn invalid_scenario_aborts_the_audit() {
        let broken = Scenario {
            id: "half_answered".to_string(),
            answers: AnswerSet::new().single("mood", "calm_focus"),
        };

        match run_diversity_audit(&engine(), &[broken], &DiversityThresholds::default()) {
            Err(AuditError::InvalidScenario { case, .. }) => assert_eq!(case, "half_answered"),
            other => panic!("expected invalid scenario, got {other:?}"),
        }
    }

    #[test]
    fn collapsed_battery_reports_every_reason() {
        let classic = scenarios()
            .expect("battery")
            .into_iter()
            .find(|scenario| scenario.id == "classic_morning_focus")
            .expect("classic scenario");
        let battery = vec![classic; 5];

        let report = run_diversity_audit(&engine(), &battery, &DiversityThresholds::default())
            .expect("audit runs");

        assert!(report.hard_fail);
        assert_eq!(report.hard_fail_reasons.len(), 7);
        assert_eq!(report.top1_rates.get("british_black"), Some(&1.0));
    }

    #[test]
    fn rows_export_as_csv() {
        let battery = scenarios().expect("battery");
        let report = run_diversity_audit(&engine(), &battery[..2], &DiversityThresholds::default())
            .expect("audit runs");

        let mut buffer = Vec::new();
        report.write_csv(&mut buffer).expect("csv");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("case_id,top_tea,top_ratio,second_tea,second_ratio,archetype,top_signals")
        );
        assert_eq!(
            lines.next(),
            Some("classic_morning_focus,british_black,53,minty_chocolat,25,classic_focus,classic|calm_focus")
        );
        assert_eq!(text.lines().count(), 3);
    }
}
