use super::config::EngineConfig;
use crate::answers::AnswerSet;
use crate::catalog::{Catalog, PreferenceSignal, QuestionAxis, TeaId};
use std::collections::BTreeMap;

/// Every intermediate score the ranking step needs for one tea.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TeaBreakdown {
    pub(crate) id: TeaId,
    pub(crate) name: String,
    /// Blended direct score shifted so the lowest tea sits at zero.
    pub(crate) base: f64,
    /// Profile-affinity score shifted the same way.
    pub(crate) affinity: f64,
    pub(crate) adjusted: f64,
}

struct AxisTally {
    scores: Vec<f64>,
    answers: usize,
}

/// Sums option weights per tea, overall and per axis.
fn direct_scores(catalog: &Catalog, answers: &AnswerSet) -> (Vec<f64>, BTreeMap<QuestionAxis, AxisTally>) {
    let tea_count = catalog.teas.len();
    let mut direct = vec![0.0; tea_count];
    let mut axes: BTreeMap<QuestionAxis, AxisTally> = BTreeMap::new();

    for question in &catalog.questions {
        for value in answers.selected(&question.id) {
            let Some(option) = question.option(value) else {
                continue;
            };

            let axis = axes.entry(question.axis).or_insert_with(|| AxisTally {
                scores: vec![0.0; tea_count],
                answers: 0,
            });
            axis.answers += 1;

            for (index, tea) in catalog.teas.iter().enumerate() {
                let weight = option.weight_for(&tea.id);
                direct[index] += weight;
                axis.scores[index] += weight;
            }
        }
    }

    (direct, axes)
}

/// Mixes the raw linear sum with per-axis averages so a single axis with
/// many selections cannot dominate.
/// Limits `value` to `[-limit, limit]`. A negative limit counts by its
/// magnitude and a NaN limit leaves the value unbounded.
fn bound(value: f64, limit: f64) -> f64 {
    let limit = limit.abs();
    value.max(-limit).min(limit)
}

fn blend_axes(
    direct: &[f64],
    axes: &BTreeMap<QuestionAxis, AxisTally>,
    config: &EngineConfig,
) -> Vec<f64> {
    direct
        .iter()
        .enumerate()
        .map(|(index, direct_score)| {
            let axis_score: f64 = axes
                .values()
                .filter(|axis| axis.answers > 0)
                .map(|axis| bound(axis.scores[index] / axis.answers as f64, config.axis_clamp))
                .sum();
            direct_score * (1.0 - config.axis_blend_weight) + axis_score * config.axis_blend_weight
        })
        .collect()
}

fn affinity_scores(catalog: &Catalog, signal_scores: &BTreeMap<PreferenceSignal, u8>) -> Vec<f64> {
    catalog
        .teas
        .iter()
        .map(|tea| {
            tea.affinity_entries()
                .filter_map(|(key, weight)| {
                    let signal = PreferenceSignal::from_key(key)?;
                    let score = signal_scores.get(&signal).copied().unwrap_or(0);
                    Some(weight * f64::from(score))
                })
                .sum()
        })
        .collect()
}

/// Raises every value by the magnitude of the most negative one.
pub(crate) fn shift_non_negative(values: &mut [f64]) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let shift = (-min).max(0.0);
    for value in values.iter_mut() {
        *value += shift;
    }
}

pub(crate) fn score_teas(
    catalog: &Catalog,
    config: &EngineConfig,
    answers: &AnswerSet,
    signal_scores: &BTreeMap<PreferenceSignal, u8>,
) -> Vec<TeaBreakdown> {
    let (direct, axes) = direct_scores(catalog, answers);

    let mut base = blend_axes(&direct, &axes, config);
    shift_non_negative(&mut base);

    let mut affinity = affinity_scores(catalog, signal_scores);
    shift_non_negative(&mut affinity);

    catalog
        .teas
        .iter()
        .zip(base)
        .zip(affinity)
        .map(|((tea, base), affinity)| TeaBreakdown {
            id: tea.id.clone(),
            name: tea.name.clone(),
            base,
            affinity,
            adjusted: base * (1.0 - config.affinity_weight) + affinity * config.affinity_weight,
        })
        .collect()
}
