use super::archetype::{select_archetype, ArchetypeMatch};
use super::config::EngineConfig;
use crate::answers::AnswerSet;
use crate::catalog::{Catalog, PreferenceSignal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A preference signal surfaced to the result page as an explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationSignal {
    pub key: PreferenceSignal,
    pub score: u8,
    pub label: String,
    pub description: String,
}

impl ExplanationSignal {
    fn new(key: PreferenceSignal, score: u8) -> Self {
        Self {
            key,
            score,
            label: key.label().to_string(),
            description: key.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub signal_scores: BTreeMap<PreferenceSignal, u8>,
    pub archetype: ArchetypeMatch,
    pub top_signals: Vec<ExplanationSignal>,
}

impl ProfileAnalysis {
    /// The first `count` explanation signals, for call sites that show fewer.
    pub fn leading_signals(&self, count: usize) -> &[ExplanationSignal] {
        &self.top_signals[..count.min(self.top_signals.len())]
    }

    pub fn score(&self, signal: PreferenceSignal) -> u8 {
        self.signal_scores.get(&signal).copied().unwrap_or(0)
    }
}

/// Raw signal totals before normalization.
pub(crate) struct SignalTally {
    pub(crate) totals: BTreeMap<PreferenceSignal, f64>,
    pub(crate) selected_options: usize,
}

pub(crate) fn tally_signals(catalog: &Catalog, answers: &AnswerSet) -> SignalTally {
    let mut totals: BTreeMap<PreferenceSignal, f64> = PreferenceSignal::ALL
        .into_iter()
        .map(|signal| (signal, 0.0))
        .collect();
    let mut selected_options = 0;

    for question in &catalog.questions {
        for value in answers.selected(&question.id) {
            let Some(option) = question.option(value) else {
                continue;
            };
            selected_options += 1;

            for (key, amount) in &option.profile_signals {
                if let Some(signal) = catalog.map_signal(key) {
                    *totals.entry(signal).or_insert(0.0) += amount;
                }
            }

            for rule in catalog.rules_for(&question.id, value) {
                for (key, delta) in &rule.deltas {
                    if let Some(signal) = PreferenceSignal::from_key(key) {
                        *totals.entry(signal).or_insert(0.0) += delta;
                    }
                }
            }
        }
    }

    SignalTally {
        totals,
        selected_options,
    }
}

pub(crate) fn normalize_signals(
    tally: &SignalTally,
    config: &EngineConfig,
) -> BTreeMap<PreferenceSignal, u8> {
    let base = (tally.selected_options as f64 * config.normalization_multiplier).max(1.0);

    tally
        .totals
        .iter()
        .map(|(signal, total)| {
            let ratio = total / base;
            let score = ((ratio + config.signal_floor) * 100.0).round().clamp(0.0, 100.0);
            (*signal, score as u8)
        })
        .collect()
}

/// Signals ordered by score, ties by key, truncated to `count`.
pub(crate) fn explanation_signals(
    scores: &BTreeMap<PreferenceSignal, u8>,
    count: usize,
) -> Vec<ExplanationSignal> {
    let mut ranked: Vec<(PreferenceSignal, u8)> =
        scores.iter().map(|(signal, score)| (*signal, *score)).collect();
    ranked.sort_by(|(a_key, a_score), (b_key, b_score)| {
        b_score
            .cmp(a_score)
            .then_with(|| a_key.as_str().cmp(b_key.as_str()))
    });

    ranked
        .into_iter()
        .take(count)
        .map(|(signal, score)| ExplanationSignal::new(signal, score))
        .collect()
}

pub(crate) fn analyze(
    catalog: &Catalog,
    config: &EngineConfig,
    answers: &AnswerSet,
) -> (ProfileAnalysis, usize) {
    let tally = tally_signals(catalog, answers);
    let signal_scores = normalize_signals(&tally, config);
    let archetype = select_archetype(&signal_scores);
    let top_signals = explanation_signals(&signal_scores, config.explanation_signal_count);

    (
        ProfileAnalysis {
            signal_scores,
            archetype,
            top_signals,
        },
        tally.selected_options,
    )
}
