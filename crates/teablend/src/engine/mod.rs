//! Preference analysis and tea scoring.
//!
//! Every entry point is a pure function of the catalog, the tuning constants
//! and one answer set. Unknown questions, unknown option values and empty
//! selections contribute nothing; the engine never fails at request time.

mod archetype;
mod config;
pub mod narrative;
mod profile;
mod ranking;
mod scoring;

#[cfg(test)]
mod tests;

pub use archetype::{select_archetype, ArchetypeId, ArchetypeMatch, TeaDirection, ARCHETYPE_PRIORITY};
pub use config::EngineConfig;
pub use narrative::ResultNarrative;
pub use profile::{ExplanationSignal, ProfileAnalysis};

pub(crate) use archetype::ARCHETYPES;

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, TeaId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless engine that applies the tuning constants to an answer set.
#[derive(Debug, Clone)]
pub struct RecommendationEngine<'c> {
    catalog: &'c Catalog,
    config: EngineConfig,
}

impl<'c> RecommendationEngine<'c> {
    pub fn new(catalog: &'c Catalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, answers: &AnswerSet) -> ProfileAnalysis {
        profile::analyze(self.catalog, &self.config, answers).0
    }

    pub fn recommend(&self, answers: &AnswerSet) -> Recommendation {
        let (analysis, selected_options) = profile::analyze(self.catalog, &self.config, answers);
        let breakdowns =
            scoring::score_teas(self.catalog, &self.config, answers, &analysis.signal_scores);
        let ranked = ranking::rank(breakdowns, self.config.affinity_tie_gap);

        let tea_scores: Vec<TeaScore> = ranked
            .into_iter()
            .map(|tea| TeaScore {
                id: tea.breakdown.id,
                name: tea.breakdown.name,
                raw_score: round2(tea.breakdown.base),
                affinity_score: round2(tea.breakdown.affinity),
                adjusted_score: round2(tea.breakdown.adjusted),
                ratio: tea.ratio,
            })
            .collect();

        debug!(
            top_tea = tea_scores.first().map(|tea| tea.id.as_str()).unwrap_or("none"),
            archetype = analysis.archetype.id.as_str(),
            selected_options,
            "recommendation computed"
        );

        Recommendation {
            answers: answers.clone(),
            analysis,
            tea_scores,
        }
    }

    /// Recommendation plus the composed result-page copy.
    pub fn recommend_with_narrative(&self, answers: &AnswerSet) -> (Recommendation, Option<ResultNarrative>) {
        let recommendation = self.recommend(answers);
        let narrative = narrative::compose(self.catalog, &recommendation);
        (recommendation, narrative)
    }
}

/// Per-tea output, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeaScore {
    pub id: TeaId,
    pub name: String,
    /// Axis-blended direct score after the non-negative shift.
    pub raw_score: f64,
    pub affinity_score: f64,
    pub adjusted_score: f64,
    /// Integer share of the blend; the list always sums to 100.
    pub ratio: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub answers: AnswerSet,
    pub analysis: ProfileAnalysis,
    pub tea_scores: Vec<TeaScore>,
}

impl Recommendation {
    pub fn top_tea(&self) -> Option<&TeaScore> {
        self.tea_scores.first()
    }

    pub fn second_tea(&self) -> Option<&TeaScore> {
        self.tea_scores.get(1)
    }

    pub fn ratio_total(&self) -> u32 {
        self.tea_scores.iter().map(|tea| tea.ratio).sum()
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
