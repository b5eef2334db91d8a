//! Result-page copy composed from the top recommendation.

use super::Recommendation;
use crate::catalog::{Catalog, QuestionAxis, TeaId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How many answered axes contribute a reason paragraph.
const AXIS_REASON_LIMIT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultNarrative {
    pub tea_id: TeaId,
    pub headline: String,
    pub paragraphs: Vec<String>,
}

impl ResultNarrative {
    pub fn full_text(&self) -> String {
        std::iter::once(self.headline.as_str())
            .chain(self.paragraphs.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Axes with at least one recognized selection, in canonical order.
fn answered_axes(catalog: &Catalog, recommendation: &Recommendation) -> Vec<QuestionAxis> {
    let answered: BTreeSet<QuestionAxis> = catalog
        .questions
        .iter()
        .filter(|question| {
            recommendation
                .answers
                .selected(&question.id)
                .iter()
                .any(|value| question.option(value).is_some())
        })
        .map(|question| question.axis)
        .collect();

    QuestionAxis::ALL
        .into_iter()
        .filter(|axis| answered.contains(axis))
        .collect()
}

/// Builds the copy for the top-ranked tea. `None` only when the
/// recommendation is empty or names a tea the catalog does not know.
pub fn compose(catalog: &Catalog, recommendation: &Recommendation) -> Option<ResultNarrative> {
    let top = recommendation.top_tea()?;
    let tea = catalog.tea(&top.id)?;

    let mut paragraphs = vec![tea.core_description.clone()];

    paragraphs.extend(
        answered_axes(catalog, recommendation)
            .into_iter()
            .take(AXIS_REASON_LIMIT)
            .filter_map(|axis| tea.axis_reasons.get(&axis).cloned()),
    );

    if let Some(signal) = recommendation.analysis.top_signals.first() {
        paragraphs.push(format!(
            "{} came through strongly, which lines up well with the direction of {}.",
            signal.label, tea.name
        ));
    }

    let archetype = &recommendation.analysis.archetype;
    paragraphs.push(format!(
        "Taste type: {} · {}",
        archetype.display_name, archetype.description
    ));

    Some(ResultNarrative {
        tea_id: tea.id.clone(),
        headline: format!("{}: {}", tea.name, tea.subtitle),
        paragraphs,
    })
}
