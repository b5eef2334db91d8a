use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a blend in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeaId(pub String);

impl TeaId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeaId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Thematic group a question belongs to. Declaration order is the order
/// axes are walked when composing result copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionAxis {
    Mood,
    Aroma,
    Timing,
    Situation,
    Temperature,
    Caffeine,
    Style,
    Intensity,
    Finish,
}

impl QuestionAxis {
    pub const ALL: [QuestionAxis; 9] = [
        QuestionAxis::Mood,
        QuestionAxis::Aroma,
        QuestionAxis::Timing,
        QuestionAxis::Situation,
        QuestionAxis::Temperature,
        QuestionAxis::Caffeine,
        QuestionAxis::Style,
        QuestionAxis::Intensity,
        QuestionAxis::Finish,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionAxis::Mood => "mood",
            QuestionAxis::Aroma => "aroma",
            QuestionAxis::Timing => "timing",
            QuestionAxis::Situation => "situation",
            QuestionAxis::Temperature => "temperature",
            QuestionAxis::Caffeine => "caffeine",
            QuestionAxis::Style => "style",
            QuestionAxis::Intensity => "intensity",
            QuestionAxis::Finish => "finish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Single,
    Multiple,
}

/// One selectable answer and everything it contributes to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub label: String,
    pub value: String,
    /// Signed contribution per tea. Must cover every tea in the catalog.
    pub weights: BTreeMap<TeaId, f64>,
    /// Base profile-signal contributions, resolved through the catalog's signal map.
    #[serde(default)]
    pub profile_signals: BTreeMap<String, f64>,
}

impl QuestionOption {
    pub fn weight_for(&self, tea: &TeaId) -> f64 {
        self.weights.get(tea).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub axis: QuestionAxis,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub kind: QuestionKind,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

/// Catalog entry for a blend: presentation copy plus its signal affinity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tea {
    pub id: TeaId,
    pub name: String,
    pub subtitle: String,
    pub core_description: String,
    #[serde(default)]
    pub flavor_keywords: Vec<String>,
    #[serde(default)]
    pub timings: Vec<String>,
    #[serde(default)]
    pub situations: Vec<String>,
    #[serde(default)]
    pub axis_reasons: BTreeMap<QuestionAxis, String>,
    /// Preference signal key to weight. `None` means the table was never
    /// declared, which fails catalog validation; an empty table is valid.
    pub signal_affinity: Option<BTreeMap<String, f64>>,
}

impl Tea {
    pub fn affinity_entries(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.signal_affinity
            .iter()
            .flat_map(|table| table.iter())
            .map(|(key, weight)| (key.as_str(), *weight))
    }
}

/// Supplementary signal deltas applied when a specific option is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRule {
    pub question: String,
    pub option: String,
    pub deltas: BTreeMap<String, f64>,
}
