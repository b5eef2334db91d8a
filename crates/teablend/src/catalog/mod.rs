//! Static tea catalog and question bank.
//!
//! The bundled document is embedded at compile time and parsed once per
//! process. Structural problems are hard errors at load time; anything that
//! merely leaves a signal unwired is left for the consistency audit.

mod domain;
mod signals;

pub use domain::{
    Question, QuestionAxis, QuestionKind, QuestionOption, SignalRule, Tea, TeaId,
};
pub use signals::PreferenceSignal;

use crate::answers::AnswerSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

const BUNDLED_DOCUMENT: &str = include_str!("bundled.json");

static BUNDLED: OnceLock<Catalog> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read catalog document: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog must define at least two teas, found {0}")]
    TooFewTeas(usize),
    #[error("tea id '{0}' is declared more than once")]
    DuplicateTea(TeaId),
    #[error("question id '{0}' is declared more than once")]
    DuplicateQuestion(String),
    #[error("question '{0}' has no options")]
    EmptyQuestion(String),
    #[error("question '{question}' repeats option value '{value}'")]
    DuplicateOption { question: String, value: String },
    #[error("tea '{0}' does not declare a signal affinity table")]
    MissingAffinityTable(TeaId),
    #[error("option '{question}/{value}' has no weight for tea '{tea}'")]
    MissingWeight {
        question: String,
        value: String,
        tea: TeaId,
    },
}

/// Immutable catalog: the candidate teas, the quiz, and the wiring between
/// option-level profile signals and the analyzer's preference signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub teas: Vec<Tea>,
    /// Declared base profile-signal keys options may reference.
    pub profile_signal_keys: Vec<String>,
    /// Base profile-signal key to preference signal key.
    pub signal_map: BTreeMap<String, String>,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub signal_rules: Vec<SignalRule>,
}

impl Catalog {
    /// Catalog shipped with the crate, parsed on first use.
    pub fn bundled() -> Result<&'static Catalog, CatalogError> {
        if let Some(catalog) = BUNDLED.get() {
            return Ok(catalog);
        }

        let catalog = Self::from_json(BUNDLED_DOCUMENT)?;
        Ok(BUNDLED.get_or_init(|| catalog))
    }

    pub fn from_json(document: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(document)?;
        catalog.validate()?;
        info!(
            teas = catalog.teas.len(),
            questions = catalog.questions.len(),
            rules = catalog.signal_rules.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CatalogError> {
        let mut document = String::new();
        reader.read_to_string(&mut document)?;
        Self::from_json(&document)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Structural integrity checks the scorer relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.teas.len() < 2 {
            return Err(CatalogError::TooFewTeas(self.teas.len()));
        }

        let mut tea_ids = BTreeSet::new();
        for tea in &self.teas {
            if !tea_ids.insert(&tea.id) {
                return Err(CatalogError::DuplicateTea(tea.id.clone()));
            }
            if tea.signal_affinity.is_none() {
                return Err(CatalogError::MissingAffinityTable(tea.id.clone()));
            }
        }

        let mut question_ids = BTreeSet::new();
        for question in &self.questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(CatalogError::EmptyQuestion(question.id.clone()));
            }

            let mut values = BTreeSet::new();
            for option in &question.options {
                if !values.insert(option.value.as_str()) {
                    return Err(CatalogError::DuplicateOption {
                        question: question.id.clone(),
                        value: option.value.clone(),
                    });
                }
                if let Some(tea) = self
                    .teas
                    .iter()
                    .find(|tea| !option.weights.contains_key(&tea.id))
                {
                    return Err(CatalogError::MissingWeight {
                        question: question.id.clone(),
                        value: option.value.clone(),
                        tea: tea.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn tea(&self, id: &TeaId) -> Option<&Tea> {
        self.teas.iter().find(|tea| &tea.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn option(&self, question_id: &str, value: &str) -> Option<&QuestionOption> {
        self.question(question_id)?.option(value)
    }

    /// Resolves a base profile-signal key to the preference signal it feeds.
    pub fn map_signal(&self, base_key: &str) -> Option<PreferenceSignal> {
        self.signal_map
            .get(base_key)
            .and_then(|target| PreferenceSignal::from_key(target))
    }

    pub fn rules_for<'a>(
        &'a self,
        question_id: &'a str,
        value: &'a str,
    ) -> impl Iterator<Item = &'a SignalRule> + 'a {
        self.signal_rules
            .iter()
            .filter(move |rule| rule.question == question_id && rule.option == value)
    }

    /// Display labels of the recognized options selected for every question.
    pub fn answer_labels(&self, answers: &AnswerSet) -> BTreeMap<String, Vec<String>> {
        self.questions
            .iter()
            .map(|question| {
                let labels = answers
                    .selected(&question.id)
                    .iter()
                    .filter_map(|value| question.option(value))
                    .map(|option| option.label.clone())
                    .collect();
                (question.id.clone(), labels)
            })
            .collect()
    }
}
