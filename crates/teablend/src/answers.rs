//! Quiz answers as collected by the front end.

use crate::catalog::{Catalog, QuestionKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A question's answer: one option value, or any number of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    pub fn values(&self) -> &[String] {
        match self {
            Answer::Single(value) => std::slice::from_ref(value),
            Answer::Multiple(values) => values,
        }
    }
}

/// Question id to answer. Missing questions and empty selections contribute
/// nothing to scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, Answer>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(mut self, question: &str, value: &str) -> Self {
        self.insert(question, Answer::Single(value.to_string()));
        self
    }

    pub fn multiple<I, S>(mut self, question: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.insert(question, Answer::Multiple(values));
        self
    }

    pub fn insert(&mut self, question: &str, answer: Answer) {
        self.0.insert(question.to_string(), answer);
    }

    pub fn remove(&mut self, question: &str) -> Option<Answer> {
        self.0.remove(question)
    }

    pub fn get(&self, question: &str) -> Option<&Answer> {
        self.0.get(question)
    }

    /// Selected values for a question; empty when unanswered.
    pub fn selected(&self, question: &str) -> &[String] {
        self.0.get(question).map(Answer::values).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.0.iter().map(|(question, answer)| (question.as_str(), answer))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses `question=value` or `question=value,value` pairs. A comma makes
    /// the answer a multiple selection.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, AnswerValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut answers = AnswerSet::new();
        let mut issues = Vec::new();

        for pair in pairs {
            let raw = pair.as_ref();
            let Some((question, value)) = raw.split_once('=') else {
                issues.push(AnswerIssue::MalformedPair {
                    raw: raw.to_string(),
                });
                continue;
            };

            let question = question.trim();
            if question.is_empty() {
                issues.push(AnswerIssue::MalformedPair {
                    raw: raw.to_string(),
                });
                continue;
            }

            let answer = if value.contains(',') {
                Answer::Multiple(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            } else {
                Answer::Single(value.trim().to_string())
            };
            answers.insert(question, answer);
        }

        if issues.is_empty() {
            Ok(answers)
        } else {
            Err(AnswerValidationError { issues })
        }
    }

    /// Strict check of a final answer set against the question bank. The
    /// engine never calls this; it scores whatever it is given.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), AnswerValidationError> {
        let mut issues = Vec::new();

        for question in &catalog.questions {
            let Some(answer) = self.get(&question.id) else {
                issues.push(AnswerIssue::MissingAnswer {
                    question: question.id.clone(),
                });
                continue;
            };

            let values = answer.values();
            if values.is_empty() {
                issues.push(AnswerIssue::EmptySelection {
                    question: question.id.clone(),
                });
            }
            if question.kind == QuestionKind::Single && values.len() > 1 {
                issues.push(AnswerIssue::TooManyValues {
                    question: question.id.clone(),
                    count: values.len(),
                });
            }
            for value in values {
                if question.option(value).is_none() {
                    issues.push(AnswerIssue::UnknownOption {
                        question: question.id.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        for (question, _) in self.iter() {
            if catalog.question(question).is_none() {
                issues.push(AnswerIssue::UnknownQuestion {
                    question: question.to_string(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(AnswerValidationError { issues })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerIssue {
    MalformedPair { raw: String },
    MissingAnswer { question: String },
    EmptySelection { question: String },
    TooManyValues { question: String, count: usize },
    UnknownOption { question: String, value: String },
    UnknownQuestion { question: String },
}

impl fmt::Display for AnswerIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerIssue::MalformedPair { raw } => {
                write!(f, "'{raw}' must look like question=value[,value]")
            }
            AnswerIssue::MissingAnswer { question } => {
                write!(f, "missing answer for question '{question}'")
            }
            AnswerIssue::EmptySelection { question } => {
                write!(f, "question '{question}' requires at least one selection")
            }
            AnswerIssue::TooManyValues { question, count } => {
                write!(f, "question '{question}' takes one value, got {count}")
            }
            AnswerIssue::UnknownOption { question, value } => {
                write!(f, "invalid answer '{value}' for question '{question}'")
            }
            AnswerIssue::UnknownQuestion { question } => {
                write!(f, "unknown question '{question}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("answer set failed validation: {}", join_issues(.issues))]
pub struct AnswerValidationError {
    pub issues: Vec<AnswerIssue>,
}

fn join_issues(issues: &[AnswerIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
