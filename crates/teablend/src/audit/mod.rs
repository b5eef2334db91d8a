//! Offline checks over the catalog and the scorer.
//!
//! Each audit is a pure function returning a report value; nothing here
//! touches the filesystem or process state.

pub mod consistency;
pub mod copy_safety;
pub mod diversity;
mod scenarios;

pub use consistency::{run_consistency_audit, ConsistencyReport};
pub use copy_safety::{check_result_copy, scan_catalog, CopyHit, CopySafetyReport, ResultCopyRow};
pub use diversity::{run_diversity_audit, DiversityReport, DiversityRow, DiversityThresholds};
pub use scenarios::{sample_cases, scenarios, Scenario};

use crate::answers::AnswerValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: String,
    pub message: String,
}

impl Finding {
    pub(crate) fn new(severity: Severity, kind: &str, message: String) -> Self {
        Self {
            severity,
            kind: kind.to_string(),
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCount {
    pub(crate) fn tally(severities: impl IntoIterator<Item = Severity>) -> Self {
        let mut count = Self::default();
        for severity in severities {
            match severity {
                Severity::High => count.high += 1,
                Severity::Medium => count.medium += 1,
                Severity::Low => count.low += 1,
            }
        }
        count
    }

    /// Any high-severity entry fails the audit.
    pub fn status(&self) -> AuditStatus {
        if self.high > 0 {
            AuditStatus::Fail
        } else {
            AuditStatus::Pass
        }
    }
}

/// A report together with the time it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stamped<T> {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: T,
}

impl<T> Stamped<T> {
    pub fn now(report: T) -> Self {
        Self {
            generated_at: Utc::now(),
            report,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("scenario '{case}' is not a valid answer set: {source}")]
    InvalidScenario {
        case: String,
        #[source]
        source: AnswerValidationError,
    },
    #[error("scenario battery is empty")]
    NoScenarios,
    #[error("scenario document is malformed: {0}")]
    Scenarios(#[from] serde_json::Error),
    #[error("failed to write audit rows: {0}")]
    Csv(#[from] csv::Error),
}
