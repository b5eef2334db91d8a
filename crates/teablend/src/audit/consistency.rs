//! Static wiring check between the question bank, the signal map and the
//! tea affinity tables.

use super::{AuditStatus, Finding, Severity, SeverityCount};
use crate::catalog::{Catalog, PreferenceSignal};
use crate::engine::ARCHETYPES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub status: AuditStatus,
    pub declared_keys: Vec<String>,
    pub used_keys: Vec<String>,
    pub map_keys: Vec<String>,
    pub map_targets: Vec<String>,
    pub preference_keys: Vec<String>,
    pub affinity_keys: Vec<String>,
    /// Preference signals the archetype copy on the result page speaks to.
    pub content_signal_keys: Vec<String>,
    pub finding_count: usize,
    pub severity_count: SeverityCount,
    pub findings: Vec<Finding>,
}

impl ConsistencyReport {
    pub fn high_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::High)
    }
}

fn difference<'a>(source: &'a BTreeSet<String>, target: &'a BTreeSet<String>) -> Vec<&'a String> {
    source.difference(target).collect()
}

fn owned(keys: &BTreeSet<String>) -> Vec<String> {
    keys.iter().cloned().collect()
}

fn content_signal_keys() -> BTreeSet<String> {
    ARCHETYPES
        .iter()
        .flat_map(|archetype| archetype.signal_weights.iter())
        .map(|(signal, _)| signal.as_str().to_string())
        .collect()
}

/// Informational only; an empty reference set means there is no content to
/// compare against.
fn content_gaps(preference: &BTreeSet<String>, referenced: &BTreeSet<String>) -> Vec<Finding> {
    if referenced.is_empty() {
        return Vec::new();
    }

    difference(preference, referenced)
        .into_iter()
        .map(|key| {
            Finding::new(
                Severity::Low,
                "recommendation-content-gap",
                format!("preference signal '{key}' is not referenced by any archetype's result copy"),
            )
        })
        .collect()
}

pub fn run_consistency_audit(catalog: &Catalog) -> ConsistencyReport {
    let declared: BTreeSet<String> = catalog.profile_signal_keys.iter().cloned().collect();
    let used: BTreeSet<String> = catalog
        .questions
        .iter()
        .flat_map(|question| &question.options)
        .flat_map(|option| option.profile_signals.keys().cloned())
        .collect();
    let map_keys: BTreeSet<String> = catalog.signal_map.keys().cloned().collect();
    let map_targets: BTreeSet<String> = catalog.signal_map.values().cloned().collect();
    let preference: BTreeSet<String> = PreferenceSignal::ALL
        .iter()
        .map(|signal| signal.as_str().to_string())
        .collect();
    let affinity: BTreeSet<String> = catalog
        .teas
        .iter()
        .flat_map(|tea| tea.affinity_entries().map(|(key, _)| key.to_string()))
        .collect();

    let mut findings = Vec::new();

    for key in difference(&used, &map_keys) {
        findings.push(Finding::new(
            Severity::High,
            "missing-map",
            format!("an option uses profile signal '{key}' but the signal map has no entry for it"),
        ));
    }

    for key in difference(&map_targets, &preference) {
        findings.push(Finding::new(
            Severity::High,
            "missing-preference",
            format!("the signal map targets '{key}', which is not a preference signal"),
        ));
    }

    for key in difference(&declared, &used) {
        findings.push(Finding::new(
            Severity::Medium,
            "dead-question-key",
            format!("profile signal '{key}' is declared but no option uses it"),
        ));
    }

    for key in difference(&preference, &affinity) {
        findings.push(Finding::new(
            Severity::Medium,
            "dead-preference-key",
            format!("preference signal '{key}' has no affinity weight on any tea"),
        ));
    }

    for key in difference(&affinity, &preference) {
        findings.push(Finding::new(
            Severity::High,
            "dead-calculator-key",
            format!("affinity key '{key}' is not a preference signal"),
        ));
    }

    for rule in &catalog.signal_rules {
        let location = format!("{}/{}", rule.question, rule.option);
        match catalog.question(&rule.question) {
            None => findings.push(Finding::new(
                Severity::High,
                "invalid-signal-rule",
                format!("signal rule {location} names an unknown question"),
            )),
            Some(question) if question.option(&rule.option).is_none() => {
                findings.push(Finding::new(
                    Severity::High,
                    "invalid-signal-rule",
                    format!("signal rule {location} names an unknown option"),
                ))
            }
            Some(_) => {}
        }
        for key in rule.deltas.keys() {
            if !preference.contains(key) {
                findings.push(Finding::new(
                    Severity::High,
                    "invalid-signal-rule",
                    format!("signal rule {location} adds to '{key}', which is not a preference signal"),
                ));
            }
        }
    }

    let producible: BTreeSet<String> = used
        .iter()
        .filter_map(|key| catalog.signal_map.get(key).cloned())
        .chain(
            catalog
                .signal_rules
                .iter()
                .flat_map(|rule| rule.deltas.keys().cloned()),
        )
        .collect();
    for key in difference(&preference, &producible) {
        findings.push(Finding::new(
            Severity::Medium,
            "unproduced-preference-key",
            format!("preference signal '{key}' cannot be produced by any option or signal rule"),
        ));
    }

    let content = content_signal_keys();
    findings.extend(content_gaps(&preference, &content));

    findings.sort_by_key(|finding| finding.severity);
    let severity_count = SeverityCount::tally(findings.iter().map(|finding| finding.severity));
    let status = severity_count.status();

    info!(
        status = ?status,
        high = severity_count.high,
        medium = severity_count.medium,
        low = severity_count.low,
        "consistency audit finished"
    );

    ConsistencyReport {
        status,
        declared_keys: owned(&declared),
        used_keys: owned(&used),
        map_keys: owned(&map_keys),
        map_targets: owned(&map_targets),
        preference_keys: owned(&preference),
        affinity_keys: owned(&affinity),
        content_signal_keys: owned(&content),
        finding_count: findings.len(),
        severity_count,
        findings,
    }
}
