//! Health-claim screening for user-visible copy.

use super::{AuditStatus, Scenario, Severity, SeverityCount};
use crate::catalog::{Catalog, PreferenceSignal};
use crate::engine::{narrative, RecommendationEngine, ARCHETYPES};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::info;

const SNIPPET_CHARS: usize = 220;

/// Functional or medical claims.
static HIGH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(cure[sd]?|treat(?:s|ed|ing|ment)?|detox\w*|anti-?inflammatory|antiviral|cleanse[sd]?|heal(?:s|ed|ing)?|boost\w*|improv\w*|relie(?:f|ve[sd]?))\b",
    )
    .expect("high-tier pattern compiles")
});

/// Body-system vocabulary.
static MEDIUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(immun\w*|respiratory|metabolism|blood\s+sugar|blood\s+pressure|fat\s*burn\w*)\b",
    )
    .expect("medium-tier pattern compiles")
});

/// Soft wellness framing.
static LOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(health\w*|wellness|recovery|effects?)\b").expect("low-tier pattern compiles")
});

fn tiers() -> [(Severity, &'static Regex); 3] {
    [
        (Severity::High, &*HIGH_RE),
        (Severity::Medium, &*MEDIUM_RE),
        (Severity::Low, &*LOW_RE),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyHit {
    pub location: String,
    pub severity: Severity,
    pub keyword: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopySafetyReport {
    pub status: AuditStatus,
    pub scanned_strings: usize,
    pub issue_count: usize,
    pub severity_count: SeverityCount,
    pub hits: Vec<CopyHit>,
}

/// Narrative check for one sample case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCopyRow {
    pub id: String,
    pub top_tea: String,
    pub second_tea: String,
    pub archetype: String,
    pub has_health_claim: bool,
    pub sample: String,
}

fn snippet(text: &str) -> String {
    text.trim().chars().take(SNIPPET_CHARS).collect()
}

/// Every tier match in `text`.
pub fn scan_text(location: &str, text: &str) -> Vec<CopyHit> {
    tiers()
        .into_iter()
        .flat_map(|(severity, regex)| {
            regex.find_iter(text).map(move |found| CopyHit {
                location: location.to_string(),
                severity,
                keyword: found.as_str().to_lowercase(),
                snippet: snippet(text),
            })
        })
        .collect()
}

/// Whether `text` makes a high or medium tier claim.
pub fn has_health_claim(text: &str) -> bool {
    HIGH_RE.is_match(text) || MEDIUM_RE.is_match(text)
}

fn visible_strings(catalog: &Catalog) -> Vec<(String, String)> {
    let mut strings = Vec::new();

    for tea in &catalog.teas {
        let at = |field: &str| format!("tea:{}/{field}", tea.id);
        strings.push((at("name"), tea.name.clone()));
        strings.push((at("subtitle"), tea.subtitle.clone()));
        strings.push((at("core_description"), tea.core_description.clone()));
        for (field, values) in [
            ("flavor_keywords", &tea.flavor_keywords),
            ("timings", &tea.timings),
            ("situations", &tea.situations),
        ] {
            for value in values {
                strings.push((at(field), value.clone()));
            }
        }
        for (axis, reason) in &tea.axis_reasons {
            strings.push((at(&format!("axis_reasons/{}", axis.as_str())), reason.clone()));
        }
    }

    for question in &catalog.questions {
        let at = |field: &str| format!("question:{}/{field}", question.id);
        strings.push((at("title"), question.title.clone()));
        if let Some(subtitle) = &question.subtitle {
            strings.push((at("subtitle"), subtitle.clone()));
        }
        for option in &question.options {
            strings.push((at(&format!("option:{}", option.value)), option.label.clone()));
        }
    }

    for archetype in ARCHETYPES.iter() {
        let at = |field: &str| format!("archetype:{}/{field}", archetype.id.as_str());
        strings.push((at("display_name"), archetype.display_name.to_string()));
        strings.push((at("description"), archetype.one_liner.to_string()));
        strings.push((at("note"), archetype.note.to_string()));
        for value in archetype.traits {
            strings.push((at("traits"), value.to_string()));
        }
    }

    for signal in PreferenceSignal::ALL {
        let at = |field: &str| format!("signal:{}/{field}", signal.as_str());
        strings.push((at("label"), signal.label().to_string()));
        strings.push((at("description"), signal.description().to_string()));
    }

    strings
}

/// Scans catalog copy and the static archetype and signal copy.
pub fn scan_catalog(catalog: &Catalog) -> CopySafetyReport {
    let strings = visible_strings(catalog);
    let mut hits: Vec<CopyHit> = strings
        .iter()
        .flat_map(|(location, text)| scan_text(location, text))
        .collect();
    hits.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.location.cmp(&b.location))
            .then_with(|| a.keyword.cmp(&b.keyword))
    });

    let severity_count = SeverityCount::tally(hits.iter().map(|hit| hit.severity));
    let status = severity_count.status();
    info!(
        scanned = strings.len(),
        hits = hits.len(),
        status = ?status,
        "copy safety scan finished"
    );

    CopySafetyReport {
        status,
        scanned_strings: strings.len(),
        issue_count: hits.len(),
        severity_count,
        hits,
    }
}

/// Composes the result copy for each case and flags health claims.
pub fn check_result_copy(engine: &RecommendationEngine<'_>, cases: &[Scenario]) -> Vec<ResultCopyRow> {
    cases
        .iter()
        .filter_map(|case| {
            let recommendation = engine.recommend(&case.answers);
            let text = narrative::compose(engine.catalog(), &recommendation)?.full_text();
            Some(ResultCopyRow {
                id: case.id.clone(),
                top_tea: recommendation.top_tea()?.id.to_string(),
                second_tea: recommendation.second_tea()?.id.to_string(),
                archetype: recommendation.analysis.archetype.id.as_str().to_string(),
                has_health_claim: has_health_claim(&text),
                sample: snippet(&text),
            })
        })
        .collect()
}
