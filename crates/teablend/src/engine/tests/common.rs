use serde_json::{json, Value};

use crate::answers::AnswerSet;
use crate::catalog::Catalog;
use crate::engine::{EngineConfig, RecommendationEngine};

pub(super) fn bundled() -> &'static Catalog {
    Catalog::bundled().expect("bundled catalog")
}

pub(super) fn engine() -> RecommendationEngine<'static> {
    RecommendationEngine::new(bundled(), EngineConfig::default())
}

pub(super) fn classic_answers() -> AnswerSet {
    AnswerSet::new()
        .single("mood", "calm_focus")
        .multiple("aroma", ["black_tea_structure", "cacao_depth"])
        .single("timing", "morning_start")
        .single("situation", "deep_work")
        .single("caffeine", "high_ok")
        .single("temperature", "hot")
        .single("style", "familiar_classic")
        .single("intensity", "strong_character")
        .single("finish", "classic_finish")
}

pub(super) fn soft_daily_answers() -> AnswerSet {
    AnswerSet::new()
        .single("mood", "soft_balance")
        .multiple("aroma", ["herbal_citrus", "light_floral"])
        .single("timing", "day_focus")
        .single("situation", "slow_ritual")
        .single("caffeine", "moderate_ok")
        .single("temperature", "both")
        .single("style", "classic_with_twist")
        .single("intensity", "middle_clean")
        .single("finish", "refresh_soft")
}

pub(super) fn fruity_answers() -> AnswerSet {
    AnswerSet::new()
        .single("mood", "clear_refresh")
        .multiple("aroma", ["fruity_bright", "light_floral"])
        .single("timing", "day_focus")
        .single("situation", "short_reset")
        .single("caffeine", "low_prefer")
        .single("temperature", "iced")
        .single("style", "new_discovery")
        .single("intensity", "light_texture")
        .single("finish", "refresh_finish")
}

fn tea(id: &str) -> Value {
    json!({
        "id": id,
        "name": id.to_uppercase(),
        "subtitle": format!("{id} subtitle"),
        "core_description": format!("{id} description."),
        "signal_affinity": {}
    })
}

/// Four teas `a`..`d` and a single `pick` question whose options carry the
/// given per-tea weights and base signals.
pub(super) fn weighted_catalog(options: &[(&str, [f64; 4], Value)]) -> Catalog {
    let ids = ["a", "b", "c", "d"];
    let options: Vec<Value> = options
        .iter()
        .map(|(value, weights, signals)| {
            let weights: serde_json::Map<String, Value> = ids
                .iter()
                .zip(weights)
                .map(|(id, weight)| (id.to_string(), json!(weight)))
                .collect();
            json!({
                "label": value,
                "value": value,
                "weights": weights,
                "profile_signals": signals
            })
        })
        .collect();

    let document = json!({
        "teas": ids.iter().map(|id| tea(id)).collect::<Vec<_>>(),
        "profile_signal_keys": ["fruity", "desserty"],
        "signal_map": { "fruity": "fruity", "desserty": "dessert_like" },
        "questions": [
            {
                "id": "pick",
                "axis": "aroma",
                "title": "Pick",
                "kind": "multiple",
                "options": options
            }
        ]
    });

    Catalog::from_json(&document.to_string()).expect("synthetic catalog")
}
