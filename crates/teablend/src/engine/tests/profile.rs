use serde_json::json;

use super::common::*;
use crate::answers::AnswerSet;
use crate::catalog::PreferenceSignal;
use crate::engine::{ArchetypeId, EngineConfig, RecommendationEngine};

#[test]
fn empty_answers_floor_every_signal_at_twenty() {
    let analysis = engine().analyze(&AnswerSet::new());

    assert_eq!(analysis.signal_scores.len(), PreferenceSignal::ALL.len());
    assert!(analysis.signal_scores.values().all(|score| *score == 20));
}

#[test]
fn empty_answers_break_archetype_tie_by_priority() {
    // fruity_refresh and soft_exotic_balance both fit at 99 when every signal is 20.
    let analysis = engine().analyze(&AnswerSet::new());

    assert_eq!(analysis.archetype.id, ArchetypeId::FruityRefresh);
    assert_eq!(analysis.archetype.score, 99.0);
}

#[test]
fn unknown_values_and_empty_selections_count_as_unanswered() {
    let engine = engine();
    let baseline = engine.analyze(&AnswerSet::new());

    let noisy = AnswerSet::new()
        .single("mood", "not_an_option")
        .multiple("aroma", Vec::<String>::new())
        .single("weather", "sunny");

    assert_eq!(engine.analyze(&noisy), baseline);
}

#[test]
fn classic_profile_leads_with_classic_signals() {
    let analysis = engine().analyze(&classic_answers());

    assert_eq!(analysis.archetype.id, ArchetypeId::ClassicFocus);
    let keys: Vec<PreferenceSignal> = analysis.top_signals.iter().map(|signal| signal.key).collect();
    assert_eq!(
        keys,
        vec![
            PreferenceSignal::Classic,
            PreferenceSignal::CalmFocus,
            PreferenceSignal::BlackTeaForward,
            PreferenceSignal::DessertLike,
        ]
    );
    assert_eq!(analysis.score(PreferenceSignal::Classic), 62);
    assert_eq!(analysis.leading_signals(3).len(), 3);
}

#[test]
fn explanation_ties_resolve_alphabetically() {
    // calm_focus and refreshing both land on 28; calm_focus sorts first.
    let answers = soft_daily_answers();

    let analysis = engine().analyze(&answers);

    assert_eq!(analysis.archetype.id, ArchetypeId::SoftExoticBalance);
    assert_eq!(analysis.top_signals[2].key, PreferenceSignal::CalmFocus);
    assert_eq!(analysis.top_signals[3].key, PreferenceSignal::Refreshing);
    assert_eq!(analysis.top_signals[2].score, analysis.top_signals[3].score);
}

#[test]
fn herbal_aroma_leans_toward_soft_exotic() {
    // Mood and herbal aroma rules add 1 + 2 on top of the mapped option signals.
    let answers = soft_daily_answers();

    let analysis = engine().analyze(&answers);

    assert_eq!(analysis.score(PreferenceSignal::SoftExotic), 45);
    assert_eq!(analysis.score(PreferenceSignal::Balanced), 78);
    assert_eq!(analysis.score(PreferenceSignal::IcedFriendly), 24);
    assert_eq!(analysis.archetype.id, ArchetypeId::SoftExoticBalance);
    assert_eq!(analysis.archetype.score, 206.7);
}

#[test]
fn multiple_selection_accumulates_every_option() {
    let engine = engine();
    let single = engine.analyze(&AnswerSet::new().multiple("aroma", ["black_tea_structure"]));
    let double = engine.analyze(
        &AnswerSet::new().multiple("aroma", ["black_tea_structure", "cacao_depth"]),
    );

    assert_eq!(single.score(PreferenceSignal::DessertLike), 20);
    assert_eq!(double.score(PreferenceSignal::DessertLike), 62);
    assert_eq!(single.score(PreferenceSignal::BlackTeaForward), 100);
    assert_eq!(double.score(PreferenceSignal::BlackTeaForward), 83);
}

#[test]
fn signal_rules_add_on_top_of_option_signals() {
    let analysis = engine().analyze(&AnswerSet::new().single("temperature", "iced"));

    // 2 from the option-level refreshing signal, 2 from the iced rule.
    assert_eq!(analysis.score(PreferenceSignal::Refreshing), 100);
    assert_eq!(analysis.score(PreferenceSignal::IcedFriendly), 100);
    assert_eq!(analysis.score(PreferenceSignal::Classic), 20);
}

#[test]
fn equal_archetype_fit_from_answers_uses_priority_list() {
    let catalog = weighted_catalog(&[
        ("both", [1.0, 0.0, 0.0, 0.0], json!({ "fruity": 1, "desserty": 1 })),
        ("fruit", [0.0, 1.0, 0.0, 0.0], json!({ "fruity": 1 })),
        ("cacao", [0.0, 0.0, 1.0, 0.0], json!({ "desserty": 1 })),
    ]);
    let config = EngineConfig {
        signal_floor: 0.0,
        ..EngineConfig::default()
    };
    let engine = RecommendationEngine::new(&catalog, config);

    for answers in [
        AnswerSet::new().multiple("pick", ["both"]),
        AnswerSet::new().multiple("pick", ["fruit", "cacao"]),
    ] {
        let analysis = engine.analyze(&answers);
        assert_eq!(
            analysis.score(PreferenceSignal::Fruity),
            analysis.score(PreferenceSignal::DessertLike)
        );
        // Alphabetical order would pick cool_dessert.
        assert_eq!(analysis.archetype.id, ArchetypeId::FruityRefresh);
    }
}
