use serde_json::json;

use super::common::*;
use crate::answers::AnswerSet;
use crate::catalog::TeaId;
use crate::engine::{EngineConfig, Recommendation, RecommendationEngine};

fn order(recommendation: &Recommendation) -> Vec<&str> {
    recommendation
        .tea_scores
        .iter()
        .map(|tea| tea.id.as_str())
        .collect()
}

fn ratio_of(recommendation: &Recommendation, id: &str) -> u32 {
    recommendation
        .tea_scores
        .iter()
        .find(|tea| tea.id.as_str() == id)
        .map(|tea| tea.ratio)
        .expect("tea present")
}

#[test]
fn empty_answers_are_deterministic_and_sum_to_one_hundred() {
    let engine = engine();
    let first = engine.recommend(&AnswerSet::new());
    let second = engine.recommend(&AnswerSet::new());

    assert_eq!(first, second);
    assert_eq!(first.ratio_total(), 100);
    assert_eq!(
        order(&first),
        vec!["hibiscus_fruit", "minty_chocolat", "asian_gold", "british_black"]
    );
    assert_eq!(ratio_of(&first, "hibiscus_fruit"), 27);
    assert_eq!(ratio_of(&first, "british_black"), 24);
    assert_eq!(ratio_of(&first, "asian_gold"), 24);
    assert!(first
        .tea_scores
        .iter()
        .all(|tea| tea.raw_score == 0.0 && tea.affinity_score >= 0.0));
}

#[test]
fn classic_answers_rank_british_black_first() {
    let recommendation = engine().recommend(&classic_answers());

    assert_eq!(
        order(&recommendation),
        vec!["british_black", "minty_chocolat", "asian_gold", "hibiscus_fruit"]
    );
    assert_eq!(ratio_of(&recommendation, "british_black"), 53);
    assert_eq!(ratio_of(&recommendation, "hibiscus_fruit"), 1);
    assert_eq!(recommendation.ratio_total(), 100);
}

#[test]
fn fruity_answers_rank_hibiscus_first() {
    let recommendation = engine().recommend(&fruity_answers());

    let top = recommendation.top_tea().expect("top tea");
    let second = recommendation.second_tea().expect("second tea");
    assert_eq!(top.id, TeaId::from("hibiscus_fruit"));
    assert_eq!(top.ratio, 51);
    assert_eq!(second.id, TeaId::from("asian_gold"));
    assert_eq!(second.ratio, 28);
}

#[test]
fn scores_are_non_negative_and_sorted() {
    let recommendation = engine().recommend(&classic_answers());

    for tea in &recommendation.tea_scores {
        assert!(tea.raw_score >= 0.0, "{} raw score", tea.id);
        assert!(tea.affinity_score >= 0.0, "{} affinity score", tea.id);
    }
    assert!(recommendation
        .tea_scores
        .windows(2)
        .all(|pair| pair[0].ratio >= pair[1].ratio));
    // hibiscus_fruit has the most negative blended score and is shifted to zero.
    let floor = recommendation.tea_scores.last().expect("four teas");
    assert_eq!(floor.id, TeaId::from("hibiscus_fruit"));
    assert_eq!(floor.raw_score, 0.0);
}

#[test]
fn rounding_shortfall_goes_to_the_leading_tea() {
    // Weights of 21 / 21 / 21 / 20 round to 25 / 25 / 25 / 24.
    let catalog = weighted_catalog(&[("only", [21.0, 21.0, 21.0, 20.0], json!({}))]);
    let engine = RecommendationEngine::new(&catalog, EngineConfig::default());

    let recommendation = engine.recommend(&AnswerSet::new().multiple("pick", ["only"]));

    assert_eq!(order(&recommendation), vec!["a", "b", "c", "d"]);
    let ratios: Vec<u32> = recommendation.tea_scores.iter().map(|tea| tea.ratio).collect();
    assert_eq!(ratios, vec![26, 25, 25, 24]);
}

#[test]
fn catalog_without_affinities_scores_zero_affinity() {
    let catalog = weighted_catalog(&[("only", [2.0, 1.0, 0.0, -1.0], json!({}))]);
    let engine = RecommendationEngine::new(&catalog, EngineConfig::default());

    let recommendation = engine.recommend(&AnswerSet::new().multiple("pick", ["only"]));

    assert!(recommendation
        .tea_scores
        .iter()
        .all(|tea| tea.affinity_score == 0.0));
    assert_eq!(order(&recommendation), vec!["a", "b", "c", "d"]);
    assert_eq!(recommendation.ratio_total(), 100);
    assert_eq!(ratio_of(&recommendation, "d"), 0);
}

#[test]
fn zero_total_falls_back_to_even_split() {
    let catalog = weighted_catalog(&[("flat", [0.0, 0.0, 0.0, 0.0], json!({}))]);
    let engine = RecommendationEngine::new(&catalog, EngineConfig::default());

    let recommendation = engine.recommend(&AnswerSet::new().multiple("pick", ["flat"]));

    assert!(recommendation.tea_scores.iter().all(|tea| tea.ratio == 25));
    assert_eq!(order(&recommendation), vec!["a", "b", "c", "d"]);
}

#[test]
fn second_aroma_selection_shifts_the_blend() {
    let engine = engine();
    let single = engine.recommend(&AnswerSet::new().multiple("aroma", ["black_tea_structure"]));
    let double = engine.recommend(
        &AnswerSet::new().multiple("aroma", ["black_tea_structure", "cacao_depth"]),
    );

    assert_eq!(ratio_of(&single, "minty_chocolat"), 24);
    assert_eq!(ratio_of(&double, "minty_chocolat"), 38);
    assert_eq!(ratio_of(&single, "british_black"), 54);
    assert_eq!(ratio_of(&double, "british_black"), 43);
}

#[test]
fn axis_clamp_bounds_each_axis_contribution() {
    let catalog = weighted_catalog(&[
        ("heavy", [10.0, 0.0, 0.0, 0.0], json!({})),
        ("light", [0.0, 1.0, 0.0, 0.0], json!({})),
    ]);
    let answers = AnswerSet::new().multiple("pick", ["heavy", "light"]);

    let clamped = RecommendationEngine::new(&catalog, EngineConfig::default()).recommend(&answers);
    let loose = RecommendationEngine::new(
        &catalog,
        EngineConfig {
            axis_clamp: 100.0,
            ..EngineConfig::default()
        },
    )
    .recommend(&answers);

    // direct 10 * 0.7 plus min(10 / 2, 2) * 0.3 versus the unclamped 5 * 0.3.
    assert_eq!(clamped.tea_scores[0].raw_score, 7.6);
    assert_eq!(loose.tea_scores[0].raw_score, 8.5);
}

#[test]
fn out_of_range_axis_clamp_never_panics() {
    let catalog = weighted_catalog(&[
        ("heavy", [10.0, 0.0, 0.0, 0.0], json!({})),
        ("light", [0.0, 1.0, 0.0, 0.0], json!({})),
    ]);
    let answers = AnswerSet::new().multiple("pick", ["heavy", "light"]);
    let with_clamp = |axis_clamp: f64| EngineConfig {
        axis_clamp,
        ..EngineConfig::default()
    };

    let negative = RecommendationEngine::new(&catalog, with_clamp(-2.0)).recommend(&answers);
    let unbounded = RecommendationEngine::new(&catalog, with_clamp(f64::NAN)).recommend(&answers);

    assert_eq!(negative.tea_scores[0].raw_score, 7.6);
    assert_eq!(unbounded.tea_scores[0].raw_score, 8.5);

    let flipped = RecommendationEngine::new(bundled(), with_clamp(-1.0)).recommend(&classic_answers());
    let reference = RecommendationEngine::new(bundled(), with_clamp(1.0)).recommend(&classic_answers());
    assert_eq!(flipped, reference);
    assert_eq!(flipped.ratio_total(), 100);
}

#[test]
fn output_is_byte_identical_across_runs() {
    let engine = engine();
    let first = serde_json::to_string(&engine.recommend(&fruity_answers())).expect("serialize");
    let second = serde_json::to_string(&engine.recommend(&fruity_answers())).expect("serialize");
    assert_eq!(first, second);
}
