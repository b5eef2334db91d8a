use super::round2;
use crate::catalog::{PreferenceSignal, TeaId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeId {
    ClassicFocus,
    BalancedDaily,
    FruityRefresh,
    CoolDessert,
    SoftExoticBalance,
}

impl ArchetypeId {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchetypeId::ClassicFocus => "classic_focus",
            ArchetypeId::BalancedDaily => "balanced_daily",
            ArchetypeId::FruityRefresh => "fruity_refresh",
            ArchetypeId::CoolDessert => "cool_dessert",
            ArchetypeId::SoftExoticBalance => "soft_exotic_balance",
        }
    }
}

/// Archetypes with equal scores resolve in this order.
pub const ARCHETYPE_PRIORITY: [ArchetypeId; 5] = [
    ArchetypeId::BalancedDaily,
    ArchetypeId::ClassicFocus,
    ArchetypeId::FruityRefresh,
    ArchetypeId::CoolDessert,
    ArchetypeId::SoftExoticBalance,
];

pub(crate) struct ArchetypeDefinition {
    pub(crate) id: ArchetypeId,
    pub(crate) display_name: &'static str,
    pub(crate) one_liner: &'static str,
    pub(crate) traits: &'static [&'static str],
    pub(crate) primary: &'static [&'static str],
    pub(crate) secondary: &'static [&'static str],
    pub(crate) note: &'static str,
    pub(crate) signal_weights: &'static [(PreferenceSignal, f64)],
}

pub(crate) static ARCHETYPES: [ArchetypeDefinition; 5] = [
    ArchetypeDefinition {
        id: ArchetypeId::ClassicFocus,
        display_name: "Classic Focus",
        one_liner: "Puts a neat structure and steady focus first.",
        traits: &["classic preference", "black tea centred", "calm immersion"],
        primary: &["british_black"],
        secondary: &["asian_gold", "minty_chocolat"],
        note: "Most satisfied by teas with a clear black tea structure.",
        signal_weights: &[
            (PreferenceSignal::Classic, 1.45),
            (PreferenceSignal::BlackTeaForward, 1.35),
            (PreferenceSignal::CalmFocus, 1.2),
            (PreferenceSignal::Balanced, 0.85),
        ],
    },
    ArchetypeDefinition {
        id: ArchetypeId::BalancedDaily,
        display_name: "Balanced Daily",
        one_liner: "Prefers a balance gentle enough to enjoy every day.",
        traits: &["balance", "flexible occasions", "daily routine"],
        primary: &["asian_gold"],
        secondary: &["british_black", "hibiscus_fruit"],
        note: "Pairs with teas whose layers stay in harmony rather than leaning hard one way.",
        signal_weights: &[
            (PreferenceSignal::Balanced, 1.5),
            (PreferenceSignal::SoftExotic, 0.95),
            (PreferenceSignal::CalmFocus, 1.0),
            (PreferenceSignal::AfterMeal, 0.85),
        ],
    },
    ArchetypeDefinition {
        id: ArchetypeId::FruityRefresh,
        display_name: "Fruity Refresh",
        one_liner: "Values bright fruit and a crisp change of pace.",
        traits: &["fruity preference", "refreshing mood", "iced friendly"],
        primary: &["hibiscus_fruit"],
        secondary: &["asian_gold", "minty_chocolat"],
        note: "Suits fresh fruit profiles with a clean finish.",
        signal_weights: &[
            (PreferenceSignal::Refreshing, 1.5),
            (PreferenceSignal::Fruity, 1.45),
            (PreferenceSignal::IcedFriendly, 1.2),
            (PreferenceSignal::AfterMeal, 0.8),
        ],
    },
    ArchetypeDefinition {
        id: ArchetypeId::CoolDessert,
        display_name: "Cool Dessert",
        one_liner: "Looks for dessert-like satisfaction with a cool finish.",
        traits: &["dessert feel", "mint accent", "after-meal switch"],
        primary: &["minty_chocolat"],
        secondary: &["british_black", "asian_gold"],
        note: "Prefers teas where a cacao aftertaste and a cool contrast coexist.",
        signal_weights: &[
            (PreferenceSignal::DessertLike, 1.45),
            (PreferenceSignal::Minty, 1.35),
            (PreferenceSignal::AfterMeal, 1.15),
            (PreferenceSignal::Refreshing, 0.9),
        ],
    },
    ArchetypeDefinition {
        id: ArchetypeId::SoftExoticBalance,
        display_name: "Soft Exotic Balance",
        one_liner: "Enjoys subtle exotic notes held in a gentle balance.",
        traits: &["soft exotic notes", "medium intensity", "composed aftertaste"],
        primary: &["asian_gold"],
        secondary: &["hibiscus_fruit", "british_black"],
        note: "Pairs with teas that vary softly along a herbal citrus line.",
        signal_weights: &[
            (PreferenceSignal::SoftExotic, 1.9),
            (PreferenceSignal::Balanced, 0.9),
            (PreferenceSignal::Fruity, 0.85),
            (PreferenceSignal::CalmFocus, 0.7),
            (PreferenceSignal::Adventurous, 0.6),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeaDirection {
    pub primary: Vec<TeaId>,
    pub secondary: Vec<TeaId>,
    pub note: String,
}

/// The archetype that best fits a set of signal scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeMatch {
    pub id: ArchetypeId,
    pub display_name: String,
    pub description: String,
    pub representative_traits: Vec<String>,
    pub tea_direction: TeaDirection,
    pub score: f64,
}

fn tea_ids(ids: &[&str]) -> Vec<TeaId> {
    ids.iter().copied().map(TeaId::from).collect()
}

impl ArchetypeDefinition {
    fn fit(&self, scores: &BTreeMap<PreferenceSignal, u8>) -> f64 {
        self.signal_weights
            .iter()
            .map(|(signal, weight)| {
                f64::from(scores.get(signal).copied().unwrap_or(0)) * weight
            })
            .sum()
    }

    fn to_match(&self, score: f64) -> ArchetypeMatch {
        ArchetypeMatch {
            id: self.id,
            display_name: self.display_name.to_string(),
            description: self.one_liner.to_string(),
            representative_traits: self.traits.iter().map(|t| t.to_string()).collect(),
            tea_direction: TeaDirection {
                primary: tea_ids(self.primary),
                secondary: tea_ids(self.secondary),
                note: self.note.to_string(),
            },
            score: round2(score),
        }
    }
}

/// Highest weighted fit wins; exact ties fall back to [`ARCHETYPE_PRIORITY`].
pub fn select_archetype(scores: &BTreeMap<PreferenceSignal, u8>) -> ArchetypeMatch {
    let mut best: Option<(&ArchetypeDefinition, f64)> = None;

    for id in ARCHETYPE_PRIORITY {
        let Some(definition) = ARCHETYPES.iter().find(|definition| definition.id == id) else {
            continue;
        };
        let score = definition.fit(scores);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((definition, score)),
        }
    }

    let (definition, score) = best.unwrap_or((&ARCHETYPES[1], 0.0));
    definition.to_match(score)
}
