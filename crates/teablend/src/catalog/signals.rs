use serde::{Deserialize, Serialize};
use std::fmt;

/// Preference axes the analyzer scores on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceSignal {
    Refreshing,
    Classic,
    Adventurous,
    DessertLike,
    Balanced,
    SoftExotic,
    Fruity,
    Minty,
    BlackTeaForward,
    IcedFriendly,
    AfterMeal,
    CalmFocus,
}

impl PreferenceSignal {
    pub const ALL: [PreferenceSignal; 12] = [
        PreferenceSignal::Refreshing,
        PreferenceSignal::Classic,
        PreferenceSignal::Adventurous,
        PreferenceSignal::DessertLike,
        PreferenceSignal::Balanced,
        PreferenceSignal::SoftExotic,
        PreferenceSignal::Fruity,
        PreferenceSignal::Minty,
        PreferenceSignal::BlackTeaForward,
        PreferenceSignal::IcedFriendly,
        PreferenceSignal::AfterMeal,
        PreferenceSignal::CalmFocus,
    ];

    /// Key used for this signal in catalog documents and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceSignal::Refreshing => "refreshing",
            PreferenceSignal::Classic => "classic",
            PreferenceSignal::Adventurous => "adventurous",
            PreferenceSignal::DessertLike => "dessert_like",
            PreferenceSignal::Balanced => "balanced",
            PreferenceSignal::SoftExotic => "soft_exotic",
            PreferenceSignal::Fruity => "fruity",
            PreferenceSignal::Minty => "minty",
            PreferenceSignal::BlackTeaForward => "black_tea_forward",
            PreferenceSignal::IcedFriendly => "iced_friendly",
            PreferenceSignal::AfterMeal => "after_meal",
            PreferenceSignal::CalmFocus => "calm_focus",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|signal| signal.as_str() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            PreferenceSignal::Refreshing => "Refreshing lean",
            PreferenceSignal::Classic => "Classic preference",
            PreferenceSignal::Adventurous => "Exploratory lean",
            PreferenceSignal::DessertLike => "Dessert-like preference",
            PreferenceSignal::Balanced => "Balance preference",
            PreferenceSignal::SoftExotic => "Soft exotic preference",
            PreferenceSignal::Fruity => "Fruity preference",
            PreferenceSignal::Minty => "Minty preference",
            PreferenceSignal::BlackTeaForward => "Black tea focus",
            PreferenceSignal::IcedFriendly => "Iced-friendly lean",
            PreferenceSignal::AfterMeal => "After-meal fit",
            PreferenceSignal::CalmFocus => "Calm focus lean",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PreferenceSignal::Refreshing => "You lean toward a clear, light change of pace.",
            PreferenceSignal::Classic => "Familiar, neatly composed tea styles came through strongly.",
            PreferenceSignal::Adventurous => "You keep the door open to new combinations over the usual picks.",
            PreferenceSignal::DessertLike => "You like a soft, satisfying aftertaste.",
            PreferenceSignal::Balanced => "You prefer steady balance over a strong lean in one direction.",
            PreferenceSignal::SoftExotic => "You welcome exotic accents as long as they stay gentle.",
            PreferenceSignal::Fruity => "Bright aromas with a fruity edge appeal to you.",
            PreferenceSignal::Minty => "You enjoy the cool presence of mint.",
            PreferenceSignal::BlackTeaForward => "You lean toward the structured flavour of a black tea base.",
            PreferenceSignal::IcedFriendly => "You enjoy the sharpness a tea gains when served cold.",
            PreferenceSignal::AfterMeal => "You often look for a tea that resets the palate after a meal.",
            PreferenceSignal::CalmFocus => "A calm mood you can settle into and focus matters to you.",
        }
    }
}

impl fmt::Display for PreferenceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
