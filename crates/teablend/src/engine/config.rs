use serde::{Deserialize, Serialize};

/// Tuning constants for the analyzer and scorer. The defaults are
/// empirically tuned and reproduce the reference recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Share of the blended score taken from per-axis normalized scores.
    pub axis_blend_weight: f64,
    /// Share of the adjusted score taken from the profile-affinity pass.
    pub affinity_weight: f64,
    /// Signal normalization base per selected option.
    pub normalization_multiplier: f64,
    /// Baseline added to every signal ratio before scaling to 0..=100.
    pub signal_floor: f64,
    /// Bound applied to each axis's averaged contribution.
    pub axis_clamp: f64,
    /// Adjusted-score gap within which tied ratios are ordered by affinity.
    pub affinity_tie_gap: f64,
    pub explanation_signal_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            axis_blend_weight: 0.3,
            affinity_weight: 0.18,
            normalization_multiplier: 2.4,
            signal_floor: 0.2,
            axis_clamp: 2.0,
            affinity_tie_gap: 2.0,
            explanation_signal_count: 4,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, weight) in [
            ("axis_blend_weight", self.axis_blend_weight),
            ("affinity_weight", self.affinity_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(format!("{name} must be within 0..=1, got {weight}"));
            }
        }
        if self.normalization_multiplier.is_nan() || self.normalization_multiplier <= 0.0 {
            return Err(format!(
                "normalization_multiplier must be positive, got {}",
                self.normalization_multiplier
            ));
        }
        if !self.signal_floor.is_finite() {
            return Err("signal_floor must be finite".to_string());
        }
        if [self.axis_clamp, self.affinity_tie_gap]
            .iter()
            .any(|value| value.is_nan() || *value < 0.0)
        {
            return Err("axis_clamp and affinity_tie_gap must be non-negative".to_string());
        }
        if self.explanation_signal_count == 0 {
            return Err("explanation_signal_count must be at least 1".to_string());
        }
        Ok(())
    }
}
