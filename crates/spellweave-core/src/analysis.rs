//! Interaction analysis produced by the pipeline.
//!
//! An [`InteractionAnalysis`] is created by the base analyzer, extended
//! additively by plugins and by the prediction ensemble, and stored read-only
//! in the interaction cache.
//!
//! # Invariants
//!
//! - `compatibility_score` is always within
//!   \[[`MIN_SCORE`], [`MAX_SCORE`]\]
//! - `interaction_type` is always [`InteractionType::from_score`] of the
//!   current score; [`InteractionAnalysis::set_score`] keeps both in sync
//! - `risk_factors` is never empty: when no risk applies it holds
//!   [`LOW_INHERENT_RISK`]

use serde::{Deserialize, Serialize};

pub const MIN_SCORE: f32 = 0.0;
pub const MAX_SCORE: f32 = 10.0;

/// Scores at or above this value are a synergy.
pub const SYNERGY_THRESHOLD: f32 = 8.0;
/// Scores at or below this value are a conflict.
pub const CONFLICT_THRESHOLD: f32 = 3.0;

/// Risk entry used when no risk rule fired.
pub const LOW_INHERENT_RISK: &str = "Low inherent risk";

/// Qualitative classification of a compatibility score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    #[display("synergy")]
    Synergy,
    #[display("neutral")]
    Neutral,
    #[display("conflict")]
    Conflict,
}

impl InteractionType {
    pub const ALL: [Self; 3] = [Self::Synergy, Self::Neutral, Self::Conflict];

    /// Classifies a score: `>= 8` synergy, `<= 3` conflict, otherwise neutral.
    ///
    /// ```
    /// use spellweave_core::InteractionType;
    ///
    /// assert_eq!(InteractionType::from_score(8.0), InteractionType::Synergy);
    /// assert_eq!(InteractionType::from_score(7.999), InteractionType::Neutral);
    /// assert_eq!(InteractionType::from_score(3.0), InteractionType::Conflict);
    /// ```
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score >= SYNERGY_THRESHOLD {
            Self::Synergy
        } else if score <= CONFLICT_THRESHOLD {
            Self::Conflict
        } else {
            Self::Neutral
        }
    }
}

/// How well the combination suits the situation, each score in \[0, 1\].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextualEffectiveness {
    pub terrain: f32,
    pub difficulty: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionAnalysis {
    pub compatibility_score: f32,
    pub interaction_type: InteractionType,
    pub contextual_effectiveness: ContextualEffectiveness,
    pub potential_outcomes: Vec<String>,
    pub risk_factors: Vec<String>,
}

/// Clamps `score` into the valid range, mapping NaN to [`MIN_SCORE`].
#[must_use]
pub fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

impl InteractionAnalysis {
    /// Builds an analysis, clamping the score and deriving the interaction type.
    ///
    /// An empty `risk_factors` list is replaced by [`LOW_INHERENT_RISK`].
    #[must_use]
    pub fn new(
        compatibility_score: f32,
        contextual_effectiveness: ContextualEffectiveness,
        potential_outcomes: Vec<String>,
        mut risk_factors: Vec<String>,
    ) -> Self {
        let score = clamp_score(compatibility_score);
        if risk_factors.is_empty() {
            risk_factors.push(LOW_INHERENT_RISK.to_owned());
        }
        Self {
            compatibility_score: score,
            interaction_type: InteractionType::from_score(score),
            contextual_effectiveness,
            potential_outcomes,
            risk_factors,
        }
    }

    /// Replaces the score (clamped) and reclassifies the interaction.
    pub fn set_score(&mut self, score: f32) {
        self.compatibility_score = clamp_score(score);
        self.interaction_type = InteractionType::from_score(self.compatibility_score);
    }

    /// Returns `true` if the only risk entry is the low-risk fallback.
    #[must_use]
    pub fn is_low_risk(&self) -> bool {
        matches!(self.risk_factors.as_slice(), [only] if only == LOW_INHERENT_RISK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effectiveness() -> ContextualEffectiveness {
        ContextualEffectiveness {
            terrain: 0.5,
            difficulty: 0.6,
        }
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(InteractionType::from_score(8.0), InteractionType::Synergy);
        assert_eq!(InteractionType::from_score(7.999), InteractionType::Neutral);
        assert_eq!(InteractionType::from_score(3.0), InteractionType::Conflict);
        assert_eq!(InteractionType::from_score(3.001), InteractionType::Neutral);
        assert_eq!(InteractionType::from_score(0.0), InteractionType::Conflict);
        assert_eq!(InteractionType::from_score(10.0), InteractionType::Synergy);
    }

    #[test]
    fn test_new_clamps_and_fills_risk() {
        let analysis = InteractionAnalysis::new(12.5, effectiveness(), vec![], vec![]);
        assert_eq!(analysis.compatibility_score, MAX_SCORE);
        assert_eq!(analysis.interaction_type, InteractionType::Synergy);
        assert!(analysis.is_low_risk());

        let analysis = InteractionAnalysis::new(f32::NAN, effectiveness(), vec![], vec![]);
        assert_eq!(analysis.compatibility_score, MIN_SCORE);
    }

    #[test]
    fn test_set_score_reclassifies() {
        let mut analysis = InteractionAnalysis::new(5.0, effectiveness(), vec![], vec![]);
        assert!(analysis.interaction_type.is_neutral());
        analysis.set_score(8.5);
        assert!(analysis.interaction_type.is_synergy());
        analysis.set_score(-2.0);
        assert_eq!(analysis.compatibility_score, 0.0);
        assert!(analysis.interaction_type.is_conflict());
    }

    #[test]
    fn test_serializes_camel_case() {
        let analysis = InteractionAnalysis::new(1.3, effectiveness(), vec![], vec![]);
        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("compatibilityScore").is_some());
        assert_eq!(json["interactionType"], "conflict");
        assert!(json.get("riskFactors").is_some());
    }
}
