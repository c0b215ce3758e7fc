//! Labeled observations of spell combinations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spellweave_core::{
    ActorDescriptor, EnvironmentalContext, InteractionAnalysis, InteractionType, SpellDescriptor,
};

/// Observed result of casting a combination.
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
pub enum OutcomeLabel {
    #[display("success")]
    Success,
    #[display("neutral")]
    Neutral,
    #[display("failure")]
    Failure,
}

impl OutcomeLabel {
    pub const ALL: [Self; 3] = [Self::Success, Self::Neutral, Self::Failure];

    #[must_use]
    pub const fn from_interaction_type(interaction_type: InteractionType) -> Self {
        match interaction_type {
            InteractionType::Synergy => Self::Success,
            InteractionType::Neutral => Self::Neutral,
            InteractionType::Conflict => Self::Failure,
        }
    }

    #[must_use]
    pub const fn interaction_type(self) -> InteractionType {
        match self {
            Self::Success => InteractionType::Synergy,
            Self::Neutral => InteractionType::Neutral,
            Self::Failure => InteractionType::Conflict,
        }
    }

    /// Training target: failure 0, neutral 1, success 2.
    #[must_use]
    pub const fn ordinal(self) -> f32 {
        match self {
            Self::Failure => 0.0,
            Self::Neutral => 1.0,
            Self::Success => 2.0,
        }
    }

    /// Nearest label for a regressor output; non-finite values map to neutral.
    ///
    /// ```
    /// # use spellweave_corpus::data_point::OutcomeLabel;
    /// assert_eq!(OutcomeLabel::from_ordinal(1.7), OutcomeLabel::Success);
    /// assert_eq!(OutcomeLabel::from_ordinal(-3.0), OutcomeLabel::Failure);
    /// assert_eq!(OutcomeLabel::from_ordinal(f32::NAN), OutcomeLabel::Neutral);
    /// ```
    #[must_use]
    pub fn from_ordinal(value: f32) -> Self {
        if !value.is_finite() {
            return Self::Neutral;
        }
        match value.clamp(0.0, 2.0).round() {
            v if v < 0.5 => Self::Failure,
            v if v < 1.5 => Self::Neutral,
            _ => Self::Success,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub damage: f32,
    pub efficiency: f32,
    pub tactical_advantage: f32,
}

/// Identity of a data point; recording a point with an existing key replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataPointKey {
    pub primary: String,
    pub secondary: String,
    pub actor_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDataPoint {
    pub primary: SpellDescriptor,
    pub secondary: SpellDescriptor,
    pub actor: ActorDescriptor,
    pub context: EnvironmentalContext,
    pub outcome: OutcomeLabel,
    pub metrics: PerformanceMetrics,
    /// Final compatibility score of the analysis the point was derived from.
    pub compatibility_score: f32,
    pub timestamp: DateTime<Utc>,
}

impl TrainingDataPoint {
    /// Builds a data point from a finalized analysis.
    ///
    /// The outcome follows the interaction type (synergy → success,
    /// neutral → neutral, conflict → failure).
    #[must_use]
    pub fn from_analysis(
        primary: SpellDescriptor,
        secondary: SpellDescriptor,
        actor: ActorDescriptor,
        context: EnvironmentalContext,
        analysis: &InteractionAnalysis,
        metrics: PerformanceMetrics,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            primary,
            secondary,
            actor,
            context,
            outcome: OutcomeLabel::from_interaction_type(analysis.interaction_type),
            metrics,
            compatibility_score: analysis.compatibility_score,
            timestamp,
        }
    }

    #[must_use]
    pub fn key(&self) -> DataPointKey {
        DataPointKey {
            primary: self.primary.name.clone(),
            secondary: self.secondary.name.clone(),
            actor_id: self.actor.id.clone(),
        }
    }
}
