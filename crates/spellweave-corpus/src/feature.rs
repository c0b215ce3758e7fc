//! Numeric feature vectors for regression.
//!
//! Two layouts are produced from the same categorical encoders:
//!
//! ```text
//! FeatureVector (8)          primary_level, secondary_level,
//!                            primary_school, secondary_school,
//!                            actor_level, actor_class, terrain, difficulty
//! TrainingFeatureVector (11) FeatureVector ++ damage, efficiency, tactical_advantage
//! ```
//!
//! Regressors are fit and queried on [`FeatureVector`], which is available both
//! for recorded data points and for fresh queries. [`TrainingFeatureVector`] adds
//! the observed metrics and backs the tabular corpus export.
//!
//! Labels use the ordinal outcome convention of [`crate::data_point::OutcomeLabel::ordinal`].

use arrayvec::ArrayVec;
use spellweave_core::{
    ActorDescriptor, EnvironmentalContext, SpellDescriptor,
    encoder::{encode_class, encode_difficulty, encode_school, encode_terrain},
};

use crate::data_point::TrainingDataPoint;

pub const FEATURE_COUNT: usize = 8;
pub const TRAINING_FEATURE_COUNT: usize = FEATURE_COUNT + 3;

pub type FeatureVector = ArrayVec<f32, FEATURE_COUNT>;
pub type TrainingFeatureVector = ArrayVec<f32, TRAINING_FEATURE_COUNT>;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "primary_level",
    "secondary_level",
    "primary_school",
    "secondary_school",
    "actor_level",
    "actor_class",
    "terrain",
    "difficulty",
];

pub const TRAINING_FEATURE_NAMES: [&str; TRAINING_FEATURE_COUNT] = [
    "primary_level",
    "secondary_level",
    "primary_school",
    "secondary_school",
    "actor_level",
    "actor_class",
    "terrain",
    "difficulty",
    "damage",
    "efficiency",
    "tactical_advantage",
];

#[expect(clippy::cast_precision_loss)]
fn level(level: u32) -> f32 {
    level as f32
}

#[expect(clippy::cast_precision_loss)]
fn code(code: i32) -> f32 {
    code as f32
}

#[must_use]
pub fn extract(
    primary: &SpellDescriptor,
    secondary: &SpellDescriptor,
    actor: &ActorDescriptor,
    context: &EnvironmentalContext,
) -> FeatureVector {
    FeatureVector::from([
        level(primary.level),
        level(secondary.level),
        code(encode_school(primary.school)),
        code(encode_school(secondary.school)),
        level(actor.level),
        code(encode_class(actor.class)),
        code(encode_terrain(context.terrain)),
        code(encode_difficulty(context.difficulty)),
    ])
}

#[must_use]
pub fn extract_point(point: &TrainingDataPoint) -> FeatureVector {
    extract(&point.primary, &point.secondary, &point.actor, &point.context)
}

#[must_use]
pub fn extract_training(point: &TrainingDataPoint) -> TrainingFeatureVector {
    let mut features = TrainingFeatureVector::new();
    features.extend(extract_point(point));
    features.extend([
        point.metrics.damage,
        point.metrics.efficiency,
        point.metrics.tactical_advantage,
    ]);
    features
}

#[must_use]
pub fn extract_label(point: &TrainingDataPoint) -> f32 {
    point.outcome.ordinal()
}
