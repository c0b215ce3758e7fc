//! Offline dataset preparation run before training.
//!
//! ```text
//! snapshot → remove_duplicates → balance_dataset → train
//!                                       ↘ quality_report
//! ```

use std::collections::{BTreeSet, HashMap};

use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use spellweave_analyzer::rules;
use spellweave_core::{
    CharacterClass, Difficulty, InteractionType, MAX_SCORE, Terrain, clamp_score,
};
use spellweave_stats::{counts::CategoryCounts, descriptive::DescriptiveStats};

use crate::data_point::TrainingDataPoint;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FullContextKey {
    primary: String,
    secondary: String,
    actor_id: String,
    actor_class: CharacterClass,
    actor_level: u32,
    terrain: Terrain,
    difficulty: Difficulty,
    party: Vec<CharacterClass>,
}

impl FullContextKey {
    fn new(point: &TrainingDataPoint) -> Self {
        Self {
            primary: point.primary.name.clone(),
            secondary: point.secondary.name.clone(),
            actor_id: point.actor.id.clone(),
            actor_class: point.actor.class,
            actor_level: point.actor.level,
            terrain: point.context.terrain,
            difficulty: point.context.difficulty,
            party: point.context.party_composition.clone(),
        }
    }
}

/// Drops points sharing the spell pair, the actor and the full context,
/// keeping the newest of each group. The result is ordered oldest first.
#[must_use]
pub fn remove_duplicates(points: Vec<TrainingDataPoint>) -> Vec<TrainingDataPoint> {
    let before = points.len();
    let mut latest = HashMap::<FullContextKey, TrainingDataPoint>::new();
    for point in points {
        let key = FullContextKey::new(&point);
        match latest.get(&key) {
            Some(existing) if existing.timestamp > point.timestamp => {}
            _ => {
                latest.insert(key, point);
            }
        }
    }
    let mut deduped = latest.into_values().collect::<Vec<_>>();
    deduped.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.key().cmp(&b.key()))
    });
    tracing::debug!(before, after = deduped.len(), "removed duplicate data points");
    deduped
}

/// Undersamples every interaction-type bucket to the size of the smallest
/// populated bucket. Empty buckets are ignored.
#[must_use]
pub fn balance_dataset<R>(points: &[TrainingDataPoint], rng: &mut R) -> Vec<TrainingDataPoint>
where
    R: Rng + ?Sized,
{
    let mut buckets = HashMap::<InteractionType, Vec<&TrainingDataPoint>>::new();
    for point in points {
        buckets
            .entry(point.outcome.interaction_type())
            .or_default()
            .push(point);
    }
    let Some(target) = buckets.values().map(Vec::len).min() else {
        return vec![];
    };
    let mut balanced = vec![];
    for interaction_type in InteractionType::ALL {
        if let Some(bucket) = buckets.get(&interaction_type) {
            balanced.extend(bucket.choose_multiple(rng, target).map(|p| (*p).clone()));
        }
    }
    balanced.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    balanced
}

/// Derived features that are not part of the regression vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeredFeatures {
    pub level_difference: u32,
    /// Actor level scaled so that level 20 is `1.0`.
    pub actor_level_factor: f32,
    /// Directed school table entry, `0.0` when absent.
    pub school_compatibility: f32,
}

const MAX_ACTOR_LEVEL: f32 = 20.0;

#[must_use]
pub fn engineer_features(point: &TrainingDataPoint) -> EngineeredFeatures {
    #[expect(clippy::cast_precision_loss)]
    let actor_level_factor = point.actor.level as f32 / MAX_ACTOR_LEVEL;
    EngineeredFeatures {
        level_difference: point.primary.level.abs_diff(point.secondary.level),
        actor_level_factor,
        school_compatibility: rules::school_compatibility(
            point.primary.school,
            point.secondary.school,
        )
        .unwrap_or(0.0),
    }
}

/// Compatibility score rescaled to `[0, 1]`.
#[must_use]
pub fn normalized_score(point: &TrainingDataPoint) -> f32 {
    clamp_score(point.compatibility_score) / MAX_SCORE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub total: usize,
    pub interaction_types: CategoryCounts<InteractionType>,
    /// Distinct spell pairs, ignoring slot order.
    pub unique_spell_pairs: usize,
    pub unique_actor_classes: usize,
    pub level_difference: Option<DescriptiveStats>,
    pub actor_level_factor: Option<DescriptiveStats>,
    pub school_compatibility: Option<DescriptiveStats>,
    pub normalized_score: Option<DescriptiveStats>,
}

#[must_use]
pub fn quality_report(points: &[TrainingDataPoint]) -> QualityReport {
    let mut interaction_types = CategoryCounts::with_keys(InteractionType::ALL);
    let mut pairs = BTreeSet::new();
    let mut classes = BTreeSet::new();
    let mut engineered = Vec::with_capacity(points.len());
    for point in points {
        engineered.push((engineer_features(point), normalized_score(point)));
        interaction_types.increment(point.outcome.interaction_type());
        let (a, b) = (point.primary.name.as_str(), point.secondary.name.as_str());
        pairs.insert(if a <= b { (a, b) } else { (b, a) });
        classes.insert(point.actor.class);
    }
    #[expect(clippy::cast_precision_loss)]
    let level_differences = engineered
        .iter()
        .map(|(f, _)| f.level_difference as f32)
        .collect::<Vec<_>>();
    QualityReport {
        total: points.len(),
        interaction_types,
        unique_spell_pairs: pairs.len(),
        unique_actor_classes: classes.len(),
        level_difference: DescriptiveStats::new(level_differences),
        actor_level_factor: DescriptiveStats::new(
            engineered.iter().map(|(f, _)| f.actor_level_factor),
        ),
        school_compatibility: DescriptiveStats::new(
            engineered.iter().map(|(f, _)| f.school_compatibility),
        ),
        normalized_score: DescriptiveStats::new(engineered.iter().map(|&(_, score)| score)),
    }
}
