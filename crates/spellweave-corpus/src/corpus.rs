//! Bounded, deduplicated store of labeled outcomes.
//!
//! # Deduplication
//!
//! Points are keyed by [`DataPointKey`] (primary spell, secondary spell, actor).
//! Recording a point with an existing key replaces the stored one.
//!
//! # Eviction
//!
//! When the corpus grows past [`CorpusConfig::max_size`], the oldest points
//! (by timestamp) are dropped in one batch:
//!
//! ```text
//! evicted = max(len − max_size, ⌊len × eviction_fraction⌋)
//! ```
//!
//! With the default fraction of `0.2` a corpus of 10 001 points shrinks to
//! 8 001. A fraction of `0.0` trims exactly to `max_size`.

use std::{
    collections::{BTreeSet, HashMap},
    io,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spellweave_core::{School, Terrain};
use spellweave_stats::{counts::CategoryCounts, descriptive::DescriptiveStats};

use crate::{
    data_point::{DataPointKey, OutcomeLabel, TrainingDataPoint},
    feature::{self, TRAINING_FEATURE_NAMES},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub max_size: usize,
    /// Share of the corpus dropped when `max_size` is exceeded, in `[0, 1]`.
    pub eviction_fraction: f32,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            max_size: 10_000,
            eviction_fraction: 0.2,
        }
    }
}

impl CorpusConfig {
    fn eviction_count(&self, len: usize) -> usize {
        if len <= self.max_size {
            return 0;
        }
        let fraction = if self.eviction_fraction.is_finite() {
            f64::from(self.eviction_fraction.clamp(0.0, 1.0))
        } else {
            0.0
        };
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let batch = (len as f64 * fraction).floor() as usize;
        (len - self.max_size).max(batch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Full nested representation of every data point.
    Json,
    /// One header line followed by one row per data point.
    Csv,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ExportError {
    #[display("failed to serialize corpus as JSON")]
    Json(serde_json::Error),
    #[display("failed to write CSV record")]
    Csv(csv::Error),
    #[display("failed to flush export output")]
    Io(io::Error),
    #[display("export output is not valid UTF-8")]
    Utf8(std::string::FromUtf8Error),
}

/// Summary of the corpus contents.
///
/// Every bucket of the categorical distributions is present even when zero.
/// Metric summaries are `None` for an empty corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStatistics {
    pub total: usize,
    pub outcome_distribution: CategoryCounts<OutcomeLabel>,
    /// Appearances across both spell slots.
    pub school_counts: CategoryCounts<School>,
    pub terrain_counts: CategoryCounts<Terrain>,
    pub damage: Option<DescriptiveStats>,
    pub efficiency: Option<DescriptiveStats>,
    pub tactical_advantage: Option<DescriptiveStats>,
}

impl CorpusStatistics {
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a TrainingDataPoint>,
    {
        let mut total = 0;
        let mut outcome_distribution = CategoryCounts::with_keys(OutcomeLabel::ALL);
        let mut school_counts = CategoryCounts::with_keys(School::ALL.iter().copied());
        let mut terrain_counts = CategoryCounts::with_keys(Terrain::ALL.iter().copied());
        let mut damage = vec![];
        let mut efficiency = vec![];
        let mut tactical_advantage = vec![];
        for point in points {
            total += 1;
            outcome_distribution.increment(point.outcome);
            school_counts.increment(point.primary.school);
            school_counts.increment(point.secondary.school);
            terrain_counts.increment(point.context.terrain);
            damage.push(point.metrics.damage);
            efficiency.push(point.metrics.efficiency);
            tactical_advantage.push(point.metrics.tactical_advantage);
        }
        Self {
            total,
            outcome_distribution,
            school_counts,
            terrain_counts,
            damage: DescriptiveStats::new(damage),
            efficiency: DescriptiveStats::new(efficiency),
            tactical_advantage: DescriptiveStats::new(tactical_advantage),
        }
    }
}

/// Points by key plus an index ordered oldest first.
#[derive(Debug, Default)]
struct Store {
    points: HashMap<DataPointKey, TrainingDataPoint>,
    by_age: BTreeSet<(DateTime<Utc>, DataPointKey)>,
}

impl Store {
    fn insert(&mut self, point: TrainingDataPoint) {
        let key = point.key();
        if let Some(old) = self.points.get(&key) {
            self.by_age.remove(&(old.timestamp, key.clone()));
        }
        self.by_age.insert((point.timestamp, key.clone()));
        self.points.insert(key, point);
    }

    fn evict_oldest(&mut self, count: usize) {
        for _ in 0..count {
            let Some((_, key)) = self.by_age.pop_first() else {
                break;
            };
            self.points.remove(&key);
        }
    }

    fn clear(&mut self) {
        self.points.clear();
        self.by_age.clear();
    }
}

#[derive(Debug, Default)]
pub struct TrainingCorpus {
    config: CorpusConfig,
    store: Mutex<Store>,
}

impl TrainingCorpus {
    #[must_use]
    pub fn new(config: CorpusConfig) -> Self {
        Self {
            config,
            store: Mutex::new(Store::default()),
        }
    }

    /// Builds a corpus by recording `points` in order.
    #[must_use]
    pub fn from_points<I>(config: CorpusConfig, points: I) -> Self
    where
        I: IntoIterator<Item = TrainingDataPoint>,
    {
        let corpus = Self::new(config);
        for point in points {
            corpus.record(point);
        }
        corpus
    }

    #[must_use]
    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `point`, replacing any point with the same key, then evicts if
    /// the corpus is over capacity.
    pub fn record(&self, point: TrainingDataPoint) {
        let mut store = self.lock();
        store.insert(point);

        let evict = self.config.eviction_count(store.points.len());
        if evict == 0 {
            return;
        }
        store.evict_oldest(evict);
        tracing::debug!(evicted = evict, remaining = store.points.len(), "corpus eviction");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().points.is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of every point, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TrainingDataPoint> {
        let store = self.lock();
        store
            .by_age
            .iter()
            .filter_map(|(_, key)| store.points.get(key).cloned())
            .collect()
    }

    #[must_use]
    pub fn statistics(&self) -> CorpusStatistics {
        CorpusStatistics::from_points(self.lock().points.values())
    }

    pub fn write_json<W>(&self, writer: W) -> Result<(), ExportError>
    where
        W: io::Write,
    {
        serde_json::to_writer_pretty(writer, &self.snapshot())?;
        Ok(())
    }

    pub fn write_csv<W>(&self, writer: W) -> Result<(), ExportError>
    where
        W: io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(TRAINING_FEATURE_NAMES.iter().copied().chain(["outcome"]))?;
        for point in self.snapshot() {
            let outcome = point.outcome.to_string();
            let row = feature::extract_training(&point)
                .iter()
                .map(ToString::to_string)
                .chain([outcome])
                .collect::<Vec<_>>();
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn export(&self, format: ExportFormat) -> Result<String, ExportError> {
        let mut buf = vec![];
        match format {
            ExportFormat::Json => self.write_json(&mut buf)?,
            ExportFormat::Csv => self.write_csv(&mut buf)?,
        }
        Ok(String::from_utf8(buf)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use proptest::prelude::*;
    use spellweave_core::{
        ActorDescriptor, CharacterClass, Difficulty, EnvironmentalContext, SpellDescriptor,
    };

    use super::*;
    use crate::data_point::PerformanceMetrics;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::UNIX_EPOCH + Duration::seconds(seconds)
    }

    fn point(primary: &str, actor: &str, seconds: i64) -> TrainingDataPoint {
        TrainingDataPoint {
            primary: SpellDescriptor::new(primary, School::Evocation, 3, ["damage"]),
            secondary: SpellDescriptor::new("Shield", School::Abjuration, 1, ["defense"]),
            actor: ActorDescriptor::new(actor, CharacterClass::Wizard, 5),
            context: EnvironmentalContext::new(Terrain::Dungeon, Difficulty::Easy),
            outcome: OutcomeLabel::Neutral,
            metrics: PerformanceMetrics {
                damage: 10.0,
                efficiency: 0.5,
                tactical_advantage: 0.25,
            },
            compatibility_score: 5.0,
            timestamp: at(seconds),
        }
    }

    #[test]
    fn test_dedup_keeps_latest() {
        let corpus = TrainingCorpus::default();
        corpus.record(point("Fireball", "w", 1));
        let mut newer = point("Fireball", "w", 2);
        newer.outcome = OutcomeLabel::Success;
        corpus.record(newer);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.snapshot()[0].outcome, OutcomeLabel::Success);
    }

    #[test]
    fn test_batch_eviction_drops_oldest_fraction() {
        let corpus = TrainingCorpus::new(CorpusConfig {
            max_size: 10,
            eviction_fraction: 0.2,
        });
        for i in 0..11 {
            corpus.record(point(&format!("spell-{i}"), "w", i));
        }
        // 11 points → ⌊11 × 0.2⌋ = 2 evicted
        assert_eq!(corpus.len(), 9);
        let names = corpus
            .snapshot()
            .into_iter()
            .map(|p| p.primary.name)
            .collect::<Vec<_>>();
        assert_eq!(names.first().map(String::as_str), Some("spell-2"));
        assert_eq!(names.last().map(String::as_str), Some("spell-10"));
    }

    #[test]
    fn test_exact_trim_keeps_newest() {
        let corpus = TrainingCorpus::new(CorpusConfig {
            max_size: 5,
            eviction_fraction: 0.0,
        });
        // recorded out of timestamp order
        for i in [7, 3, 9, 1, 5, 8, 2, 6] {
            corpus.record(point(&format!("spell-{i}"), "w", i));
        }
        assert_eq!(corpus.len(), 5);
        let stamps = corpus
            .snapshot()
            .iter()
            .map(|p| p.timestamp)
            .collect::<Vec<_>>();
        assert_eq!(stamps, [at(5), at(6), at(7), at(8), at(9)]);
    }

    #[test]
    fn test_replaced_point_moves_in_age_order() {
        let corpus = TrainingCorpus::new(CorpusConfig {
            max_size: 2,
            eviction_fraction: 0.0,
        });
        corpus.record(point("a", "w", 1));
        corpus.record(point("b", "w", 2));
        // re-recording "a" makes it the newest
        corpus.record(point("a", "w", 3));
        assert_eq!(corpus.lock().by_age.len(), 2);

        corpus.record(point("c", "w", 4));
        let names = corpus
            .snapshot()
            .into_iter()
            .map(|p| p.primary.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "c"]);
        let store = corpus.lock();
        assert_eq!(store.by_age.len(), store.points.len());
    }

    #[test]
    fn test_empty_statistics() {
        let stats = TrainingCorpus::default().statistics();
        assert_eq!(stats.total, 0);
        for label in OutcomeLabel::ALL {
            assert_eq!(stats.outcome_distribution.get(&label), 0);
        }
        assert_eq!(stats.outcome_distribution.len(), 3);
        assert_eq!(stats.school_counts.len(), School::ALL.len());
        assert!(stats.damage.is_none());
        assert!(stats.efficiency.is_none());
        assert!(stats.tactical_advantage.is_none());
        assert!(serde_json::to_string(&stats).is_ok());
    }

    #[test]
    fn test_statistics_count_both_slots() {
        let corpus = TrainingCorpus::default();
        corpus.record(point("Fireball", "a", 1));
        let mut second = point("Magic Missile", "a", 2);
        second.metrics.damage = 30.0;
        second.outcome = OutcomeLabel::Failure;
        corpus.record(second);

        let stats = corpus.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.school_counts.get(&School::Evocation), 2);
        assert_eq!(stats.school_counts.get(&School::Abjuration), 2);
        assert_eq!(stats.school_counts.get(&School::Necromancy), 0);
        assert_eq!(stats.terrain_counts.get(&Terrain::Dungeon), 2);
        assert_eq!(stats.outcome_distribution.get(&OutcomeLabel::Failure), 1);
        let damage = stats.damage.unwrap();
        assert_eq!(damage.min, 10.0);
        assert_eq!(damage.max, 30.0);
        assert_eq!(damage.mean, 20.0);
    }

    #[test]
    fn test_csv_export() {
        let corpus = TrainingCorpus::default();
        corpus.record(point("Fireball", "w", 1));
        let csv = corpus.export(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some(
                "primary_level,secondary_level,primary_school,secondary_school,actor_level,\
                 actor_class,terrain,difficulty,damage,efficiency,tactical_advantage,outcome"
            )
        );
        assert_eq!(lines.next(), Some("3,1,4,0,5,12,3,0,10,0.5,0.25,neutral"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_json_export_is_nested() {
        let corpus = TrainingCorpus::default();
        corpus.record(point("Fireball", "w", 1));
        let json = corpus.export(ExportFormat::Json).unwrap();
        let parsed: Vec<TrainingDataPoint> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, corpus.snapshot());
        assert!(json.contains("\"tacticalAdvantage\""));
    }

    proptest! {
        #[test]
        fn corpus_never_exceeds_bound(
            max_size in 1usize..20,
            fraction in 0.0f32..0.5,
            stamps in prop::collection::vec(0i64..1_000, 0..60),
        ) {
            let corpus = TrainingCorpus::new(CorpusConfig {
                max_size,
                eviction_fraction: fraction,
            });
            for (i, stamp) in stamps.iter().enumerate() {
                // repeated keys exercise replacement
                corpus.record(point(&format!("s{}", i % 25), "w", *stamp));
                prop_assert!(corpus.len() <= max_size);
                let store = corpus.lock();
                prop_assert_eq!(store.by_age.len(), store.points.len());
            }
        }
    }
}
