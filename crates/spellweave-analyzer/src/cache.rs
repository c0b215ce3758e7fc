//! Memoization of plugin-enhanced analyses.
//!
//! [`InteractionCache::get_or_compute`] runs the base analyzer and the plugin
//! registry once per [`CacheKey`] and serves every later request for the same
//! key from memory. Entries never expire; only [`InteractionCache::clear`] and
//! [`InteractionCache::remove`] change them.
//!
//! # Merging Plugin Results
//!
//! ```text
//! score             = clamp(base score + Σ score_adjustment, 0, 10)
//! interaction_type  = InteractionType::from_score(score)
//! potential_outcomes = base outcomes ++ insights (priority order)
//! risk_factors       = base risks ++ warnings (priority order)
//! ```
//!
//! # Concurrency
//!
//! The entry map sits behind a single mutex, held while a missing entry is
//! computed, so concurrent requests for the same key still compute it once.

use std::{
    collections::HashMap,
    fmt, mem,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use serde::{Deserialize, Serialize};
use spellweave_core::{
    ActorDescriptor, Difficulty, EnvironmentalContext, InteractionAnalysis, SpellDescriptor,
    SpellPair, Terrain,
};

use crate::{
    base_analyzer::{BaseAnalyzer, InteractionAnalyzer},
    plugin::{BoxedPlugin, PluginRegistry, PluginResult},
};

/// Composite key built from the fields that determine an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub primary: String,
    pub secondary: String,
    pub actor_id: String,
    pub terrain: Terrain,
    pub difficulty: Difficulty,
}

impl CacheKey {
    #[must_use]
    pub fn new(
        primary: &SpellDescriptor,
        secondary: &SpellDescriptor,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
    ) -> Self {
        Self {
            primary: primary.name.clone(),
            secondary: secondary.name.clone(),
            actor_id: actor.id.clone(),
            terrain: context.terrain,
            difficulty: context.difficulty,
        }
    }

    fn approximate_bytes(&self) -> usize {
        mem::size_of::<Self>() + self.primary.len() + self.secondary.len() + self.actor_id.len()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.primary, self.secondary, self.actor_id, self.terrain, self.difficulty
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub approximate_bytes: usize,
    pub hits: u64,
    pub misses: u64,
}

fn analysis_bytes(analysis: &InteractionAnalysis) -> usize {
    mem::size_of::<InteractionAnalysis>()
        + analysis
            .potential_outcomes
            .iter()
            .chain(&analysis.risk_factors)
            .map(String::len)
            .sum::<usize>()
}

/// Applies plugin results to a base analysis.
#[must_use]
pub fn merge_plugin_results(
    mut analysis: InteractionAnalysis,
    results: Vec<PluginResult>,
) -> InteractionAnalysis {
    let adjustment = results
        .iter()
        .filter_map(|r| r.score_adjustment)
        .filter(|a| a.is_finite())
        .sum::<f32>();
    analysis.set_score(analysis.compatibility_score + adjustment);
    for result in results {
        analysis.potential_outcomes.extend(result.insights);
        analysis.risk_factors.extend(result.warnings);
    }
    analysis
}

#[derive(Debug)]
pub struct InteractionCache {
    analyzer: Box<dyn InteractionAnalyzer>,
    registry: PluginRegistry,
    entries: Mutex<HashMap<CacheKey, InteractionAnalysis>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for InteractionCache {
    fn default() -> Self {
        Self::new(Box::new(BaseAnalyzer), PluginRegistry::new())
    }
}

impl InteractionCache {
    #[must_use]
    pub fn new(analyzer: Box<dyn InteractionAnalyzer>, registry: PluginRegistry) -> Self {
        Self {
            analyzer,
            registry,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache over the [`BaseAnalyzer`] with the given plugins.
    #[must_use]
    pub fn with_registry(registry: PluginRegistry) -> Self {
        Self::new(Box::new(BaseAnalyzer), registry)
    }

    #[must_use]
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Registers a plugin and drops every cached entry, since they were computed
    /// without it.
    pub fn register_plugin(&mut self, plugin: BoxedPlugin) -> Option<BoxedPlugin> {
        let replaced = self.registry.register(plugin);
        self.clear();
        replaced
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, InteractionAnalysis>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the plugin-enhanced analysis, computing and storing it on first use.
    #[must_use]
    pub fn get_or_compute(
        &self,
        primary: &SpellDescriptor,
        secondary: &SpellDescriptor,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
    ) -> InteractionAnalysis {
        let key = CacheKey::new(primary, secondary, actor, context);
        let mut entries = self.lock();
        if let Some(analysis) = entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(%key, "interaction cache hit");
            return analysis.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(%key, "interaction cache miss");
        let base = self.analyzer.analyze(primary, secondary, actor, context);
        let results = self.registry.process(
            SpellPair::new(primary, secondary),
            actor,
            context,
            &base,
        );
        let analysis = merge_plugin_results(base, results);
        entries.insert(key, analysis.clone());
        analysis
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<InteractionAnalysis> {
        self.lock().get(key).cloned()
    }

    pub fn remove(&self, key: &CacheKey) -> Option<InteractionAnalysis> {
        self.lock().remove(key)
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        tracing::debug!(entries = entries.len(), "clearing interaction cache");
        entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let approximate_bytes = entries
            .iter()
            .map(|(key, analysis)| key.approximate_bytes() + analysis_bytes(analysis))
            .sum();
        CacheStats {
            entries: entries.len(),
            approximate_bytes,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
