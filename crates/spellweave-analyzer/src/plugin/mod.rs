//! Extension point for third-party scoring logic.
//!
//! A plugin inspects a spell combination (together with the base analysis)
//! and may propose a score adjustment, insights, warnings and combo
//! suggestions. Plugins are collected in a [`PluginRegistry`] that is built
//! explicitly by the caller and injected into the
//! [`InteractionCache`](crate::cache::InteractionCache); there is no global
//! registry.
//!
//! # Processing Rules
//!
//! - Plugins run in descending priority order (ties keep registration order)
//! - Every plugin sees the same base analysis; plugins never see each other's output
//! - Only results with `modified == true` are kept
//! - A plugin that returns an error or panics is skipped; the batch continues
//!
//! # Example
//!
//! ```
//! use spellweave_analyzer::plugin::{PluginRegistry, builtin::ElementalResonancePlugin};
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(Box::new(ElementalResonancePlugin));
//! assert_eq!(registry.len(), 1);
//! ```

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
};

use serde::{Deserialize, Serialize};
use spellweave_core::{ActorDescriptor, EnvironmentalContext, InteractionAnalysis, SpellPair};

pub mod builtin;

/// A named, versioned, prioritized interaction extension.
///
/// `process` must be pure: the same inputs always produce the same result.
pub trait InteractionPlugin: fmt::Debug + Send + Sync {
    /// Unique name; registering another plugin with the same name replaces this one.
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    /// Higher priorities run first.
    fn priority(&self) -> i32;

    fn process(
        &self,
        pair: SpellPair<'_>,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
        analysis: &InteractionAnalysis,
    ) -> Result<PluginResult, PluginError>;
}

pub type BoxedPlugin = Box<dyn InteractionPlugin>;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("plugin '{plugin}' failed: {reason}")]
pub struct PluginError {
    pub plugin: String,
    pub reason: String,
}

impl PluginError {
    #[must_use]
    pub fn new(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }
}

/// A combination a plugin recommends, referencing spells by name.
///
/// Plugins must name real spells; the registry never fills these in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboSuggestion {
    pub primary: String,
    pub secondary: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginResult {
    pub modified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_adjustment: Option<f32>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub combo_suggestions: Vec<ComboSuggestion>,
}

impl PluginResult {
    /// A result that leaves the analysis untouched.
    #[must_use]
    pub fn unmodified() -> Self {
        Self::default()
    }

    /// A modifying result with no content yet.
    #[must_use]
    pub fn modified() -> Self {
        Self {
            modified: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_adjustment(mut self, adjustment: f32) -> Self {
        self.modified = true;
        *self.score_adjustment.get_or_insert(0.0) += adjustment;
        self
    }

    #[must_use]
    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.modified = true;
        self.insights.push(insight.into());
        self
    }

    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.modified = true;
        self.warnings.push(warning.into());
        self
    }

    #[must_use]
    pub fn with_combo(mut self, combo: ComboSuggestion) -> Self {
        self.modified = true;
        self.combo_suggestions.push(combo);
        self
    }
}

/// Ordered collection of plugins.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<BoxedPlugin>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in plugin registered.
    #[must_use]
    pub fn with_builtin_plugins() -> Self {
        let mut registry = Self::new();
        for plugin in builtin::all_builtin_plugins() {
            registry.register(plugin);
        }
        registry
    }

    /// Registers `plugin`, replacing any plugin with the same name.
    ///
    /// Returns the replaced plugin, if any.
    pub fn register(&mut self, plugin: BoxedPlugin) -> Option<BoxedPlugin> {
        tracing::debug!(
            plugin = plugin.name(),
            version = plugin.version(),
            priority = plugin.priority(),
            "registering plugin"
        );
        let replaced = match self.plugins.iter().position(|p| p.name() == plugin.name()) {
            Some(index) => Some(std::mem::replace(&mut self.plugins[index], plugin)),
            None => {
                self.plugins.push(plugin);
                None
            }
        };
        // stable: equal priorities keep registration order
        self.plugins.sort_by_key(|p| std::cmp::Reverse(p.priority()));
        replaced
    }

    pub fn unregister(&mut self, name: &str) -> Option<BoxedPlugin> {
        let index = self.plugins.iter().position(|p| p.name() == name)?;
        Some(self.plugins.remove(index))
    }

    /// Plugins in execution order.
    pub fn plugins(&self) -> impl Iterator<Item = &(dyn InteractionPlugin + 'static)> {
        self.plugins.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Runs every plugin against the base analysis.
    ///
    /// Returns the modifying results in priority order. Failing plugins are
    /// logged and skipped.
    #[must_use]
    pub fn process(
        &self,
        pair: SpellPair<'_>,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
        analysis: &InteractionAnalysis,
    ) -> Vec<PluginResult> {
        self.plugins
            .iter()
            .filter_map(|plugin| {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    plugin.process(pair, actor, context, analysis)
                }));
                match outcome {
                    Ok(Ok(result)) => result.modified.then_some(result),
                    Ok(Err(err)) => {
                        tracing::warn!(plugin = plugin.name(), error = %err, "plugin failed");
                        None
                    }
                    Err(_) => {
                        tracing::warn!(plugin = plugin.name(), "plugin panicked");
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use spellweave_core::{
        CharacterClass, ContextualEffectiveness, Difficulty, School, SpellDescriptor, Terrain,
    };

    use super::*;

    #[derive(Debug)]
    struct FixedPlugin {
        name: &'static str,
        priority: i32,
        result: PluginResult,
    }

    impl InteractionPlugin for FixedPlugin {
        fn name(&self) -> &str {
            self.name
        }

        fn version(&self) -> &str {
            "0.1.0"
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn process(
            &self,
            _pair: SpellPair<'_>,
            _actor: &ActorDescriptor,
            _context: &EnvironmentalContext,
            _analysis: &InteractionAnalysis,
        ) -> Result<PluginResult, PluginError> {
            Ok(self.result.clone())
        }
    }

    #[derive(Debug)]
    struct FailingPlugin;

    impl InteractionPlugin for FailingPlugin {
        fn name(&self) -> &str {
            "failing"
        }

        fn version(&self) -> &str {
            "0.0.1"
        }

        fn priority(&self) -> i32 {
            100
        }

        fn process(
            &self,
            _pair: SpellPair<'_>,
            _actor: &ActorDescriptor,
            _context: &EnvironmentalContext,
            _analysis: &InteractionAnalysis,
        ) -> Result<PluginResult, PluginError> {
            Err(PluginError::new(self.name(), "unsupported input"))
        }
    }

    #[derive(Debug)]
    struct PanickingPlugin;

    impl InteractionPlugin for PanickingPlugin {
        fn name(&self) -> &str {
            "panicking"
        }

        fn version(&self) -> &str {
            "0.0.1"
        }

        fn priority(&self) -> i32 {
            50
        }

        fn process(
            &self,
            _pair: SpellPair<'_>,
            _actor: &ActorDescriptor,
            _context: &EnvironmentalContext,
            _analysis: &InteractionAnalysis,
        ) -> Result<PluginResult, PluginError> {
            panic!("plugin bug");
        }
    }

    fn fixed(name: &'static str, priority: i32, insight: &str) -> BoxedPlugin {
        Box::new(FixedPlugin {
            name,
            priority,
            result: PluginResult::modified().with_insight(insight),
        })
    }

    fn run(registry: &PluginRegistry) -> Vec<PluginResult> {
        let a = SpellDescriptor::new("A", School::Evocation, 1, ["fire"]);
        let b = SpellDescriptor::new("B", School::Evocation, 1, ["fire"]);
        let actor = ActorDescriptor::new("x", CharacterClass::Wizard, 1);
        let context = EnvironmentalContext::new(Terrain::Forest, Difficulty::Easy);
        let analysis = InteractionAnalysis::new(
            5.0,
            ContextualEffectiveness {
                terrain: 0.5,
                difficulty: 0.4,
            },
            vec![],
            vec![],
        );
        registry.process(SpellPair::new(&a, &b), &actor, &context, &analysis)
    }

    #[test]
    fn test_sorted_by_descending_priority() {
        let mut registry = PluginRegistry::new();
        registry.register(fixed("low", 5, "low"));
        registry.register(fixed("high", 10, "high"));
        registry.register(fixed("mid", 7, "mid"));
        let names = registry.plugins().map(|p| p.name().to_owned()).collect::<Vec<_>>();
        assert_eq!(names, ["high", "mid", "low"]);

        let insights = run(&registry)
            .into_iter()
            .flat_map(|r| r.insights)
            .collect::<Vec<_>>();
        assert_eq!(insights, ["high", "mid", "low"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = PluginRegistry::new();
        assert!(registry.register(fixed("p", 1, "first")).is_none());
        let replaced = registry.register(fixed("p", 20, "second"));
        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        let results = run(&registry);
        assert_eq!(results[0].insights, ["second"]);
    }

    #[test]
    fn test_unmodified_results_are_dropped() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(FixedPlugin {
            name: "noop",
            priority: 1,
            result: PluginResult::unmodified(),
        }));
        registry.register(fixed("real", 0, "kept"));
        let results = run(&registry);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].insights, ["kept"]);
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(FailingPlugin));
        registry.register(Box::new(PanickingPlugin));
        registry.register(fixed("survivor", 1, "still here"));
        let results = run(&registry);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].insights, ["still here"]);
    }

    #[test]
    fn test_unregister() {
        let mut registry = PluginRegistry::new();
        registry.register(fixed("a", 1, "a"));
        assert!(registry.unregister("a").is_some());
        assert!(registry.unregister("a").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_result_builders() {
        let result = PluginResult::unmodified()
            .with_adjustment(0.5)
            .with_adjustment(-0.25)
            .with_warning("careful");
        assert!(result.modified);
        assert_eq!(result.score_adjustment, Some(0.25));
        assert_eq!(result.warnings, ["careful"]);
    }
}
