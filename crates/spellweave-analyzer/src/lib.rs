//! Rule-based analysis of spell combinations.
//!
//! This crate implements the request path of the pipeline:
//!
//! 1. **Base Analysis** ([`base_analyzer`]) - Scores a spell pair from fixed rule
//!    tables ([`rules`]) and derives outcomes, risks and contextual effectiveness.
//!
//! 2. **Plugins** ([`plugin`]) - Prioritized extensions that adjust the score and
//!    attach insights or warnings. Built-in plugins live in [`plugin::builtin`].
//!
//! 3. **Caching** ([`cache`]) - Memoizes the plugin-enhanced analysis per
//!    (spell pair, actor, terrain, difficulty).
//!
//! # Architecture
//!
//! ```text
//! InteractionCache::get_or_compute
//!     ↓ miss
//! BaseAnalyzer::analyze → PluginRegistry::process → merge → store
//! ```
//!
//! Nothing on this path returns an error. Unknown categories and failing
//! plugins degrade to neutral defaults.
//!
//! # Example
//!
//! ```
//! use spellweave_analyzer::{cache::InteractionCache, plugin::PluginRegistry};
//! use spellweave_core::{
//!     ActorDescriptor, CharacterClass, Difficulty, EnvironmentalContext, School,
//!     SpellDescriptor, Terrain,
//! };
//!
//! let cache = InteractionCache::with_registry(PluginRegistry::with_builtin_plugins());
//! let fireball = SpellDescriptor::new("Fireball", School::Evocation, 3, ["damage", "fire"]);
//! let shield = SpellDescriptor::new("Shield", School::Abjuration, 1, ["defense"]);
//! let actor = ActorDescriptor::new("wizard-1", CharacterClass::Wizard, 10);
//! let context = EnvironmentalContext::new(Terrain::Dungeon, Difficulty::Moderate);
//!
//! let analysis = cache.get_or_compute(&fireball, &shield, &actor, &context);
//! assert!((0.0..=10.0).contains(&analysis.compatibility_score));
//! assert_eq!(cache.stats().misses, 1);
//! ```

pub mod base_analyzer;
pub mod cache;
pub mod plugin;
pub mod rules;
