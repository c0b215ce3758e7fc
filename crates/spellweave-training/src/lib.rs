//! Model training and confidence-weighted prediction.
//!
//! - [`regressor`] - the [`Regressor`](regressor::Regressor) and
//!   [`RegressorBackend`](regressor::RegressorBackend) seams
//! - [`backend`] - gradient-descent and genetic linear regressors
//! - [`confidence`] - population-based confidence per school and terrain
//! - [`ensemble`] - [`PredictionEnsemble`](ensemble::PredictionEnsemble), training
//!   and prediction on top of the interaction cache
//! - [`control`] - cooperative cancellation of long training runs
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use spellweave_analyzer::{cache::InteractionCache, plugin::PluginRegistry};
//! use spellweave_core::{
//!     ActorDescriptor, CharacterClass, Difficulty, EnvironmentalContext, School,
//!     SpellDescriptor, Terrain,
//! };
//! use spellweave_training::{
//!     backend::{self, GeneticConfig, LinearConfig},
//!     confidence::ConfidenceConfig,
//!     ensemble::PredictionEnsemble,
//! };
//!
//! let cache = Arc::new(InteractionCache::with_registry(
//!     PluginRegistry::with_builtin_plugins(),
//! ));
//! let ensemble = PredictionEnsemble::new(
//!     cache,
//!     backend::all_backends(LinearConfig::default(), GeneticConfig::default()),
//!     ConfidenceConfig::default(),
//! );
//!
//! let fireball = SpellDescriptor::new("Fireball", School::Evocation, 3, ["damage", "fire"]);
//! let shield = SpellDescriptor::new("Shield", School::Abjuration, 1, ["defense"]);
//! let actor = ActorDescriptor::new("wizard-1", CharacterClass::Wizard, 10);
//! let context = EnvironmentalContext::new(Terrain::Dungeon, Difficulty::Moderate);
//!
//! // untrained: the cached analysis is returned as is
//! let analysis = ensemble.predict(&fireball, &shield, &actor, &context);
//! assert_eq!(analysis, ensemble.cache().get_or_compute(&fireball, &shield, &actor, &context));
//! ```

pub mod backend;
pub mod confidence;
pub mod control;
pub mod ensemble;
pub mod regressor;
pub mod weights;
