//! Data model shared by every stage of the spell interaction pipeline.
//!
//! This crate defines the values that flow between the pipeline stages:
//!
//! - **Descriptors** ([`descriptor`]) - [`SpellDescriptor`], [`ActorDescriptor`] and
//!   [`EnvironmentalContext`], supplied per query and never mutated
//! - **Categories** ([`category`]) - closed enumerations (school, class, terrain,
//!   difficulty, ability) with an `Unknown` fallback
//! - **Encoders** ([`encoder`]) - total categorical → numeric mappings for feature
//!   extraction
//! - **Analysis** ([`analysis`]) - [`InteractionAnalysis`], the output consumed by
//!   display layers
//!
//! # Pipeline
//!
//! ```text
//! Encoders → Base Analyzer → Plugin Registry → Interaction Cache
//!                                                    ↓
//!                          Training Corpus → Feature Extractor → Prediction Ensemble
//! ```
//!
//! The analyzer, plugins and cache live in `spellweave-analyzer`; the corpus and
//! feature extraction in `spellweave-corpus`; the ensemble in `spellweave-training`.

pub use self::{analysis::*, category::*, descriptor::*};

pub mod analysis;
pub mod category;
pub mod descriptor;
pub mod encoder;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown {kind} '{value}'")]
pub struct ParseCategoryError {
    pub kind: &'static str,
    pub value: String,
}
