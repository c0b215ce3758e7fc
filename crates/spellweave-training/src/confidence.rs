//! Population-based confidence of the trained ensemble.
//!
//! ```text
//! overall        = min(corpus size / 5000, 0.9)
//! school[s]      = min(appearances of s in either slot / 500, 0.8)
//! terrain[t]     = min(points recorded in t / 300, 0.7)
//! ```
//!
//! The caps keep the model from ever reporting certainty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spellweave_core::{School, Terrain};
use spellweave_corpus::corpus::CorpusStatistics;
use spellweave_stats::counts::capped_ratio;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub overall_divisor: f32,
    pub overall_cap: f32,
    pub school_divisor: f32,
    pub school_cap: f32,
    pub terrain_divisor: f32,
    pub terrain_cap: f32,
    /// School confidence must exceed this for a prediction to be adjusted.
    pub school_threshold: f32,
    /// Terrain confidence must exceed this for a prediction to be adjusted.
    pub terrain_threshold: f32,
    /// Confidence reported for categories absent from the corpus statistics.
    pub default_confidence: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            overall_divisor: 5000.0,
            overall_cap: 0.9,
            school_divisor: 500.0,
            school_cap: 0.8,
            terrain_divisor: 300.0,
            terrain_cap: 0.7,
            school_threshold: 0.6,
            terrain_threshold: 0.5,
            default_confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfidence {
    pub overall: f32,
    pub per_school: BTreeMap<School, f32>,
    pub per_terrain: BTreeMap<Terrain, f32>,
    default_confidence: f32,
}

impl ModelConfidence {
    #[must_use]
    pub fn from_statistics(stats: &CorpusStatistics, config: &ConfidenceConfig) -> Self {
        let per_school = stats
            .school_counts
            .iter()
            .map(|(&school, count)| {
                let confidence = capped_ratio(count, config.school_divisor, config.school_cap);
                (school, confidence)
            })
            .collect();
        let per_terrain = stats
            .terrain_counts
            .iter()
            .map(|(&terrain, count)| {
                let confidence = capped_ratio(count, config.terrain_divisor, config.terrain_cap);
                (terrain, confidence)
            })
            .collect();
        Self {
            overall: capped_ratio(stats.total, config.overall_divisor, config.overall_cap),
            per_school,
            per_terrain,
            default_confidence: config.default_confidence,
        }
    }

    #[must_use]
    pub fn school(&self, school: School) -> f32 {
        self.per_school
            .get(&school)
            .copied()
            .unwrap_or(self.default_confidence)
    }

    #[must_use]
    pub fn terrain(&self, terrain: Terrain) -> f32 {
        self.per_terrain
            .get(&terrain)
            .copied()
            .unwrap_or(self.default_confidence)
    }
}
