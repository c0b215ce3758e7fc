use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use spellweave_corpus::corpus::CorpusConfig;
use spellweave_training::{
    backend::{GeneticConfig, LinearConfig},
    confidence::ConfidenceConfig,
};

/// Tunables of every pipeline stage, loaded from an optional TOML file.
///
/// Missing tables and keys fall back to their defaults:
///
/// ```toml
/// [corpus]
/// max_size = 5000
///
/// [genetic]
/// generations = 40
/// seed = 7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) corpus: CorpusConfig,
    pub(crate) confidence: ConfidenceConfig,
    pub(crate) linear: LinearConfig,
    pub(crate) genetic: GeneticConfig,
}

impl Config {
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
