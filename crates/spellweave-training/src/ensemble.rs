//! Confidence-weighted prediction on top of the interaction cache.
//!
//! # Model State
//!
//! The ensemble starts [`ModelState::Untrained`]. [`PredictionEnsemble::train_from`]
//! fits every backend, builds a [`TrainedEnsemble`] and publishes it by swapping
//! an `Arc` under a write lock. Predictions clone the current `Arc` and never
//! observe a partially built model. A failed or cancelled training run leaves
//! the previous state in place.
//!
//! # Prediction
//!
//! ```text
//! analysis = cache.get_or_compute(...)        plugins applied here, once
//! s = confidence.school(primary.school)
//! t = confidence.terrain(context.terrain)
//! if trained && s > 0.6 && t > 0.5:
//!     score = min(score × (1 + s·t), 10)
//!     + one insight (confidence %), + one risk (uncertainty %)
//! ```
//!
//! In every other case the cached analysis is returned unchanged. The plugin
//! registry is never consulted here.
//!
//! # Persistence
//!
//! [`PredictionEnsemble::save`] captures the published model as a
//! [`SavedEnsemble`]; [`PredictionEnsemble::load`] publishes one without
//! training, so prediction can run in a process that never fits a model.

use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spellweave_analyzer::cache::InteractionCache;
use spellweave_core::{
    ActorDescriptor, EnvironmentalContext, InteractionAnalysis, MAX_SCORE, SpellDescriptor,
};
use spellweave_corpus::{
    corpus::{CorpusStatistics, TrainingCorpus},
    data_point::OutcomeLabel,
    feature,
};

use crate::{
    confidence::{ConfidenceConfig, ModelConfidence},
    control::TrainingControl,
    regressor::{BoxedRegressor, BoxedRegressorBackend, FitError, SavedRegressor},
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum TrainError {
    #[display("cannot train on an empty corpus")]
    EmptyCorpus,
    #[display("no regressor backend produced a model")]
    NoModelTrained,
    #[display("training was cancelled")]
    Cancelled,
}

#[derive(Debug)]
pub struct TrainedEnsemble {
    pub models: Vec<BoxedRegressor>,
    pub confidence: ModelConfidence,
    pub trained_at: DateTime<Utc>,
    pub sample_count: usize,
}

#[derive(Debug, derive_more::IsVariant)]
pub enum ModelState {
    Untrained,
    Trained(TrainedEnsemble),
}

/// Summary of a successful training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    pub sample_count: usize,
    pub models: Vec<String>,
    pub skipped_backends: Vec<String>,
    pub confidence: ModelConfidence,
    pub trained_at: DateTime<Utc>,
}

/// Serialized form of a trained ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEnsemble {
    pub trained_at: DateTime<Utc>,
    pub sample_count: usize,
    pub confidence: ModelConfidence,
    pub models: Vec<SavedRegressor>,
}

/// Outcome predicted by the averaged regressors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeEstimate {
    pub outcome: OutcomeLabel,
    /// Mean regressor output on the ordinal label scale.
    pub raw: f32,
    pub confidence: f32,
}

#[derive(Debug)]
pub struct PredictionEnsemble {
    cache: Arc<InteractionCache>,
    backends: Vec<BoxedRegressorBackend>,
    config: ConfidenceConfig,
    state: RwLock<Arc<ModelState>>,
}

impl PredictionEnsemble {
    #[must_use]
    pub fn new(
        cache: Arc<InteractionCache>,
        backends: Vec<BoxedRegressorBackend>,
        config: ConfidenceConfig,
    ) -> Self {
        Self {
            cache,
            backends,
            config,
            state: RwLock::new(Arc::new(ModelState::Untrained)),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &InteractionCache {
        &self.cache
    }

    /// Current model snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<ModelState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, state: ModelState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(state);
    }

    /// Fits every backend on the corpus and publishes the resulting ensemble.
    ///
    /// Backends that fail are skipped; training succeeds as long as one backend
    /// produces a model. Cancellation aborts the whole run.
    pub fn train_from(
        &self,
        corpus: &TrainingCorpus,
        control: &TrainingControl,
    ) -> Result<TrainingReport, TrainError> {
        let points = corpus.snapshot();
        if points.is_empty() {
            return Err(TrainError::EmptyCorpus);
        }
        let started = Instant::now();
        let features = points.iter().map(feature::extract_point).collect::<Vec<_>>();
        let labels = points.iter().map(feature::extract_label).collect::<Vec<_>>();

        let mut models = vec![];
        let mut skipped_backends = vec![];
        for backend in &self.backends {
            if control.is_cancelled() {
                return Err(TrainError::Cancelled);
            }
            match backend.fit(&features, &labels, control) {
                Ok(model) => models.push(model),
                Err(FitError::Cancelled) => return Err(TrainError::Cancelled),
                Err(err) => {
                    tracing::warn!(backend = backend.name(), error = %err, "backend failed to fit");
                    skipped_backends.push(backend.name().to_owned());
                }
            }
        }
        if models.is_empty() {
            return Err(TrainError::NoModelTrained);
        }

        let confidence =
            ModelConfidence::from_statistics(&CorpusStatistics::from_points(&points), &self.config);
        let trained_at = Utc::now();
        let report = TrainingReport {
            sample_count: points.len(),
            models: models.iter().map(|m| m.name().to_owned()).collect(),
            skipped_backends,
            confidence: confidence.clone(),
            trained_at,
        };
        tracing::info!(
            samples = report.sample_count,
            models = report.models.len(),
            overall_confidence = confidence.overall,
            elapsed = ?started.elapsed(),
            "ensemble trained"
        );
        self.publish(ModelState::Trained(TrainedEnsemble {
            models,
            confidence,
            trained_at,
            sample_count: points.len(),
        }));
        Ok(report)
    }

    /// Snapshot of the published model, `None` while untrained.
    ///
    /// Regressors without a persistable form are left out.
    #[must_use]
    pub fn save(&self) -> Option<SavedEnsemble> {
        let state = self.state();
        let ModelState::Trained(model) = &*state else {
            return None;
        };
        let models = model
            .models
            .iter()
            .filter_map(|m| {
                let saved = m.to_saved();
                if saved.is_none() {
                    tracing::warn!(model = m.name(), "model cannot be saved");
                }
                saved
            })
            .collect();
        Some(SavedEnsemble {
            trained_at: model.trained_at,
            sample_count: model.sample_count,
            confidence: model.confidence.clone(),
            models,
        })
    }

    /// Publishes a previously saved ensemble in place of the current model.
    pub fn load(&self, saved: SavedEnsemble) -> Result<(), TrainError> {
        if saved.models.is_empty() {
            return Err(TrainError::NoModelTrained);
        }
        tracing::info!(
            models = saved.models.len(),
            samples = saved.sample_count,
            trained_at = %saved.trained_at,
            "ensemble loaded"
        );
        self.publish(ModelState::Trained(TrainedEnsemble {
            models: saved
                .models
                .into_iter()
                .map(SavedRegressor::into_regressor)
                .collect(),
            confidence: saved.confidence,
            trained_at: saved.trained_at,
            sample_count: saved.sample_count,
        }));
        Ok(())
    }

    /// Plugin-enhanced analysis, adjusted by model confidence when trained.
    #[must_use]
    pub fn predict(
        &self,
        primary: &SpellDescriptor,
        secondary: &SpellDescriptor,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
    ) -> InteractionAnalysis {
        let analysis = self.cache.get_or_compute(primary, secondary, actor, context);
        let state = self.state();
        let ModelState::Trained(model) = &*state else {
            return analysis;
        };
        let school = model.confidence.school(primary.school);
        let terrain = model.confidence.terrain(context.terrain);
        if school > self.config.school_threshold && terrain > self.config.terrain_threshold {
            apply_confidence(analysis, school, terrain)
        } else {
            analysis
        }
    }

    /// Averages the trained regressors into an outcome estimate.
    ///
    /// Returns `None` while untrained.
    #[must_use]
    pub fn estimate(
        &self,
        primary: &SpellDescriptor,
        secondary: &SpellDescriptor,
        actor: &ActorDescriptor,
        context: &EnvironmentalContext,
    ) -> Option<OutcomeEstimate> {
        let state = self.state();
        let ModelState::Trained(model) = &*state else {
            return None;
        };
        let features = feature::extract(primary, secondary, actor, context);
        let outputs = model
            .models
            .iter()
            .map(|m| m.predict(&features))
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if outputs.is_empty() {
            return None;
        }
        #[expect(clippy::cast_precision_loss)]
        let raw = outputs.iter().sum::<f32>() / outputs.len() as f32;
        Some(OutcomeEstimate {
            outcome: OutcomeLabel::from_ordinal(raw),
            raw,
            confidence: model.confidence.overall,
        })
    }
}

fn apply_confidence(
    mut analysis: InteractionAnalysis,
    school: f32,
    terrain: f32,
) -> InteractionAnalysis {
    let multiplier = 1.0 + school * terrain;
    analysis.set_score((analysis.compatibility_score * multiplier).min(MAX_SCORE));
    analysis.potential_outcomes.push(format!(
        "Model-backed prediction with {:.0}% confidence",
        school * 100.0
    ));
    analysis.risk_factors.push(format!(
        "Prediction uncertainty: {:.0}%",
        (1.0 - school) * 100.0
    ));
    analysis
}
