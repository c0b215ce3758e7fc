//! Backend-agnostic regression interface.
//!
//! A [`RegressorBackend`] is a fitting strategy; fitting produces an immutable
//! [`Regressor`]. The ensemble only talks to these two traits, so backends can
//! be swapped without touching prediction logic.
//!
//! ```text
//! RegressorBackend::fit(features, labels, control)
//!     ↓
//! BoxedRegressor (immutable, shared read-only by predictions)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use spellweave_corpus::feature::FeatureVector;
use spellweave_stats::descriptive::DescriptiveStats;

use crate::control::TrainingControl;

pub trait Regressor: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;
    fn predict(&self, features: &[f32]) -> f32;

    /// Persistable form of the model; `None` if it cannot be saved.
    fn to_saved(&self) -> Option<SavedRegressor> {
        None
    }
}

pub type BoxedRegressor = Box<dyn Regressor>;

pub trait RegressorBackend: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Fits a regressor on `features` and `labels`.
    ///
    /// Implementations check `control` between epochs and return
    /// [`FitError::Cancelled`] once it is set.
    fn fit(
        &self,
        features: &[FeatureVector],
        labels: &[f32],
        control: &TrainingControl,
    ) -> Result<BoxedRegressor, FitError>;
}

pub type BoxedRegressorBackend = Box<dyn RegressorBackend>;

#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum FitError {
    #[display("cannot fit on an empty dataset")]
    EmptyDataset,
    #[display("{features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },
    #[display("feature column {column} has no finite values")]
    NonFiniteFeature { column: usize },
    #[display("loss diverged at epoch {epoch}")]
    NonFiniteLoss { epoch: usize },
    #[display("invalid backend setting: {setting}")]
    InvalidConfig { setting: &'static str },
    #[display("fit was cancelled")]
    Cancelled,
}

pub(crate) fn validate(features: &[FeatureVector], labels: &[f32]) -> Result<(), FitError> {
    if features.len() != labels.len() {
        return Err(FitError::LengthMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }
    if features.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    Ok(())
}

/// Per-column z-score standardization.
///
/// Constant columns standardize to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Standardizer {
    columns: Vec<DescriptiveStats>,
}

impl Standardizer {
    pub fn fit(features: &[FeatureVector]) -> Result<Self, FitError> {
        let width = features.first().map_or(0, FeatureVector::len);
        let columns = (0..width)
            .map(|column| {
                DescriptiveStats::new(features.iter().map(|row| row[column]))
                    .ok_or(FitError::NonFiniteFeature { column })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn transform(&self, features: &[f32]) -> Vec<f32> {
        self.columns
            .iter()
            .zip(features)
            .map(|(stats, &value)| stats.standardize(value))
            .collect()
    }
}

/// Linear model over standardized features: `bias + Σ wᵢ·zᵢ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    name: String,
    standardizer: Standardizer,
    weights: Vec<f32>,
    bias: f32,
}

impl LinearModel {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        standardizer: Standardizer,
        weights: Vec<f32>,
        bias: f32,
    ) -> Self {
        Self {
            name: name.into(),
            standardizer,
            weights,
            bias,
        }
    }
}

/// `bias + Σ wᵢ·zᵢ` over already standardized features.
pub(crate) fn linear_output(weights: &[f32], bias: f32, standardized: &[f32]) -> f32 {
    bias + weights
        .iter()
        .zip(standardized)
        .map(|(w, z)| w * z)
        .sum::<f32>()
}

/// Mean squared error of a linear model over standardized rows.
pub(crate) fn mean_squared_error(
    weights: &[f32],
    bias: f32,
    rows: &[Vec<f32>],
    labels: &[f32],
) -> f32 {
    if rows.is_empty() {
        return 0.0;
    }
    let sum = rows
        .iter()
        .zip(labels)
        .map(|(row, label)| {
            let err = linear_output(weights, bias, row) - label;
            err * err
        })
        .sum::<f32>();
    #[expect(clippy::cast_precision_loss)]
    let mse = sum / rows.len() as f32;
    mse
}

impl Regressor for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> f32 {
        linear_output(&self.weights, self.bias, &self.standardizer.transform(features))
    }

    fn to_saved(&self) -> Option<SavedRegressor> {
        Some(SavedRegressor::Linear(self.clone()))
    }
}

/// Serialized regressor, tagged by model kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavedRegressor {
    Linear(LinearModel),
}

impl SavedRegressor {
    #[must_use]
    pub fn into_regressor(self) -> BoxedRegressor {
        match self {
            Self::Linear(model) => Box::new(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f32) -> FeatureVector {
        FeatureVector::from([x, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0])
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate(&[], &[]), Err(FitError::EmptyDataset));
        assert_eq!(
            validate(&[row(1.0)], &[]),
            Err(FitError::LengthMismatch {
                features: 1,
                labels: 0
            })
        );
        assert!(validate(&[row(1.0)], &[0.0]).is_ok());
    }

    #[test]
    fn test_standardizer_zeroes_constant_columns() {
        let standardizer = Standardizer::fit(&[row(1.0), row(3.0)]).unwrap();
        assert_eq!(standardizer.width(), 8);
        let z = standardizer.transform(&row(3.0));
        assert!((z[0] - 1.0).abs() < 1e-6);
        assert!(z[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_linear_model_predicts() {
        let standardizer = Standardizer::fit(&[row(1.0), row(3.0)]).unwrap();
        let model = LinearModel::new("m", standardizer, vec![0.5; 8], 1.0);
        assert!((model.predict(&row(3.0)) - 1.5).abs() < 1e-6);
        assert!((model.predict(&row(1.0)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_saved_model_predicts_the_same() {
        let standardizer = Standardizer::fit(&[row(1.0), row(3.0)]).unwrap();
        let model = LinearModel::new("m", standardizer, vec![0.5; 8], 1.0);
        let saved = model.to_saved().unwrap();
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["kind"], "linear");
        assert_eq!(json["name"], "m");

        let restored = serde_json::from_value::<SavedRegressor>(json)
            .unwrap()
            .into_regressor();
        assert_eq!(restored.name(), "m");
        assert_eq!(restored.predict(&row(3.0)), model.predict(&row(3.0)));
    }
}
