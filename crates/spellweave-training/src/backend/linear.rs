//! Batch gradient descent on z-score standardized features.

use serde::{Deserialize, Serialize};
use spellweave_corpus::feature::FeatureVector;

use crate::{
    control::TrainingControl,
    regressor::{
        self, BoxedRegressor, FitError, LinearModel, RegressorBackend, Standardizer,
        linear_output, mean_squared_error,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    pub epochs: usize,
    pub learning_rate: f32,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            epochs: 500,
            learning_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinearRegressionBackend {
    config: LinearConfig,
}

impl LinearRegressionBackend {
    pub const NAME: &'static str = "linear-regression";

    #[must_use]
    pub fn new(config: LinearConfig) -> Self {
        Self { config }
    }
}

impl RegressorBackend for LinearRegressionBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fit(
        &self,
        features: &[FeatureVector],
        labels: &[f32],
        control: &TrainingControl,
    ) -> Result<BoxedRegressor, FitError> {
        regressor::validate(features, labels)?;
        let standardizer = Standardizer::fit(features)?;
        let rows = features
            .iter()
            .map(|row| standardizer.transform(row))
            .collect::<Vec<_>>();

        #[expect(clippy::cast_precision_loss)]
        let n = rows.len() as f32;
        let lr = self.config.learning_rate;
        let mut weights = vec![0.0; standardizer.width()];
        let mut bias = 0.0;
        let mut grad = vec![0.0; weights.len()];

        for epoch in 0..self.config.epochs {
            if control.is_cancelled() {
                tracing::debug!(epoch, "linear regression cancelled");
                return Err(FitError::Cancelled);
            }

            grad.fill(0.0);
            let mut grad_bias = 0.0;
            for (row, &label) in rows.iter().zip(labels) {
                let err = linear_output(&weights, bias, row) - label;
                for (g, z) in grad.iter_mut().zip(row) {
                    *g += err * z;
                }
                grad_bias += err;
            }
            for (w, g) in weights.iter_mut().zip(&grad) {
                *w -= lr * 2.0 * g / n;
            }
            bias -= lr * 2.0 * grad_bias / n;

            if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                return Err(FitError::NonFiniteLoss { epoch });
            }
            if epoch % 100 == 0 {
                tracing::trace!(
                    epoch,
                    mse = mean_squared_error(&weights, bias, &rows, labels),
                    "linear regression epoch"
                );
            }
        }

        let mse = mean_squared_error(&weights, bias, &rows, labels);
        tracing::debug!(epochs = self.config.epochs, mse, "linear regression fitted");
        Ok(Box::new(LinearModel::new(Self::NAME, standardizer, weights, bias)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> (Vec<FeatureVector>, Vec<f32>) {
        let mut features = vec![];
        let mut labels = vec![];
        for i in 0..30_u8 {
            let x = f32::from(i % 3);
            features.push(FeatureVector::from([x, 2.0, 4.0, 0.0, 10.0, 12.0, 3.0, 1.0]));
            labels.push(x);
        }
        (features, labels)
    }

    #[test]
    fn test_fits_linear_relation() {
        let (features, labels) = dataset();
        let backend = LinearRegressionBackend::new(LinearConfig {
            epochs: 1000,
            learning_rate: 0.1,
        });
        let model = backend.fit(&features, &labels, &TrainingControl::new()).unwrap();
        assert_eq!(model.name(), LinearRegressionBackend::NAME);
        for (row, label) in features.iter().zip(&labels).take(3) {
            assert!((model.predict(row) - label).abs() < 0.05);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        let backend = LinearRegressionBackend::default();
        let control = TrainingControl::new();
        assert_eq!(
            backend.fit(&[], &[], &control).unwrap_err(),
            FitError::EmptyDataset
        );
        let (features, _) = dataset();
        assert!(
            backend
                .fit(&features, &[1.0], &control)
                .unwrap_err()
                .is_length_mismatch()
        );
    }

    #[test]
    fn test_cancelled_before_first_epoch() {
        let (features, labels) = dataset();
        let control = TrainingControl::new();
        control.cancel();
        assert_eq!(
            LinearRegressionBackend::default()
                .fit(&features, &labels, &control)
                .unwrap_err(),
            FitError::Cancelled
        );
    }

    #[test]
    fn test_divergence_is_reported() {
        let (features, labels) = dataset();
        let backend = LinearRegressionBackend::new(LinearConfig {
            epochs: 2000,
            learning_rate: 1e6,
        });
        assert!(
            backend
                .fit(&features, &labels, &TrainingControl::new())
                .unwrap_err()
                .is_non_finite_loss()
        );
    }
}
