//! Regressor backends.
//!
//! Both backends fit a linear model over standardized features; they differ in
//! the search strategy. New backends only need to implement
//! [`RegressorBackend`](crate::regressor::RegressorBackend).

use crate::regressor::BoxedRegressorBackend;

pub use self::{
    genetic::{GeneticConfig, GeneticRegressionBackend},
    linear::{LinearConfig, LinearRegressionBackend},
};

pub mod genetic;
pub mod linear;

#[must_use]
pub fn all_backends(linear: LinearConfig, genetic: GeneticConfig) -> Vec<BoxedRegressorBackend> {
    vec![
        Box::new(LinearRegressionBackend::new(linear)),
        Box::new(GeneticRegressionBackend::new(genetic)),
    ]
}
