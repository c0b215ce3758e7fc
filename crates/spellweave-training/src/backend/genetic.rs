//! Genetic search over linear-model coefficients.
//!
//! Each individual is a genome of `width + 1` signed weights (the last one is
//! the bias) applied to z-score standardized features. Fitness is the negative
//! mean squared error, so higher is better.
//!
//! # Generation Cycle
//!
//! 1. **Evaluate** - Fitness of every individual, in parallel
//! 2. **Elitism** - The best `elite_count` genomes survive unchanged
//! 3. **Tournament Selection** - Parents are the fittest of `tournament_size` random picks
//! 4. **BLX-α Crossover** - Children blend both parents ([`weights::blx_alpha`])
//! 5. **Gaussian Mutation** - Random perturbation of some weights ([`weights::mutate`])
//!
//! Elitism keeps the best fitness monotonically non-decreasing across generations.

use std::thread;

use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use spellweave_corpus::feature::FeatureVector;

use crate::{
    control::TrainingControl,
    regressor::{
        self, BoxedRegressor, FitError, LinearModel, RegressorBackend, Standardizer,
        mean_squared_error,
    },
    weights,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub max_weight: f32,
    pub blx_alpha: f32,
    pub mutation_sigma: f32,
    pub mutation_rate: f32,
    /// Fixed seed for reproducible fits; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            generations: 80,
            elite_count: 2,
            tournament_size: 3,
            max_weight: 4.0,
            blx_alpha: 0.3,
            mutation_sigma: 0.2,
            mutation_rate: 0.3,
            seed: None,
        }
    }
}

impl GeneticConfig {
    /// Rejects settings the weight operators cannot sample from.
    pub fn validate(&self) -> Result<(), FitError> {
        let checks = [
            (
                self.max_weight.is_finite() && self.max_weight > 0.0,
                "max_weight",
            ),
            (
                self.blx_alpha.is_finite() && self.blx_alpha >= 0.0,
                "blx_alpha",
            ),
            (
                self.mutation_sigma.is_finite() && self.mutation_sigma >= 0.0,
                "mutation_sigma",
            ),
            ((0.0..=1.0).contains(&self.mutation_rate), "mutation_rate"),
        ];
        match checks.into_iter().find(|&(ok, _)| !ok) {
            Some((_, setting)) => Err(FitError::InvalidConfig { setting }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
struct Individual {
    genome: Vec<f32>,
    fitness: f32,
}

impl Individual {
    fn random<R>(rng: &mut R, max_weight: f32, len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            genome: weights::random(rng, max_weight, len),
            fitness: f32::MIN,
        }
    }

    /// Coefficients and bias.
    fn split(&self) -> (&[f32], f32) {
        const NO_WEIGHTS: &[f32] = &[];
        match self.genome.split_last() {
            Some((&bias, weights)) => (weights, bias),
            None => (NO_WEIGHTS, 0.0),
        }
    }
}

fn evaluate_fitness(individuals: &mut [Individual], rows: &[Vec<f32>], labels: &[f32]) {
    thread::scope(|s| {
        for ind in individuals.iter_mut() {
            s.spawn(move || {
                let (weights, bias) = ind.split();
                let mse = mean_squared_error(weights, bias, rows, labels);
                ind.fitness = if mse.is_finite() { -mse } else { f32::MIN };
            });
        }
    });

    // sort by fitness descending
    individuals.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}

fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Individual>
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size.max(1))
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
}

#[derive(Debug, Clone, Default)]
pub struct GeneticRegressionBackend {
    config: GeneticConfig,
}

impl GeneticRegressionBackend {
    pub const NAME: &'static str = "genetic-regression";

    #[must_use]
    pub fn new(config: GeneticConfig) -> Self {
        Self { config }
    }

    fn evolve<R>(&self, population: &[Individual], rng: &mut R) -> Vec<Individual>
    where
        R: Rng + ?Sized,
    {
        let GeneticConfig {
            elite_count,
            tournament_size,
            max_weight,
            blx_alpha,
            mutation_sigma,
            mutation_rate,
            ..
        } = self.config;

        let mut next = population
            .iter()
            .take(elite_count)
            .cloned()
            .collect::<Vec<_>>();
        while next.len() < population.len() {
            let (Some(p1), Some(p2)) = (
                tournament_select(population, tournament_size, rng),
                tournament_select(population, tournament_size, rng),
            ) else {
                break;
            };
            let mut child = weights::blx_alpha(&p1.genome, &p2.genome, blx_alpha, max_weight, rng);
            weights::mutate(&mut child, mutation_sigma, max_weight, mutation_rate, rng);
            next.push(Individual {
                genome: child,
                fitness: f32::MIN,
            });
        }
        next
    }
}

impl RegressorBackend for GeneticRegressionBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fit(
        &self,
        features: &[FeatureVector],
        labels: &[f32],
        control: &TrainingControl,
    ) -> Result<BoxedRegressor, FitError> {
        self.config.validate()?;
        regressor::validate(features, labels)?;
        let standardizer = Standardizer::fit(features)?;
        let rows = features
            .iter()
            .map(|row| standardizer.transform(row))
            .collect::<Vec<_>>();

        let mut rng = match self.config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_rng(&mut rand::rng()),
        };
        let genome_len = standardizer.width() + 1;
        let mut population = (0..self.config.population_size.max(1))
            .map(|_| Individual::random(&mut rng, self.config.max_weight, genome_len))
            .collect::<Vec<_>>();
        evaluate_fitness(&mut population, &rows, labels);

        for generation in 0..self.config.generations {
            if control.is_cancelled() {
                tracing::debug!(generation, "genetic regression cancelled");
                return Err(FitError::Cancelled);
            }
            population = self.evolve(&population, &mut rng);
            evaluate_fitness(&mut population, &rows, labels);
            tracing::trace!(
                generation,
                best_fitness = population.first().map(|ind| ind.fitness),
                "genetic regression generation"
            );
        }

        let best = population.first().ok_or(FitError::EmptyDataset)?;
        if best.fitness <= f32::MIN {
            return Err(FitError::NonFiniteLoss {
                epoch: self.config.generations,
            });
        }
        tracing::debug!(
            generations = self.config.generations,
            mse = -best.fitness,
            "genetic regression fitted"
        );
        let (weights, bias) = best.split();
        Ok(Box::new(LinearModel::new(
            Self::NAME,
            standardizer,
            weights.to_vec(),
            bias,
        )))
    }
}
