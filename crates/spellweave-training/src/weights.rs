//! Weight vector operators for the genetic backend.
//!
//! Genomes are linear-model coefficients, so weights are signed and bounded by
//! a symmetric range `[-max_weight, max_weight]`.
//!
//! - **Initialization**: [`random`] draws each weight uniformly
//! - **Crossover**: [`blx_alpha`] blends two parents with range expansion
//! - **Mutation**: [`mutate`] adds Gaussian noise to a random subset of weights

use rand::Rng;
use rand_distr::Normal;

/// Uniform random weights in `[-max_weight, max_weight]`.
pub fn random<R>(rng: &mut R, max_weight: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    let max_weight = max_weight.abs();
    (0..len)
        .map(|_| rng.random_range(-max_weight..=max_weight))
        .collect()
}

/// BLX-α crossover.
///
/// For each position the child is drawn from `[min − α·d, max + α·d]` where
/// `d` is the distance between the parents, then clamped to the weight range.
/// Extra positions of the longer parent are ignored. A negative or non-finite
/// `alpha` yields the parents' midpoint.
///
/// ```
/// use rand::SeedableRng;
/// use spellweave_training::weights;
///
/// let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(1);
/// let child = weights::blx_alpha(&[0.0, 1.0], &[0.0, -1.0], 0.5, 1.5, &mut rng);
/// assert_eq!(child[0], 0.0);
/// assert!(child[1].abs() <= 1.5);
/// ```
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, max_weight: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    let max_weight = max_weight.abs();
    p1.iter()
        .zip(p2)
        .map(|(&x1, &x2)| {
            let min = x1.min(x2);
            let max = x1.max(x2);
            let d = max - min;
            let lower = min - alpha * d;
            let upper = max + alpha * d;
            let value = if lower.is_finite() && upper.is_finite() && lower <= upper {
                rng.random_range(lower..=upper)
            } else {
                min + d / 2.0
            };
            value.clamp(-max_weight, max_weight)
        })
        .collect()
}

/// Gaussian mutation: each weight is perturbed by `N(0, sigma)` with
/// probability `rate`, then clamped.
///
/// An invalid `sigma` (negative or non-finite) or a NaN `rate` leaves the
/// weights unchanged.
pub fn mutate<R>(weights: &mut [f32], sigma: f32, max_weight: f32, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let Ok(normal) = Normal::new(0.0, sigma) else {
        return;
    };
    if rate.is_nan() {
        return;
    }
    let max_weight = max_weight.abs();
    let rate = f64::from(rate.clamp(0.0, 1.0));
    for w in weights {
        if rng.random_bool(rate) {
            *w = (*w + rng.sample(normal)).clamp(-max_weight, max_weight);
        }
    }
}
