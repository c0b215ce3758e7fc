use serde::{Deserialize, Serialize};

/// Descriptive statistics summarizing a metric.
///
/// Construction returns `None` for an empty dataset, so callers never see a
/// mean computed as `0 / 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of values summarized.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f32,
    /// The maximum value in the dataset.
    pub max: f32,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f32,
    /// The population standard deviation of the dataset.
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics over `values`, skipping non-finite entries.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if at least one finite value was seen
    /// * `None` - if the dataset is empty (or contains only NaN/infinite values)
    ///
    /// # Examples
    ///
    /// ```
    /// # use spellweave_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    ///
    /// assert!(DescriptiveStats::new(Vec::<f32>::new()).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        // Welford's online algorithm, accumulated in f64
        let mut count = 0_usize;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut mean = 0.0_f64;
        let mut m2 = 0.0_f64;
        for value in values.into_iter().filter(|v| v.is_finite()) {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            let x = f64::from(value);
            #[expect(clippy::cast_precision_loss)]
            let n = count as f64;
            let delta = x - mean;
            mean += delta / n;
            m2 += delta * (x - mean);
        }
        if count == 0 {
            return None;
        }
        #[expect(clippy::cast_precision_loss)]
        let variance = m2 / count as f64;
        #[expect(clippy::cast_possible_truncation)]
        let (mean, std_dev) = (mean as f32, variance.sqrt() as f32);
        Some(Self {
            count,
            min,
            max,
            mean,
            std_dev,
        })
    }

    /// Scales `value` to its z-score, or `0.0` when the data has no spread.
    #[must_use]
    pub fn standardize(&self, value: f32) -> f32 {
        if self.std_dev > f32::EPSILON {
            (value - self.mean) / self.std_dev
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([4.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 4.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.standardize(10.0), 0.0);
    }

    #[test]
    fn test_skips_non_finite() {
        let stats = DescriptiveStats::new([1.0, f32::NAN, 3.0, f32::INFINITY]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
        assert!(DescriptiveStats::new([f32::NAN]).is_none());
    }

    #[test]
    fn test_std_dev() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-6);
        assert!((stats.std_dev - 2.0).abs() < 1e-6);
        assert!((stats.standardize(7.0) - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn mean_is_between_min_and_max(values in prop::collection::vec(-1000.0f32..1000.0, 1..64)) {
            let stats = DescriptiveStats::new(values.iter().copied()).unwrap();
            prop_assert!(stats.min <= stats.max);
            prop_assert!(stats.mean >= stats.min - 1e-3);
            prop_assert!(stats.mean <= stats.max + 1e-3);
            prop_assert!(stats.std_dev >= 0.0);
        }
    }
}
