use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Occurrence counts per category.
///
/// Buckets created with [`CategoryCounts::with_keys`] start at zero and stay
/// present even when nothing was counted, so consumers can rely on every
/// expected key existing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for CategoryCounts<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> CategoryCounts<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates counts with a zeroed bucket for each key.
    ///
    /// ```
    /// # use spellweave_stats::counts::CategoryCounts;
    /// let counts = CategoryCounts::with_keys(["a", "b"]);
    /// assert_eq!(counts.get(&"a"), 0);
    /// assert_eq!(counts.len(), 2);
    /// ```
    #[must_use]
    pub fn with_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        Self {
            counts: keys.into_iter().map(|k| (k, 0)).collect(),
        }
    }

    pub fn increment(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    #[must_use]
    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of buckets (including zero buckets).
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Fraction of all counts that fall in `key`, `0.0` when nothing was counted.
    #[must_use]
    pub fn share(&self, key: &K) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        #[expect(clippy::cast_precision_loss)]
        let share = self.get(key) as f32 / total as f32;
        share
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, c)| (k, *c))
    }
}

/// Confidence derived from a population count: `min(count / divisor, cap)`.
///
/// A non-positive divisor yields `0.0`.
///
/// ```
/// # use spellweave_stats::counts::capped_ratio;
/// assert_eq!(capped_ratio(250, 500.0, 0.8), 0.5);
/// assert_eq!(capped_ratio(10_000, 500.0, 0.8), 0.8);
/// ```
#[must_use]
pub fn capped_ratio(count: usize, divisor: f32, cap: f32) -> f32 {
    if divisor <= 0.0 {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss)]
    let ratio = count as f32 / divisor;
    ratio.min(cap)
}
