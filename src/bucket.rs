//! Bucket ranges and variation selection.
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range of hash values. Serialized as a `[start, end]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct BucketRange {
    #[allow(missing_docs)]
    pub start: f64,
    #[allow(missing_docs)]
    pub end: f64,
}

impl BucketRange {
    #[allow(missing_docs)]
    pub fn new(start: f64, end: f64) -> BucketRange {
        BucketRange { start, end }
    }

    /// Return `true` if `n` falls within `[start, end)`.
    pub fn contains(&self, n: f64) -> bool {
        self.start <= n && n < self.end
    }
}

impl From<(f64, f64)> for BucketRange {
    fn from((start, end): (f64, f64)) -> Self {
        BucketRange { start, end }
    }
}

impl From<BucketRange> for (f64, f64) {
    fn from(range: BucketRange) -> Self {
        (range.start, range.end)
    }
}

/// Build one bucket range per variation.
///
/// `coverage` is clamped to `[0, 1]`. If `weights` is missing, has the wrong length, or doesn't sum
/// to roughly 1 (`[0.99, 1.01]`), equal weights are used instead. Each range starts at the running
/// sum of the previous weights and covers `coverage * weight` of the space.
pub fn get_bucket_ranges(
    num_variations: usize,
    coverage: f64,
    weights: Option<&[f64]>,
) -> Vec<BucketRange> {
    let coverage = coverage.clamp(0.0, 1.0);

    let equal_weights = || vec![1.0 / num_variations as f64; num_variations];
    let weights = match weights {
        Some(weights) if weights.len() == num_variations => {
            let total: f64 = weights.iter().sum();
            if (0.99..=1.01).contains(&total) {
                weights.to_vec()
            } else {
                log::trace!(target: "growthbook", total; "weights do not add up to 1, using equal weights");
                equal_weights()
            }
        }
        _ => equal_weights(),
    };

    let mut cumulative = 0.0;
    weights
        .into_iter()
        .map(|weight| {
            let start = cumulative;
            cumulative += weight;
            BucketRange::new(start, start + coverage * weight)
        })
        .collect()
}

/// Return the index of the first range containing `n`, or `None` if there's none.
pub fn choose_variation(n: f64, ranges: &[BucketRange]) -> Option<usize> {
    ranges.iter().position(|range| range.contains(n))
}
