/// Central limit theorem toy: histogram of means of a few uniform draws.
///
/// Each sample is the sum of `SAMPLE_SIZE` uniforms on `[0, 1)`, divided by
/// `SAMPLE_SIZE` and mapped onto `BUCKET_COUNT` buckets by rounding. The
/// histogram fills into a bell shape centred on the middle bucket.
use rand::Rng;

pub const BUCKET_COUNT: usize = 21;

/// Uniform draws summed per sample.
pub const SAMPLE_SIZE: usize = 5;

/// Samples added per batch (one press of "Add 50 Samples").
pub const BATCH_SIZE: usize = 50;

/// Pause between samples when a batch is animated.
pub const SAMPLE_DELAY_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CltHistogram {
    buckets: [u64; BUCKET_COUNT],
    sample_count: u64,
    /// Running total of the sample means, before bucketing.
    mean_total: f64,
}

impl Default for CltHistogram {
    fn default() -> Self {
        CltHistogram {
            buckets: [0; BUCKET_COUNT],
            sample_count: 0,
            mean_total: 0.0,
        }
    }
}

/// Bucket index for a sample mean in `[0, 1]`.
pub fn bucket_for(mean: f64) -> usize {
    let idx = (mean.clamp(0.0, 1.0) * (BUCKET_COUNT - 1) as f64).round() as usize;
    idx.min(BUCKET_COUNT - 1)
}

impl CltHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one sample, record it, and return the bucket it landed in.
    pub fn add_sample(&mut self, rng: &mut impl Rng) -> usize {
        let sum: f64 = (0..SAMPLE_SIZE).map(|_| rng.random::<f64>()).sum();
        let mean = sum / SAMPLE_SIZE as f64;
        let bucket = bucket_for(mean);
        self.buckets[bucket] += 1;
        self.sample_count += 1;
        self.mean_total += mean;
        bucket
    }

    pub fn add_samples(&mut self, rng: &mut impl Rng, count: usize) {
        for _ in 0..count {
            self.add_sample(rng);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn buckets(&self) -> &[u64; BUCKET_COUNT] {
        &self.buckets
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Tallest bucket, never below 1 so it can be used as a divisor.
    pub fn max_bucket(&self) -> u64 {
        self.buckets.iter().copied().max().unwrap_or(0).max(1)
    }

    /// Mean of the recorded sample means, in `[0, 1]`. `None` before the
    /// first sample.
    pub fn mean(&self) -> Option<f64> {
        if self.sample_count == 0 {
            return None;
        }
        Some(self.mean_total / self.sample_count as f64)
    }

    /// Bar heights as a percentage of the tallest bucket.
    pub fn heights_percent(&self) -> Vec<f64> {
        let max = self.max_bucket() as f64;
        self.buckets.iter().map(|&c| c as f64 / max * 100.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bucket_mapping_edges() {
        assert_eq!(bucket_for(0.0), 0);
        assert_eq!(bucket_for(0.5), 10);
        assert_eq!(bucket_for(1.0), 20);
        assert_eq!(bucket_for(0.024), 0);
        assert_eq!(bucket_for(0.026), 1);
    }

    #[test]
    fn test_counts_add_up() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut hist = CltHistogram::new();
        hist.add_samples(&mut rng, BATCH_SIZE * 3);
        assert_eq!(hist.sample_count(), 150);
        assert_eq!(hist.buckets().iter().sum::<u64>(), 150);
    }

    #[test]
    fn test_shape_centres_on_middle() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut hist = CltHistogram::new();
        hist.add_samples(&mut rng, 5000);

        let mean = hist.mean().unwrap();
        assert!((mean - 0.5).abs() < 0.01, "mean {}", mean);

        let b = hist.buckets();
        assert!(b[10] > b[3]);
        assert!(b[10] > b[17]);
        assert!(b[0] + b[20] < b[10]);
    }

    #[test]
    fn test_reset_and_empty_state() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hist = CltHistogram::new();
        assert_eq!(hist.max_bucket(), 1);
        assert!(hist.mean().is_none());

        hist.add_samples(&mut rng, 10);
        hist.reset();
        assert_eq!(hist, CltHistogram::new());
    }

    #[test]
    fn test_mean_is_of_raw_samples() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut hist = CltHistogram::new();
        let bucket = hist.add_sample(&mut rng);
        let mean = hist.mean().unwrap();
        assert!((0.0..=1.0).contains(&mean));
        assert_eq!(bucket_for(mean), bucket);
    }

    #[test]
    fn test_heights_scale_to_tallest() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut hist = CltHistogram::new();
        hist.add_samples(&mut rng, 200);
        let heights = hist.heights_percent();
        assert_eq!(heights.len(), BUCKET_COUNT);
        let tallest = heights.iter().copied().fold(0.0, f64::max);
        assert!((tallest - 100.0).abs() < 1e-9);
    }
}
