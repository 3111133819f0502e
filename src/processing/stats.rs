use crate::config::ZeroVariance;

/// Single-pass mean / population standard deviation (Welford).
///
/// A run of identical samples leaves `m2` at exactly zero, so constant bands
/// and flat spectra always hit the zero-variance branch of [`snr`](Self::snr).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I: IntoIterator<Item = f32>>(values: I) -> Self {
        let mut stats = Self::new();
        for value in values {
            stats.push(value as f64);
        }
        stats
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// True for empty lanes and for lanes whose samples are all equal.
    pub fn has_zero_variance(&self) -> bool {
        self.std_dev() == 0.0
    }

    /// Mean over standard deviation, or the policy value when the deviation is zero.
    pub fn snr(&self, policy: ZeroVariance) -> f64 {
        if self.has_zero_variance() {
            policy.value()
        } else {
            self.mean / self.std_dev()
        }
    }
}
