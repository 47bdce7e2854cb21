//! Temperature trend estimator
//!
//! A moving rate-of-change estimate (°C/s) taken between two baseline
//! points at least `interval_ms` apart.  Between recomputations the last
//! value is held, so the trend does not jitter with every cycle.

#[derive(Debug, Clone, Copy)]
pub struct TrendEstimator {
    interval_ms: u64,
    last_sample_ms: u64,
    last_temperature_c: f32,
    trend_c_per_s: f32,
}

impl TrendEstimator {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sample_ms: 0,
            last_temperature_c: 0.0,
            trend_c_per_s: 0.0,
        }
    }

    /// Move the baseline to (`now_ms`, `temperature_c`) without recomputing.
    pub fn reset(&mut self, now_ms: u64, temperature_c: f32) {
        self.last_sample_ms = now_ms;
        self.last_temperature_c = temperature_c;
    }

    /// Recompute the trend if a full interval has elapsed since the baseline.
    ///
    /// Returns the fresh trend when one was computed, `None` while the
    /// held value is still current.
    pub fn sample(&mut self, now_ms: u64, temperature_c: f32) -> Option<f32> {
        let elapsed_ms = now_ms.saturating_sub(self.last_sample_ms);
        if elapsed_ms < self.interval_ms {
            return None;
        }

        let elapsed_secs = elapsed_ms as f32 / 1000.0;
        self.trend_c_per_s = (temperature_c - self.last_temperature_c) / elapsed_secs;
        self.last_sample_ms = now_ms;
        self.last_temperature_c = temperature_c;
        Some(self.trend_c_per_s)
    }

    /// Last computed trend (°C/s).
    pub fn value(&self) -> f32 {
        self.trend_c_per_s
    }

    pub fn last_sample_ms(&self) -> u64 {
        self.last_sample_ms
    }

    pub fn last_temperature_c(&self) -> f32 {
        self.last_temperature_c
    }
}
