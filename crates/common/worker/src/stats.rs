// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Running per-worker statistics, updated after every dispatch iteration.
//!
//! Grounded on `amq_stats_update` in the original library: not a textbook
//! running mean/variance, but the exact same iterative approximation,
//! reproduced here so the numbers a caller sees match what the original
//! produced for the same sequence of samples.

use std::time::Duration;

/// Sentinel used to seed `min` so the very first sample always replaces it,
/// matching `worker_new`'s `stats.min = 999999.9999`.
const MIN_SENTINEL_MS: f64 = 999_999.9999;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerStats {
    pub count:     u64,
    pub min_ms:     f64,
    pub max_ms:     f64,
    pub average_ms: f64,
    pub deviation_ms: f64,
}

impl Default for WorkerStats {
    fn default() -> Self {
        Self {
            count:         0,
            min_ms:        MIN_SENTINEL_MS,
            max_ms:        0.0,
            average_ms:    0.0,
            deviation_ms:  0.0,
        }
    }
}

impl WorkerStats {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Folds one new sample (the duration of a single dispatch iteration)
    /// into the running statistics.
    pub fn update(&mut self, sample: Duration) {
        #[allow(clippy::cast_precision_loss)]
        let newval = sample.as_secs_f64() * 1000.0;

        if newval < self.min_ms {
            self.min_ms = newval;
        }
        if newval > self.max_ms {
            self.max_ms = newval;
        }
        self.count += 1;
        #[allow(clippy::cast_precision_loss)]
        let count = self.count as f64;
        self.average_ms = (self.average_ms + newval) / count;
        let delta = (newval - self.average_ms).abs();
        self.deviation_ms = (self.deviation_ms + delta) / count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_always_replaces_the_min_sentinel() {
        let mut stats = WorkerStats::new();
        stats.update(Duration::from_millis(5));
        assert_eq!(stats.count, 1);
        assert!((stats.min_ms - 5.0).abs() < 1e-9);
        assert!((stats.max_ms - 5.0).abs() < 1e-9);
    }

    #[test]
    fn matches_the_exact_iterative_formula_for_a_known_sequence() {
        let mut stats = WorkerStats::new();
        let mut average = 0.0f64;
        let mut deviation = 0.0f64;
        let mut min = MIN_SENTINEL_MS;
        let mut max = 0.0f64;
        let mut count = 0u64;

        for ms in [3.0, 7.0, 2.0, 9.0] {
            stats.update(Duration::from_secs_f64(ms / 1000.0));

            if ms < min {
                min = ms;
            }
            if ms > max {
                max = ms;
            }
            count += 1;
            average = (average + ms) / count as f64;
            deviation = (deviation + (ms - average).abs()) / count as f64;
        }

        assert!((stats.min_ms - min).abs() < 1e-6);
        assert!((stats.max_ms - max).abs() < 1e-6);
        assert!((stats.average_ms - average).abs() < 1e-6);
        assert!((stats.deviation_ms - deviation).abs() < 1e-6);
        assert_eq!(stats.count, count);
    }
}
