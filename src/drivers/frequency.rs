use micromath::F32Ext;

use crate::config::WINDOW_LEN;
use crate::state::FrequencyEstimate;

/// Zero-crossing frequency estimator over fixed-length windows.
///
/// Every full oscillation crosses zero twice, so a window of one second
/// reports `crossings / 2` Hz. A sample of exactly zero matches either sign,
/// so a signal touching zero and returning counts as a crossing.
#[derive(Clone, Debug)]
pub struct FrequencyEstimator {
    window_len: u32,
    window_seconds: f32,
    last: f32,
    primed: bool,
    crossings: u32,
    position: u32,
    peak: f32,
}

impl FrequencyEstimator {
    /// `window_len` samples spanning `window_seconds`.
    pub fn new(window_len: u32, window_seconds: f32) -> Self {
        Self {
            window_len: window_len.max(1),
            window_seconds,
            last: 0.0,
            primed: false,
            crossings: 0,
            position: 0,
            peak: 0.0,
        }
    }

    pub fn observe(&mut self, filtered: f32) -> Option<FrequencyEstimate> {
        if self.primed && crosses_zero(self.last, filtered) {
            self.crossings += 1;
        }
        self.primed = true;
        self.last = filtered;
        self.peak = self.peak.max(F32Ext::abs(filtered));
        self.position += 1;

        if self.position < self.window_len {
            return None;
        }

        let estimate = FrequencyEstimate {
            hz: self.crossings as f32 / 2.0 / self.window_seconds,
            peak_g: self.peak,
        };
        self.crossings = 0;
        self.position = 0;
        self.peak = 0.0;
        Some(estimate)
    }

    /// Crossings counted so far in the open window.
    pub fn crossings(&self) -> u32 {
        self.crossings
    }

    /// Samples observed so far in the open window.
    pub fn position(&self) -> u32 {
        self.position
    }
}

impl Default for FrequencyEstimator {
    fn default() -> Self {
        Self::new(WINDOW_LEN, crate::config::WINDOW_SECONDS)
    }
}

fn crosses_zero(prev: f32, current: f32) -> bool {
    (prev <= 0.0 && current > 0.0) || (prev >= 0.0 && current < 0.0)
}
