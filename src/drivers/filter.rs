use crate::config::{FILTER_A, FILTER_B, FILTER_TAPS};

/// Fixed-capacity history of the most recent `N` values, newest first.
///
/// Index-addressed ring: pushing moves the head instead of shifting the
/// array, so a push is O(1) whatever `N` is.
#[derive(Clone, Debug)]
pub struct History<const N: usize> {
    buf: [f32; N],
    head: usize,
}

impl<const N: usize> History<N> {
    pub const fn new() -> Self {
        Self { buf: [0.0; N], head: 0 }
    }

    pub fn push(&mut self, value: f32) {
        self.head = if self.head == 0 { N - 1 } else { self.head - 1 };
        self.buf[self.head] = value;
    }

    /// Value pushed `age` pushes ago (0 = newest). Slots never written read as 0.
    pub fn get(&self, age: usize) -> f32 {
        self.buf[(self.head + age) % N]
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        (0..N).map(move |age| self.get(age))
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Direct-form I IIR band-pass filter.
///
/// `y[n] = Σ b[i]·x[n-i] − Σ_{i≥1} a[i]·y[n-i]`, with `a[0] = 1`.
/// The default coefficients pass 2–10 Hz at a 40 Hz sample rate.
#[derive(Clone, Debug)]
pub struct BandpassFilter {
    b: [f32; FILTER_TAPS],
    a: [f32; FILTER_TAPS],
    x: History<FILTER_TAPS>,
    y: History<FILTER_TAPS>,
}

impl BandpassFilter {
    pub fn new(b: [f32; FILTER_TAPS], a: [f32; FILTER_TAPS]) -> Self {
        Self {
            b,
            a,
            x: History::new(),
            y: History::new(),
        }
    }

    pub fn apply(&mut self, sample: f32) -> f32 {
        self.x.push(sample);

        let mut output = 0.0f32;
        for i in 0..FILTER_TAPS {
            output += self.b[i] * self.x.get(i);
        }
        // y history has not been pushed yet, so age i-1 is y[n-i]
        for i in 1..FILTER_TAPS {
            output -= self.a[i] * self.y.get(i - 1);
        }

        self.y.push(output);
        output
    }

    pub fn input_history(&self) -> &History<FILTER_TAPS> {
        &self.x
    }

    pub fn output_history(&self) -> &History<FILTER_TAPS> {
        &self.y
    }
}

impl Default for BandpassFilter {
    fn default() -> Self {
        Self::new(FILTER_B, FILTER_A)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SAMPLE_RATE_HZ;

    /// Minimum in-band / out-of-band amplitude ratio of the default design.
    const DESIGN_REJECTION: f32 = 20.0;

    fn steady_state_amplitude(freq_hz: f32) -> f32 {
        let mut filter = BandpassFilter::default();
        let fs = SAMPLE_RATE_HZ as f32;
        let mut peak = 0.0f32;
        for n in 0..800 {
            let t = n as f32 / fs;
            let out = filter.apply((2.0 * core::f32::consts::PI * freq_hz * t).sin());
            // skip the start-up transient
            if n >= 400 {
                peak = peak.max(out.abs());
            }
        }
        peak
    }

    #[test]
    fn history_keeps_recency_order() {
        let mut h = History::<3>::new();
        for v in [1.0, 2.0, 3.0, 4.0] {
            h.push(v);
        }
        let got: [f32; 3] = [h.get(0), h.get(1), h.get(2)];
        assert_eq!(got, [4.0, 3.0, 2.0]);
        assert_eq!(h.iter().count(), 3);
    }

    #[test]
    fn impulse_response_starts_with_b0() {
        let mut filter = BandpassFilter::default();
        assert_eq!(filter.apply(1.0), FILTER_B[0]);
        // y[1] = b1 - a1*y[0]
        let expected = FILTER_B[1] - FILTER_A[1] * FILTER_B[0];
        assert!((filter.apply(0.0) - expected).abs() < 1e-6);
        assert_eq!(filter.input_history().get(1), 1.0);
        assert_eq!(filter.output_history().get(1), FILTER_B[0]);
    }

    #[test]
    fn passband_dominates_stopbands() {
        let in_band = steady_state_amplitude(5.0).min(steady_state_amplitude(6.0));
        let low = steady_state_amplitude(0.5);
        let high = steady_state_amplitude(18.0);

        assert!(in_band > 1.0, "in-band gain {}", in_band);
        assert!(in_band > DESIGN_REJECTION * low, "low rejection {} vs {}", in_band, low);
        assert!(in_band > DESIGN_REJECTION * high, "high rejection {} vs {}", in_band, high);
    }

    #[test]
    fn dc_is_blocked() {
        let mut filter = BandpassFilter::default();
        let mut last = 0.0;
        for _ in 0..400 {
            last = filter.apply(0.3);
        }
        assert!(last.abs() < 1e-3, "dc leak {}", last);
    }
}
