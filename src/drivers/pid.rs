use crate::config::PidConfig;

/// Incremental (velocity-form) PID.
///
/// Each tick adds `Δu = Kp(e − e₁) + Ki·Ts·e + Kd(e − 2e₁ + e₂)/Ts` to the
/// previous output and clamps the sum. The clamped value is what the next
/// tick builds on, which keeps the integral action from winding up while
/// the output sits on a bound.
#[derive(Clone, Debug)]
pub struct PidController {
    config: PidConfig,
    prev_error: f32,
    prev_prev_error: f32,
    prev_output: f32,
    last_delta: f32,
}

impl PidController {
    pub fn new(config: PidConfig) -> Self {
        let (lo, hi) = bounds(&config);
        Self {
            prev_error: 0.0,
            prev_prev_error: 0.0,
            prev_output: config.initial_output.clamp(lo, hi),
            last_delta: 0.0,
            config,
        }
    }

    pub fn reset(&mut self) {
        let (lo, hi) = bounds(&self.config);
        self.prev_error = 0.0;
        self.prev_prev_error = 0.0;
        self.prev_output = self.config.initial_output.clamp(lo, hi);
        self.last_delta = 0.0;
    }

    pub fn tick(&mut self, reference: f32, measurement: f32) -> f32 {
        let c = &self.config;
        let error = reference - measurement;
        if !error.is_finite() {
            return self.prev_output;
        }

        let delta = c.kp * (error - self.prev_error)
            + c.ki * c.ts * error
            + c.kd * (error - 2.0 * self.prev_error + self.prev_prev_error) / c.ts;

        let (lo, hi) = bounds(c);
        let output = (self.prev_output + delta).clamp(lo, hi);

        self.prev_prev_error = self.prev_error;
        self.prev_error = error;
        self.prev_output = output;
        self.last_delta = delta;

        output
    }

    pub fn output(&self) -> f32 {
        self.prev_output
    }

    /// Error of the last tick.
    pub fn error(&self) -> f32 {
        self.prev_error
    }

    /// Unclamped increment computed by the last tick.
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }
}

impl Default for PidController {
    fn default() -> Self {
        Self::new(PidConfig::default())
    }
}

fn bounds(config: &PidConfig) -> (f32, f32) {
    if config.out_min <= config.out_max {
        (config.out_min, config.out_max)
    } else {
        (config.out_max, config.out_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OUTPUT_MAX, OUTPUT_MIN};

    #[test]
    fn output_always_within_bounds() {
        let mut pid = PidController::default();
        let pairs = [
            (10.0, 0.0),
            (10.0, 0.0),
            (2.0, 50.0),
            (-100.0, 100.0),
            (1.0e6, -1.0e6),
            (6.0, 6.0),
            (f32::NAN, 3.0),
            (f32::INFINITY, 3.0),
            (3.0, 9.5),
        ];
        for _ in 0..20 {
            for (r, y) in pairs {
                let u = pid.tick(r, y);
                assert!((OUTPUT_MIN..=OUTPUT_MAX).contains(&u), "{} out of range", u);
            }
        }
    }

    #[test]
    fn saturation_does_not_wind_up() {
        let mut pid = PidController::default();
        // Long positive error drives the output to the top bound
        for _ in 0..500 {
            pid.tick(10.0, 0.0);
        }
        assert_eq!(pid.output(), OUTPUT_MAX);
        // A single tick of negative error must leave the bound immediately
        let u = pid.tick(0.0, 10.0);
        assert!(u < OUTPUT_MAX, "stuck at {}", u);
    }

    #[test]
    fn zero_error_settles() {
        let mut pid = PidController::default();
        pid.tick(6.0, 5.0);
        pid.tick(6.0, 5.5);
        let mut outputs = [0.0f32; 10];
        for u in outputs.iter_mut() {
            *u = pid.tick(6.0, 6.0);
        }
        // derivative memory spans two ticks, after that Δ = 0
        for w in outputs[2..].windows(2) {
            assert_eq!(w[0], w[1]);
        }
        assert_eq!(pid.last_delta(), 0.0);
    }

    #[test]
    fn first_tick_matches_incremental_formula() {
        let cfg = PidConfig::default();
        let mut pid = PidController::new(cfg);
        let e = 0.1;
        let u = pid.tick(6.0, 6.0 - e);
        let delta = cfg.kp * e + cfg.ki * cfg.ts * e + cfg.kd * e / cfg.ts;
        assert!((u - (cfg.initial_output + delta)).abs() < 1e-5);
        assert!((pid.last_delta() - delta).abs() < 1e-5);
    }

    #[test]
    fn reset_restores_initial_output() {
        let mut pid = PidController::default();
        pid.tick(10.0, 2.0);
        pid.reset();
        assert_eq!(pid.output(), OUTPUT_MIN);
        assert_eq!(pid.error(), 0.0);
    }
}
