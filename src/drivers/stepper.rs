use embassy_time::Duration;

use crate::config::PulseConfig;
use crate::hal::{Axis, StepperPins};

/// What the actuation loop does next.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseCommand {
    /// Rate too low to move; check again after `wait`
    Idle { wait: Duration },
    /// Write `level` on the step pins, flip direction to `reverse` if set, then wait
    Edge {
        level: bool,
        reverse: Option<bool>,
        wait: Duration,
    },
}

impl PulseCommand {
    pub fn wait(&self) -> Duration {
        match *self {
            Self::Idle { wait } | Self::Edge { wait, .. } => wait,
        }
    }
}

/// Step/direction pulse generator for the two actuator axes.
///
/// The control output is scaled by `pulses_per_reversal` into an edge rate;
/// each call emits one edge (alternating low/high). After
/// `pulses_per_reversal` rising edges both axes reverse direction, which
/// turns the pulse train into a back-and-forth oscillation.
pub struct PulseTrain {
    config: PulseConfig,
    next_level: bool,
    steps: u16,
    direction: bool,
}

impl PulseTrain {
    pub fn new(config: PulseConfig) -> Self {
        Self {
            config,
            next_level: false,
            steps: 0,
            direction: true,
        }
    }

    /// Enables the drivers and sets the initial direction on both axes.
    pub fn start<P: StepperPins>(&mut self, pins: &mut P) {
        pins.enable();
        for axis in Axis::ALL {
            pins.set_direction(axis, self.direction);
        }
    }

    /// Edge rate (edges/s) commanded by a control output.
    pub fn edge_rate(&self, output: f32) -> f32 {
        output * self.config.pulses_per_reversal as f32
    }

    pub fn next(&mut self, output: f32) -> PulseCommand {
        let rate = self.edge_rate(output);
        // written so NaN also idles
        if !(rate >= self.config.min_edge_rate_hz) {
            return PulseCommand::Idle {
                wait: Duration::from_millis(self.config.idle_poll_ms),
            };
        }

        let interval_us = ((1_000_000.0 / rate) as u64).max(self.config.min_edge_interval_us);

        let level = self.next_level;
        self.next_level = !level;

        let mut reverse = None;
        if level {
            self.steps += 1;
            if self.steps >= self.config.pulses_per_reversal {
                self.steps = 0;
                self.direction = !self.direction;
                reverse = Some(self.direction);
            }
        }

        PulseCommand::Edge {
            level,
            reverse,
            wait: Duration::from_micros(interval_us),
        }
    }

    /// Computes the next edge for `output`, writes it to every axis and
    /// returns how long to wait before the following call.
    pub fn drive<P: StepperPins>(&mut self, output: f32, pins: &mut P) -> PulseCommand {
        let cmd = self.next(output);
        if let PulseCommand::Edge { level, reverse, .. } = cmd {
            for axis in Axis::ALL {
                pins.set_step(axis, level);
            }
            if let Some(dir) = reverse {
                for axis in Axis::ALL {
                    pins.set_direction(axis, dir);
                }
            }
        }
        cmd
    }

    pub fn direction(&self) -> bool {
        self.direction
    }
}

impl Default for PulseTrain {
    fn default() -> Self {
        Self::new(PulseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingPins {
        enabled: bool,
        step: [bool; 2],
        dir: [bool; 2],
        rising_edges: u32,
        reversals: u32,
    }

    impl StepperPins for RecordingPins {
        fn set_step(&mut self, axis: Axis, level: bool) {
            let i = axis as usize;
            if level && !self.step[i] && axis == Axis::A {
                self.rising_edges += 1;
            }
            self.step[i] = level;
        }

        fn set_direction(&mut self, axis: Axis, level: bool) {
            let i = axis as usize;
            if self.dir[i] != level && axis == Axis::A {
                self.reversals += 1;
            }
            self.dir[i] = level;
        }

        fn enable(&mut self) {
            self.enabled = true;
        }
    }

    #[test]
    fn low_output_idles() {
        let mut train = PulseTrain::default();
        for out in [0.0, 0.04, -3.0, f32::NAN] {
            assert_eq!(
                train.next(out),
                PulseCommand::Idle { wait: Duration::from_millis(10) }
            );
        }
    }

    #[test]
    fn interval_follows_output() {
        let mut train = PulseTrain::default();
        // 6 Hz × 20 = 120 edges/s
        assert_eq!(train.next(6.0).wait(), Duration::from_micros(8333));
        // 10 Hz × 20 = 200 edges/s
        assert_eq!(train.next(10.0).wait(), Duration::from_micros(5000));
        // clamp to the minimum interval
        assert_eq!(train.next(1000.0).wait(), Duration::from_micros(1000));
    }

    #[test]
    fn alternates_and_reverses_every_twenty_steps() {
        let mut train = PulseTrain::default();
        let mut pins = RecordingPins::default();
        train.start(&mut pins);
        assert!(pins.enabled);
        assert_eq!(pins.dir, [true, true]);
        // initial direction set by start() is not a reversal
        pins.reversals = 0;

        let mut levels = [false; 4];
        for l in levels.iter_mut() {
            match train.drive(5.0, &mut pins) {
                PulseCommand::Edge { level, .. } => *l = level,
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(levels, [false, true, false, true]);

        // 2 rising edges so far; 38 more edges bring it to 20 steps
        for _ in 0..36 {
            train.drive(5.0, &mut pins);
        }
        assert_eq!(pins.rising_edges, 20);
        assert_eq!(pins.reversals, 1);
        assert_eq!(pins.dir, [false, false]);
        assert!(!train.direction());

        for _ in 0..40 {
            train.drive(5.0, &mut pins);
        }
        assert_eq!(pins.reversals, 2);
        assert_eq!(pins.step[0], pins.step[1]);
    }
}
