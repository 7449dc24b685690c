//! The four control-loop activities and the state they share.
//!
//! Each activity is a small stage type with a synchronous step method. The
//! firmware tasks own one stage each, await their own deadline (ticker,
//! pulse timer, serial burst) and call the step; nothing here waits on time,
//! so the stages run unchanged on the host.
//!
//! Shared state, one writer per cell:
//!
//! | cell / channel   | writer       | reader(s)            |
//! | ---------------- | ------------ | -------------------- |
//! | `estimate`       | acquisition  | control, diagnostics |
//! | `output`         | control      | actuation, diagnostics |
//! | `reference`      | control      | diagnostics          |
//! | `setpoint`       | ingestion    | control              |
//! | `status`         | acquisition  | diagnostics          |

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::{PidConfig, PulseConfig, DEFAULT_REFERENCE_HZ, INITIAL_ESTIMATE_HZ, OUTPUT_MIN};
use crate::drivers::filter::BandpassFilter;
use crate::drivers::frequency::FrequencyEstimator;
use crate::drivers::pid::PidController;
use crate::drivers::setpoint::{Setpoint, SetpointError, SetpointParser};
use crate::drivers::stepper::{PulseCommand, PulseTrain};
use crate::hal::{AccelSensor, SensorError, SetpointSource, SourceError, StepperPins};
use crate::shared::{SetpointChannel, SharedF32};
use crate::state::{AccelerationSample, FrequencyEstimate, StatusSnapshot};

/// Everything the activities exchange. Lives in a `static` on the target.
pub struct Shared {
    pub estimate: SharedF32,
    pub output: SharedF32,
    pub reference: SharedF32,
    pub setpoint: SetpointChannel,
    /// Cap=1: acquisition never waits on diagnostics; while one snapshot is
    /// pending, newer ones are dropped
    pub status: Channel<CriticalSectionRawMutex, StatusSnapshot, 1>,
}

impl Shared {
    pub const fn new() -> Self {
        Self {
            estimate: SharedF32::new(INITIAL_ESTIMATE_HZ),
            // same value the PID assumes before its first tick
            output: SharedF32::new(OUTPUT_MIN),
            reference: SharedF32::new(DEFAULT_REFERENCE_HZ),
            setpoint: SetpointChannel::new(),
            status: Channel::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}

// ── Acquisition ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcquisitionReport {
    pub sample: AccelerationSample,
    pub filtered_z: f32,
    /// Set when this sample closed an estimation window
    pub estimate: Option<FrequencyEstimate>,
}

/// Sensor → band-pass → zero-crossing estimator.
pub struct Acquisition {
    filter: BandpassFilter,
    estimator: FrequencyEstimator,
    next_index: u32,
}

impl Acquisition {
    pub fn new(filter: BandpassFilter, estimator: FrequencyEstimator) -> Self {
        Self {
            filter,
            estimator,
            next_index: 0,
        }
    }

    /// Processes one sensor reading. A failed read leaves filter and window
    /// state exactly as they were.
    pub fn on_reading(
        &mut self,
        reading: Result<[i16; 3], SensorError>,
        shared: &Shared,
    ) -> Result<AcquisitionReport, SensorError> {
        let raw = reading?;

        let sample = AccelerationSample::from_raw(raw, self.next_index);
        self.next_index = self.next_index.wrapping_add(1);

        let filtered_z = self.filter.apply(sample.z);
        let estimate = self.estimator.observe(filtered_z);
        if let Some(e) = estimate {
            shared.estimate.store(e.hz);
        }

        let snapshot = StatusSnapshot {
            sample,
            filtered_z,
            estimate_hz: shared.estimate.load(),
            reference_hz: shared.reference.load(),
            output: shared.output.load(),
            window: estimate,
        };
        // diagnostics may miss a line if it is busy
        let _ = shared.status.try_send(snapshot);

        Ok(AcquisitionReport {
            sample,
            filtered_z,
            estimate,
        })
    }

    /// Reads the sensor once and processes the result.
    pub async fn poll<S: AccelSensor>(
        &mut self,
        sensor: &mut S,
        shared: &Shared,
    ) -> Result<AcquisitionReport, SensorError> {
        let reading = sensor.read_acceleration().await;
        self.on_reading(reading, shared)
    }

    /// Successful samples processed so far.
    pub fn samples(&self) -> u32 {
        self.next_index
    }
}

impl Default for Acquisition {
    fn default() -> Self {
        Self::new(BandpassFilter::default(), FrequencyEstimator::default())
    }
}

// ── Control ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlReport {
    pub reference: f32,
    pub measurement: f32,
    pub error: f32,
    pub delta: f32,
    pub output: f32,
}

/// Tracks the active reference and runs the PID once per control period.
pub struct ControlLoop {
    pid: PidController,
    reference: f32,
}

impl ControlLoop {
    pub fn new(pid: PidController, default_reference: Setpoint) -> Self {
        Self {
            pid,
            reference: default_reference.hz(),
        }
    }

    /// Makes `setpoint` the active reference until the next one arrives.
    pub fn on_setpoint(&mut self, setpoint: Setpoint, shared: &Shared) {
        self.reference = setpoint.hz();
        shared.reference.store(self.reference);
    }

    /// Takes a pending setpoint without waiting, if one is there.
    pub fn poll_setpoint(&mut self, shared: &Shared) -> Option<Setpoint> {
        let sp = shared.setpoint.try_receive()?;
        self.on_setpoint(sp, shared);
        Some(sp)
    }

    pub fn tick(&mut self, shared: &Shared) -> ControlReport {
        let measurement = shared.estimate.load();
        let output = self.pid.tick(self.reference, measurement);
        shared.output.store(output);
        shared.reference.store(self.reference);

        ControlReport {
            reference: self.reference,
            measurement,
            error: self.pid.error(),
            delta: self.pid.last_delta(),
            output,
        }
    }

    pub fn reference(&self) -> f32 {
        self.reference
    }
}

impl Default for ControlLoop {
    fn default() -> Self {
        Self::new(PidController::new(PidConfig::default()), Setpoint::DEFAULT)
    }
}

// ── Actuation ─────────────────────────────────────────────────────────────────

/// Turns the shared control output into step edges.
pub struct Actuation<P: StepperPins> {
    train: PulseTrain,
    pins: P,
}

impl<P: StepperPins> Actuation<P> {
    /// Enables the drivers and sets the initial direction.
    pub fn new(config: PulseConfig, mut pins: P) -> Self {
        let mut train = PulseTrain::new(config);
        train.start(&mut pins);
        Self { train, pins }
    }

    /// Emits at most one edge; the caller waits `PulseCommand::wait()` before
    /// calling again.
    pub fn step(&mut self, shared: &Shared) -> PulseCommand {
        self.train.drive(shared.output.load(), &mut self.pins)
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }
}

// ── Setpoint ingestion ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestEvent {
    Accepted(Setpoint),
    Rejected(SetpointError),
}

/// Serial text → validated setpoints → channel.
pub struct Ingestion {
    parser: SetpointParser,
}

impl Ingestion {
    pub fn new() -> Self {
        Self {
            parser: SetpointParser::new(),
        }
    }

    /// Feeds one burst of bytes. A line split over several bursts is
    /// reassembled; `on_event` sees every accepted or rejected line.
    pub fn on_burst<F: FnMut(IngestEvent)>(&mut self, bytes: &[u8], shared: &Shared, mut on_event: F) {
        for &b in bytes {
            if let Some(parsed) = self.parser.push_byte(b) {
                on_event(offer(parsed, shared));
            }
        }
    }

    /// The line stayed quiet for a whole read timeout: a pending line without
    /// a terminator is taken as complete.
    pub fn on_idle<F: FnMut(IngestEvent)>(&mut self, shared: &Shared, mut on_event: F) {
        if let Some(parsed) = self.parser.on_idle() {
            on_event(offer(parsed, shared));
        }
    }

    /// Reads one burst from `source` and feeds it. An idle timeout (`Ok(0)`)
    /// is not an error; it completes an unterminated line.
    pub async fn poll<S: SetpointSource, F: FnMut(IngestEvent)>(
        &mut self,
        source: &mut S,
        buf: &mut [u8],
        shared: &Shared,
        on_event: F,
    ) -> Result<usize, SourceError> {
        let n = source.read_burst(buf).await?;
        if n > 0 {
            self.on_burst(&buf[..n], shared, on_event);
        } else {
            self.on_idle(shared, on_event);
        }
        Ok(n)
    }
}

impl Default for Ingestion {
    fn default() -> Self {
        Self::new()
    }
}

fn offer(parsed: Result<Setpoint, SetpointError>, shared: &Shared) -> IngestEvent {
    match parsed.and_then(|sp| shared.setpoint.try_send(sp).map(|_| sp)) {
        Ok(sp) => IngestEvent::Accepted(sp),
        Err(e) => IngestEvent::Rejected(e),
    }
}
