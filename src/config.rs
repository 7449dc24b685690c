//! Tuning constants and the small configuration bundles built from them.
//!
//! The filter coefficients are designed for `SAMPLE_RATE_HZ`; changing the
//! sample rate without re-deriving `FILTER_B` / `FILTER_A` breaks the
//! pass band.

// ── Acquisition ───────────────────────────────────────────────────────────────

/// Accelerometer sampling target (Hz)
pub const SAMPLE_RATE_HZ: u64 = 40;
/// Acquisition period (ms)
pub const SAMPLE_PERIOD_MS: u64 = 1000 / SAMPLE_RATE_HZ;
/// Length of one frequency-estimation window (s)
pub const WINDOW_SECONDS: f32 = 1.0;
/// Samples per estimation window
pub const WINDOW_LEN: u32 = (SAMPLE_RATE_HZ as f32 * WINDOW_SECONDS) as u32;
/// Raw accelerometer scale at ±2 g full range
pub const LSB_PER_G: f32 = 16384.0;
/// Static gravity removed from the z axis (g)
pub const GRAVITY_G: f32 = 1.0;
/// Frequency reported before the first window closes (Hz)
pub const INITIAL_ESTIMATE_HZ: f32 = 4.0;

// ── Band-pass filter (Butterworth 2–10 Hz, fs = 40 Hz, order 2) ──────────────

pub const FILTER_ORDER: usize = 4;
pub const FILTER_TAPS: usize = FILTER_ORDER + 1;
pub const FILTER_B: [f32; FILTER_TAPS] = [0.1804, 0.0, -0.3609, 0.0, 0.1804];
pub const FILTER_A: [f32; FILTER_TAPS] = [1.0, -1.5016, 1.1683, -0.3872, 0.0794];

// ── PID ──────────────────────────────────────────────────────────────────────

pub const KP: f32 = 1.17;
pub const KI: f32 = 40.1;
pub const KD: f32 = 0.00851;
/// Control period (s)
pub const TS: f32 = 0.025;
pub const CONTROL_PERIOD_MS: u64 = 25;
/// Control output bounds (Hz of commanded oscillation)
pub const OUTPUT_MIN: f32 = 2.0;
pub const OUTPUT_MAX: f32 = 10.0;

// ── Setpoint ─────────────────────────────────────────────────────────────────

pub const SETPOINT_MIN_HZ: f32 = 2.0;
pub const SETPOINT_MAX_HZ: f32 = 10.0;
/// Reference used until the first setpoint arrives
pub const DEFAULT_REFERENCE_HZ: f32 = 7.0;
/// Longest accepted setpoint line (bytes)
pub const SETPOINT_LINE_CAP: usize = 32;
pub const SETPOINT_BAUD: u32 = 115_200;
/// Idle timeout on the setpoint serial line (ms)
pub const SETPOINT_READ_TIMEOUT_MS: u64 = 100;

// ── Actuation ────────────────────────────────────────────────────────────────

/// Direction flips after this many step pulses; also the output → edge-rate gain
pub const PULSES_PER_REVERSAL: u16 = 20;
/// Edge rates below this are treated as "stopped" (edges/s)
pub const MIN_EDGE_RATE_HZ: f32 = 1.0;
/// Poll interval while stopped (ms)
pub const IDLE_POLL_MS: u64 = 10;
/// Shortest interval between two step edges (µs)
pub const MIN_EDGE_INTERVAL_US: u64 = 1000;

/// Gains, period and output bounds of the frequency controller.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub ts: f32,
    pub out_min: f32,
    pub out_max: f32,
    /// Output assumed for the tick before the first one
    pub initial_output: f32,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: KP,
            ki: KI,
            kd: KD,
            ts: TS,
            out_min: OUTPUT_MIN,
            out_max: OUTPUT_MAX,
            initial_output: OUTPUT_MIN,
        }
    }
}

/// Step-pulse generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseConfig {
    pub pulses_per_reversal: u16,
    pub min_edge_rate_hz: f32,
    pub idle_poll_ms: u64,
    pub min_edge_interval_us: u64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            pulses_per_reversal: PULSES_PER_REVERSAL,
            min_edge_rate_hz: MIN_EDGE_RATE_HZ,
            idle_poll_ms: IDLE_POLL_MS,
            min_edge_interval_us: MIN_EDGE_INTERVAL_US,
        }
    }
}
