//! Data types passed between the control-loop activities.
//!
//! All types are `Copy` so they can move through channels and cells cheaply.

use crate::config::{GRAVITY_G, LSB_PER_G};

// ── Sensor data ───────────────────────────────────────────────────────────────

/// One accelerometer reading scaled to g, gravity removed from z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelerationSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub index: u32,
}

impl AccelerationSample {
    pub fn from_raw(raw: [i16; 3], index: u32) -> Self {
        Self {
            x: raw[0] as f32 / LSB_PER_G,
            y: raw[1] as f32 / LSB_PER_G,
            z: raw[2] as f32 / LSB_PER_G - GRAVITY_G,
            index,
        }
    }
}

/// Result of one closed estimation window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrequencyEstimate {
    pub hz: f32,
    /// Largest |filtered z| seen during the window (g)
    pub peak_g: f32,
}

impl FrequencyEstimate {
    /// Peak displacement of a sinusoid with this peak acceleration and
    /// frequency: `A = a / (2πf)²`, in centimetres.
    pub fn displacement_cm(&self) -> f32 {
        if self.hz <= 0.0 {
            return 0.0;
        }
        let omega = 2.0 * core::f32::consts::PI * self.hz;
        let accel_ms2 = self.peak_g * 9.81;
        accel_ms2 / (omega * omega) * 100.0
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// Everything one status line reports, captured by the acquisition activity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub sample: AccelerationSample,
    pub filtered_z: f32,
    pub estimate_hz: f32,
    pub reference_hz: f32,
    pub output: f32,
    /// Present only on the sample that closed a window
    pub window: Option<FrequencyEstimate>,
}
