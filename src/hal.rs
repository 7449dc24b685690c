//! Collaborator traits the control loop is written against.
//!
//! The firmware implements them on top of the board peripherals; tests
//! implement them with scripted fakes.
#![allow(async_fn_in_trait)]

use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, ...)
    Bus,
    Timeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "sensor bus error"),
            Self::Timeout => write!(f, "sensor read timed out"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    Overrun,
    Framing,
    Other,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overrun => write!(f, "serial overrun"),
            Self::Framing => write!(f, "serial framing error"),
            Self::Other => write!(f, "serial error"),
        }
    }
}

/// Accelerometer yielding raw readings (LSB, ±2 g full scale).
pub trait AccelSensor {
    async fn read_acceleration(&mut self) -> Result<[i16; 3], SensorError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    A = 0,
    B = 1,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::A, Axis::B];
}

/// Step/direction outputs of the actuator drivers.
pub trait StepperPins {
    fn set_step(&mut self, axis: Axis, level: bool);
    fn set_direction(&mut self, axis: Axis, level: bool);
    fn enable(&mut self);
}

/// Serial text source carrying setpoints.
pub trait SetpointSource {
    /// Reads one burst of bytes into `buf`. `Ok(0)` means the line stayed
    /// idle for the read timeout.
    async fn read_burst(&mut self, buf: &mut [u8]) -> Result<usize, SourceError>;
}
