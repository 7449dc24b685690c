//! Closed-loop vibration-frequency controller.
//!
//! An accelerometer stream is band-pass filtered, its oscillation frequency
//! estimated by counting zero crossings, and an incremental PID drives a
//! pair of step/dir actuators so the measured frequency tracks a setpoint
//! received over a serial line.
//!
//! | Module | Purpose |
//! | ------ | ------- |
//! | [`drivers`] | Filter, estimator, PID, pulse generator, setpoint parser, status lines |
//! | [`scheduler`] | The four activities and their shared state |
//! | [`shared`] | Atomic cells and the setpoint mailbox |
//! | [`hal`] | Sensor / actuator / serial traits |
//! | [`config`] | Tuning constants |
//!
//! The firmware binary (`--features stm32`) wires these to an STM32F405
//! board; everything in this library also builds and tests on the host.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod drivers;
pub mod hal;
pub mod scheduler;
pub mod shared;
pub mod state;
