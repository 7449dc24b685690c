//! Board implementations of the control-loop collaborator traits.

pub mod mpu6050;
pub mod serial;
pub mod step_dir;
