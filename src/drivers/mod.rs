pub mod filter;
pub mod frequency;
pub mod pid;
pub mod setpoint;
pub mod status;
pub mod stepper;
