pub mod acquisition_task;
pub mod actuation_task;
pub mod control_task;
pub mod setpoint_task;
pub mod status_task;
