use embassy_executor::task;
use embassy_time::Timer;

use parkimotion::config::PulseConfig;
use parkimotion::scheduler::{Actuation, Shared};

use crate::hw::step_dir::StepDirPins;

/// Actuation task: one step edge per wake-up, spaced by the control output.
#[task]
pub async fn actuation_task(pins: StepDirPins, shared: &'static Shared) {
    let mut act = Actuation::new(PulseConfig::default(), pins);
    defmt::info!("stepper drivers enabled");

    loop {
        let cmd = act.step(shared);
        Timer::after(cmd.wait()).await;
    }
}
