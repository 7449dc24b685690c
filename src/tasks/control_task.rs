use embassy_executor::task;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};

use parkimotion::config::CONTROL_PERIOD_MS;
use parkimotion::scheduler::{ControlLoop, Shared};

/// Control task: PID at 40 Hz; a new setpoint takes effect as soon as it lands.
#[task]
pub async fn control_task(shared: &'static Shared) {
    let mut ctl = ControlLoop::default();
    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_PERIOD_MS));

    loop {
        match select(ticker.next(), shared.setpoint.receive()).await {
            Either::First(_) => {
                let r = ctl.tick(shared);
                defmt::debug!(
                    "ref={=f32} y={=f32} e={=f32} du={=f32} u={=f32}",
                    r.reference,
                    r.measurement,
                    r.error,
                    r.delta,
                    r.output
                );
            }
            Either::Second(sp) => {
                ctl.on_setpoint(sp, shared);
                defmt::info!("reference -> {=f32} Hz", sp.hz());
            }
        }
    }
}
