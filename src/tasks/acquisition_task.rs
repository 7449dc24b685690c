use embassy_executor::task;
use embassy_stm32::peripherals::{DMA1_CH0, DMA1_CH7, I2C1};
use embassy_time::{Duration, Ticker};

use parkimotion::config::SAMPLE_PERIOD_MS;
use parkimotion::scheduler::{Acquisition, Shared};

use crate::hw::mpu6050::Mpu6050;

/// Acquisition task: 40 Hz accelerometer read, band-pass, frequency window.
#[task]
pub async fn acquisition_task(
    mut sensor: Mpu6050<'static, I2C1, DMA1_CH7, DMA1_CH0>,
    shared: &'static Shared,
) {
    let mut acq = Acquisition::default();
    let mut failures: u32 = 0;

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS));
    loop {
        ticker.next().await;

        match acq.poll(&mut sensor, shared).await {
            Ok(report) => {
                if let Some(e) = report.estimate {
                    defmt::info!(
                        "window: {=f32} Hz, peak {=f32} g, disp {=f32} cm",
                        e.hz,
                        e.peak_g,
                        e.displacement_cm()
                    );
                }
            }
            Err(e) => {
                failures = failures.wrapping_add(1);
                // one line per second of failures is enough
                if failures % 40 == 1 {
                    defmt::warn!("accel read failed ({} so far): {}", failures, e);
                }
            }
        }
    }
}
