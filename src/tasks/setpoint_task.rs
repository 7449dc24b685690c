use embassy_executor::task;
use embassy_stm32::peripherals::{DMA1_CH1, DMA1_CH3, USART3};

use parkimotion::scheduler::{IngestEvent, Ingestion, Shared};

use crate::hw::serial::UartSetpoints;

/// Setpoint task: reads frequency lines from USART3 and hands valid ones to control.
#[task]
pub async fn setpoint_task(
    mut source: UartSetpoints<'static, USART3, DMA1_CH3, DMA1_CH1>,
    shared: &'static Shared,
) {
    let mut ingest = Ingestion::new();
    let mut buf = [0u8; 64];

    loop {
        let polled = ingest
            .poll(&mut source, &mut buf, shared, |event| match event {
                IngestEvent::Accepted(sp) => defmt::info!("setpoint {=f32} Hz", sp.hz()),
                IngestEvent::Rejected(e) => defmt::warn!("setpoint rejected: {}", e),
            })
            .await;

        if let Err(e) = polled {
            defmt::warn!("setpoint uart: {}", e);
        }
    }
}
