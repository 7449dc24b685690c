use embassy_futures::select::{select, Either};
use embassy_stm32::usart::{BasicInstance, Error, RxDma, Uart};
use embassy_time::{Duration, Timer};

use parkimotion::config::SETPOINT_READ_TIMEOUT_MS;
use parkimotion::hal::{SetpointSource, SourceError};

/// Setpoint text arriving on a UART; one DMA read per idle-terminated burst.
pub struct UartSetpoints<'d, T: BasicInstance, Tx, Rx> {
    uart: Uart<'d, T, Tx, Rx>,
}

impl<'d, T: BasicInstance, Tx, Rx> UartSetpoints<'d, T, Tx, Rx> {
    pub fn new(uart: Uart<'d, T, Tx, Rx>) -> Self {
        Self { uart }
    }
}

impl<'d, T: BasicInstance, Tx, Rx: RxDma<T>> SetpointSource for UartSetpoints<'d, T, Tx, Rx> {
    async fn read_burst(&mut self, buf: &mut [u8]) -> Result<usize, SourceError> {
        // idle line or read timeout, whichever comes first
        match select(
            self.uart.read_until_idle(buf),
            Timer::after(Duration::from_millis(SETPOINT_READ_TIMEOUT_MS)),
        )
        .await
        {
            Either::First(Ok(n)) => Ok(n),
            Either::First(Err(Error::Overrun)) => Err(SourceError::Overrun),
            Either::First(Err(Error::Framing)) => Err(SourceError::Framing),
            Either::First(Err(_)) => Err(SourceError::Other),
            Either::Second(_) => Ok(0),
        }
    }
}
