use embassy_stm32::i2c::{Error, I2c, Instance, RxDma, TxDma};
use embassy_time::{Duration, Timer};

use parkimotion::hal::{AccelSensor, SensorError};

const ADDR: u8 = 0x68;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B;
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;

/// Expected WHO_AM_I register value
pub const WHO_AM_I: u8 = 0x68;

/// MPU-6050 on I2C, accelerometer only, ±2 g full scale.
pub struct Mpu6050<'d, T: Instance, Tx, Rx> {
    i2c: I2c<'d, T, Tx, Rx>,
}

impl<'d, T: Instance, Tx: TxDma<T>, Rx: RxDma<T>> Mpu6050<'d, T, Tx, Rx> {
    pub fn new(i2c: I2c<'d, T, Tx, Rx>) -> Self {
        Self { i2c }
    }

    /// Wakes the chip (it powers up asleep) and selects ±2 g.
    pub async fn init(&mut self) -> Result<u8, Error> {
        self.write_reg(REG_PWR_MGMT_1, 0x00)?;
        Timer::after(Duration::from_millis(10)).await;
        self.write_reg(REG_ACCEL_CONFIG, 0x00)?;

        let mut id = [0u8; 1];
        self.i2c.blocking_write_read(ADDR, &[REG_WHO_AM_I], &mut id)?;
        Ok(id[0])
    }

    fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), Error> {
        self.i2c.blocking_write(ADDR, &[reg, val])
    }
}

impl<'d, T: Instance, Tx: TxDma<T>, Rx: RxDma<T>> AccelSensor for Mpu6050<'d, T, Tx, Rx> {
    async fn read_acceleration(&mut self) -> Result<[i16; 3], SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .blocking_write_read(ADDR, &[REG_ACCEL_XOUT_H], &mut buf)
            .map_err(|e| match e {
                Error::Timeout => SensorError::Timeout,
                _ => SensorError::Bus,
            })?;

        // big-endian X, Y, Z
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }
}
