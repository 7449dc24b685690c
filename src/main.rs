#![no_std]
#![no_main]

mod board;
mod hw;
mod tasks;
mod usb;

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Pin, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz as TimeHertz;
use embassy_stm32::usart::{Config as UsartConfig, Uart};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use parkimotion::config::SETPOINT_BAUD;
use parkimotion::scheduler::Shared;

use crate::board::Board;
use crate::hw::mpu6050::{self, Mpu6050};
use crate::hw::serial::UartSetpoints;
use crate::hw::step_dir::StepDirPins;

// ── Shared control-loop state ─────────────────────────────────────────────────
//  Estimate, output and reference cells plus the setpoint and status mailboxes.
static SHARED: Shared = Shared::new();

// ── Interrupt bindings ────────────────────────────────────────────────────────
bind_interrupts!(struct Irqs {
    I2C1_EV  => embassy_stm32::i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER  => embassy_stm32::i2c::ErrorInterruptHandler<peripherals::I2C1>;
    USART3   => embassy_stm32::usart::InterruptHandler<peripherals::USART3>;
});

// ── Main ──────────────────────────────────────────────────────────────────────
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // 1. Board init (168 MHz PLL)
    let board = Board::init();
    let p = board.p;

    // 2. USB (CDC-ACM for the dashboard)
    let (usb_dev, usb_serial) = usb::init(p.USB_OTG_FS, p.PA12, p.PA11);
    spawner.spawn(usb::usb_task(usb_dev)).unwrap();

    // 3. I2C1 @ 400 kHz, MPU-6050 accelerometer (SCL=PB8, SDA=PB9)
    let i2c = I2c::new(
        p.I2C1,
        p.PB8, p.PB9,
        Irqs,
        p.DMA1_CH7,
        p.DMA1_CH0,
        TimeHertz(400_000),
        Default::default(),
    );
    let mut accel = Mpu6050::new(i2c);

    // 4. Setpoint USART3 @ 115200 (TX=PB10, RX=PB11)
    let mut sp_config = UsartConfig::default();
    sp_config.baudrate = SETPOINT_BAUD;
    let sp_uart = Uart::new(
        p.USART3, p.PB11, p.PB10,
        Irqs,
        p.DMA1_CH3, p.DMA1_CH1,
        sp_config,
    ).unwrap();

    // 5. Stepper drivers: STEP on the MOTOR1/2 pads, DIR on MOTOR3/4, EN active low
    //    Drivers stay disabled until the actuation task starts.
    let pins = StepDirPins::new(
        [
            Output::new(p.PB0.degrade(), Level::Low, Speed::VeryHigh),
            Output::new(p.PB1.degrade(), Level::Low, Speed::VeryHigh),
        ],
        [
            Output::new(p.PA3.degrade(), Level::Low, Speed::Low),
            Output::new(p.PA2.degrade(), Level::Low, Speed::Low),
        ],
        Output::new(p.PB5.degrade(), Level::High, Speed::Low),
    );

    // 6. Heartbeat LED (PC13)
    let mut led = Output::new(p.PC13, Level::High, Speed::Low);

    // 7. Accelerometer wake-up
    Timer::after(Duration::from_millis(100)).await;
    match accel.init().await {
        Ok(mpu6050::WHO_AM_I) => defmt::info!("MPU-6050 ready"),
        Ok(id) => defmt::warn!("unexpected WHO_AM_I {=u8:#x}", id),
        Err(_) => defmt::warn!("MPU-6050 init failed"),
    }

    // 8. Spawn the four activities and the dashboard
    spawner.spawn(tasks::acquisition_task::acquisition_task(accel, &SHARED)).unwrap();
    spawner.spawn(tasks::control_task::control_task(&SHARED)).unwrap();
    spawner.spawn(tasks::actuation_task::actuation_task(pins, &SHARED)).unwrap();
    spawner.spawn(tasks::setpoint_task::setpoint_task(
        UartSetpoints::new(sp_uart),
        &SHARED,
    )).unwrap();
    spawner.spawn(tasks::status_task::status_task(usb_serial, &SHARED)).unwrap();

    // 9. Main task: LED heartbeat @ 1 Hz
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(500)).await;
    }
}
