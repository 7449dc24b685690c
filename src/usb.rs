use core::mem::MaybeUninit;

use embassy_stm32::usb_otg::{self, Driver};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config, UsbDevice};

bind_interrupts!(pub struct Irqs {
    OTG_FS => usb_otg::InterruptHandler<peripherals::USB_OTG_FS>;
});

pub type UsbDriver = Driver<'static, peripherals::USB_OTG_FS>;
pub type UsbSerial<'a> = CdcAcmClass<'a, UsbDriver>;

/// Max packet size of the CDC data endpoints.
pub const CDC_PACKET_SIZE: u16 = 64;

// Descriptors the dashboard looks for when it picks a serial port
const VID: u16 = 0xc0de;
const PID: u16 = 0xcafe;
const MANUFACTURER: &str = "ParkiMotion";
const PRODUCT: &str = "Vibration Controller";
const SERIAL_NUMBER: &str = "PM000001";

/// Buffers lent to the USB stack for the rest of the program.
struct UsbBuffers<'a> {
    config_desc: [u8; 256],
    bos_desc: [u8; 256],
    control_buf: [u8; 64],
    ep_out: [u8; 256],
    cdc_state: MaybeUninit<State<'a>>,
}

static mut USB_BUFFERS: UsbBuffers<'static> = UsbBuffers {
    config_desc: [0; 256],
    bos_desc: [0; 256],
    control_buf: [0; 64],
    ep_out: [0; 256],
    cdc_state: MaybeUninit::uninit(),
};

#[embassy_executor::task]
pub async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

fn device_config() -> Config<'static> {
    let mut config = Config::new(VID, PID);
    config.manufacturer = Some(MANUFACTURER);
    config.product = Some(PRODUCT);
    config.serial_number = Some(SERIAL_NUMBER);
    config
}

/// CDC-ACM device carrying the status dashboard. Call once.
pub fn init(
    usb_periph: peripherals::USB_OTG_FS,
    dp: peripherals::PA12,
    dm: peripherals::PA11,
) -> (UsbDevice<'static, UsbDriver>, UsbSerial<'static>) {
    // SAFETY: called once from main, before any task can reach USB_BUFFERS.
    let bufs = unsafe { &mut *(&raw mut USB_BUFFERS) };

    let mut otg_config = usb_otg::Config::default();
    // no VBUS sense line on this board
    otg_config.vbus_detection = false;
    let driver = Driver::new_fs(usb_periph, Irqs, dp, dm, &mut bufs.ep_out, otg_config);

    let mut builder = Builder::new(
        driver,
        device_config(),
        &mut bufs.config_desc,
        &mut bufs.bos_desc,
        &mut [], // no MS OS descriptors
        &mut bufs.control_buf,
    );
    let serial = CdcAcmClass::new(&mut builder, bufs.cdc_state.write(State::new()), CDC_PACKET_SIZE);

    (builder.build(), serial)
}
