use embassy_executor::task;

use parkimotion::drivers::status::{status_line, window_line};
use parkimotion::scheduler::Shared;

use crate::usb::{UsbSerial, CDC_PACKET_SIZE};

const USB_DEBUG_ENABLED: bool = true;

/// Status task: one dashboard line per sample over USB CDC while a host listens.
#[task]
pub async fn status_task(mut usb_serial: UsbSerial<'static>, shared: &'static Shared) {
    loop {
        let snap = shared.status.receive().await;
        if !USB_DEBUG_ENABLED || !usb_serial.dtr() {
            continue;
        }

        write_chunked(&mut usb_serial, status_line(&snap).as_bytes()).await;
        if let Some(e) = snap.window {
            write_chunked(&mut usb_serial, window_line(&e).as_bytes()).await;
        }
    }
}

// one CDC packet at a time
async fn write_chunked(usb_serial: &mut UsbSerial<'static>, b: &[u8]) {
    let mut off = 0;
    while off < b.len() {
        let end = (off + CDC_PACKET_SIZE as usize).min(b.len());
        let _ = usb_serial.write_packet(&b[off..end]).await;
        off = end;
    }
}
