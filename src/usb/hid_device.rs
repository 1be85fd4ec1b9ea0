//! USB HID composite device - keyboard + mouse.

use embassy_usb::class::hid::{
    Config as HidConfig, HidWriter, OutResponse, ReportId, RequestHandler, State,
};
use embassy_usb::driver::Driver;
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use crate::config;
use crate::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use crate::hid::mouse::{MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};
use crate::hid::{HidTransport, HOST_LEDS};

static KB_STATE: StaticCell<State> = StaticCell::new();
static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static KB_REQUEST_HANDLER: StaticCell<LedRequestHandler> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Accepts the keyboard's LED output report and forwards it to the loop.
struct LedRequestHandler;

impl RequestHandler for LedRequestHandler {
    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        match (id, data.first()) {
            (ReportId::Out(_), Some(&leds)) => {
                debug!("host leds {:#x}", leds);
                HOST_LEDS.signal(leds);
                OutResponse::Accepted
            }
            _ => OutResponse::Rejected,
        }
    }
}

/// Keyboard and mouse HID writers behind the [`HidTransport`] seam.
pub struct UsbTransport<D: Driver<'static>> {
    keyboard: HidWriter<'static, D, 8>,
    mouse: HidWriter<'static, D, 8>,
}

impl<D: Driver<'static>> HidTransport for UsbTransport<D> {
    async fn send_keyboard_report(&mut self, report: [u8; KEYBOARD_REPORT_SIZE]) {
        if let Err(_e) = self.keyboard.write(&report).await {
            warn!("USB keyboard write failed");
        }
    }

    async fn send_mouse_report(&mut self, report: [u8; MOUSE_REPORT_SIZE]) {
        if let Err(_e) = self.mouse.write(&report).await {
            warn!("USB mouse write failed");
        }
    }

    fn take_host_leds(&mut self) -> Option<u8> {
        HOST_LEDS.try_take()
    }
}

/// Device runner plus the transport handed to the dispatch loop.
pub struct UsbHid<D: Driver<'static>> {
    pub device: UsbDevice<'static, D>,
    pub transport: UsbTransport<D>,
}

/// Build the composite HID device on `driver`.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init<D: Driver<'static>>(driver: D) -> UsbHid<D> {
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 64]),
    );

    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: Some(KB_REQUEST_HANDLER.init(LedRequestHandler)),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let keyboard = HidWriter::new(&mut builder, KB_STATE.init(State::new()), kb_config);

    let mouse_config = HidConfig {
        report_descriptor: MOUSE_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let mouse = HidWriter::new(&mut builder, MOUSE_STATE.init(State::new()), mouse_config);

    let device = builder.build();
    info!("USB HID composite device initialised (keyboard + mouse)");

    UsbHid {
        device,
        transport: UsbTransport { keyboard, mouse },
    }
}

/// Run the USB device stack. Spawn as a dedicated task; it services
/// enumeration and control transfers (including LED reports) forever.
pub async fn run_usb_device<D: Driver<'static>>(mut device: UsbDevice<'static, D>) -> ! {
    info!("USB device task started");
    device.run().await
}
