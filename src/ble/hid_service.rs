//! BLE GATT HID service (HID-over-GATT, boot protocol).
//!
//! Exposes the HID service (UUID 0x1812) with the boot keyboard and boot
//! mouse characteristics. The host writes its LED byte to Boot Keyboard
//! Output; that is forwarded to the dispatch loop via [`HOST_LEDS`].

use nrf_softdevice::ble::{gatt_server, Connection};
use nrf_softdevice::Softdevice;

use crate::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use crate::hid::mouse::MOUSE_REPORT_SIZE;
use crate::hid::{HidTransport, HOST_LEDS};

/// Length of the advertised report map.
pub const REPORT_MAP_LEN: usize = KEYBOARD_REPORT_DESCRIPTOR.len();

/// HID Information: bcdHID 1.11, country 0, flags RemoteWake|NormallyConnectable.
const HID_INFO: [u8; 4] = [0x11, 0x01, 0x00, 0x03];

/// Protocol Mode value for boot protocol.
const PROTOCOL_MODE_BOOT: u8 = 0;

#[nrf_softdevice::gatt_service(uuid = "1812")]
pub struct HidService {
    /// HID Information.
    #[characteristic(uuid = "2a4a", read)]
    pub hid_info: [u8; 4],

    /// Report Map.
    #[characteristic(uuid = "2a4b", read)]
    pub report_map: [u8; REPORT_MAP_LEN],

    /// HID Control Point (suspend / exit suspend).
    #[characteristic(uuid = "2a4c", write_without_response)]
    pub control_point: u8,

    /// Protocol Mode - 0 = Boot Protocol, 1 = Report Protocol.
    #[characteristic(uuid = "2a4e", read, write_without_response)]
    pub protocol_mode: u8,

    #[characteristic(uuid = "2a22", read, notify)]
    pub boot_keyboard_input: [u8; KEYBOARD_REPORT_SIZE],

    /// LED output byte written by the host.
    #[characteristic(uuid = "2a32", read, write, write_without_response)]
    pub boot_keyboard_output: u8,

    #[characteristic(uuid = "2a33", read, notify)]
    pub boot_mouse_input: [u8; MOUSE_REPORT_SIZE],
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub hid: HidService,
}

impl Server {
    /// Register the service and fill in its static characteristics.
    pub fn init(sd: &mut Softdevice) -> Result<Self, gatt_server::RegisterError> {
        let server = Server::new(sd)?;

        let mut report_map = [0u8; REPORT_MAP_LEN];
        report_map.copy_from_slice(KEYBOARD_REPORT_DESCRIPTOR);

        let set = server
            .hid
            .hid_info_set(&HID_INFO)
            .and_then(|_| server.hid.report_map_set(&report_map))
            .and_then(|_| server.hid.protocol_mode_set(&PROTOCOL_MODE_BOOT));
        if set.is_err() {
            warn!("BLE HID: could not set initial characteristic values");
        }

        info!("BLE HID service registered");
        Ok(server)
    }
}

/// Serve GATT requests on `conn` until it drops.
///
/// Host LED writes are signalled to the dispatch loop; everything else
/// is only logged.
pub async fn run_gatt_server(conn: &Connection, server: &Server) {
    info!("BLE HID GATT server started");

    let reason = gatt_server::run(conn, server, |event| match event {
        ServerEvent::Hid(HidServiceEvent::BootKeyboardOutputWrite(leds)) => {
            debug!("host leds {:#x}", leds);
            HOST_LEDS.signal(leds);
        }
        ServerEvent::Hid(HidServiceEvent::ProtocolModeWrite(mode)) => {
            if mode != PROTOCOL_MODE_BOOT {
                warn!("host requested protocol mode {}, only boot is served", mode);
            }
        }
        ServerEvent::Hid(HidServiceEvent::ControlPointWrite(cmd)) => {
            debug!("HID control point {}", cmd);
        }
        ServerEvent::Hid(HidServiceEvent::BootKeyboardInputCccdWrite { notifications }) => {
            info!("keyboard notifications: {}", notifications);
        }
        ServerEvent::Hid(HidServiceEvent::BootMouseInputCccdWrite { notifications }) => {
            info!("mouse notifications: {}", notifications);
        }
    })
    .await;

    info!("BLE HID GATT server ended: {}", reason);
}

/// Notifies boot reports on the attached connection.
///
/// With no connection attached reports are dropped; the next change
/// after reconnecting re-sends full state.
pub struct BleTransport<'a> {
    server: &'a Server,
    conn: Option<Connection>,
}

impl<'a> BleTransport<'a> {
    pub const fn new(server: &'a Server) -> Self {
        Self { server, conn: None }
    }

    pub fn attach(&mut self, conn: Connection) {
        info!("BLE HID transport attached");
        self.conn = Some(conn);
    }

    pub fn detach(&mut self) {
        if self.conn.take().is_some() {
            info!("BLE HID transport detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.conn.is_some()
    }
}

impl HidTransport for BleTransport<'_> {
    async fn send_keyboard_report(&mut self, report: [u8; KEYBOARD_REPORT_SIZE]) {
        let Some(conn) = &self.conn else {
            return;
        };
        if let Err(_e) = self.server.hid.boot_keyboard_input_notify(conn, &report) {
            warn!("BLE keyboard notify failed");
        }
    }

    async fn send_mouse_report(&mut self, report: [u8; MOUSE_REPORT_SIZE]) {
        let Some(conn) = &self.conn else {
            return;
        };
        if let Err(_e) = self.server.hid.boot_mouse_input_notify(conn, &report) {
            warn!("BLE mouse notify failed");
        }
    }

    fn take_host_leds(&mut self) -> Option<u8> {
        HOST_LEDS.try_take()
    }
}
