//! HID report types and the host-facing transport seam.

pub mod keyboard;
pub mod mouse;
pub mod usage;


use keyboard::KEYBOARD_REPORT_SIZE;
use mouse::MOUSE_REPORT_SIZE;

/// Where finished reports go: a USB endpoint or a BLE characteristic.
///
/// Implementations pick the link at construction time; the dispatch loop
/// only ever sees this trait. Sends are fire-and-forget: a report the
/// link cannot take is dropped and the next change re-sends full state.
#[allow(async_fn_in_trait)]
pub trait HidTransport {
    /// Send an 8-byte boot keyboard report.
    async fn send_keyboard_report(&mut self, report: [u8; KEYBOARD_REPORT_SIZE]);

    /// Send a 4-byte boot mouse report.
    async fn send_mouse_report(&mut self, report: [u8; MOUSE_REPORT_SIZE]);

    /// Most recent LED output byte pushed by the host since the last call,
    /// if any. Bit 0 = Num Lock, bit 1 = Caps Lock, bit 2 = Scroll Lock.
    ///
    /// Host pushes arrive on another execution context; the dispatch loop
    /// drains them here so that only the loop ever writes the lock state.
    fn take_host_leds(&mut self) -> Option<u8> {
        None
    }
}

/// Latest LED byte written by the host, shared between the USB/BLE
/// callbacks and the transport that hands it to the dispatch loop.
#[cfg(feature = "embedded")]
pub(crate) static HOST_LEDS: embassy_sync::signal::Signal<
    embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex,
    u8,
> = embassy_sync::signal::Signal::new();
