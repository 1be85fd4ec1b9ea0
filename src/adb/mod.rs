//! Apple Desktop Bus side of the bridge.
//!
//! The electrical protocol (attention/sync pulses, bit cells, collision
//! detection, SRQ) lives outside this crate. What the translation engine
//! needs from a bus implementation is captured by [`AdbBus`]; the
//! submodules decode the registers it hands back.
//!
//! ## Register 0 layouts
//!
//! ```text
//! Keyboard:  15       14..8   7         6..0
//!            released0 key0   released1 key1
//!
//! Mouse:     15       14..8   7         6..0
//!            button   dy      (unused)  dx
//!            (0 = pressed, deltas are 7-bit two's complement)
//! ```

pub mod keyboard;
pub mod mouse;

use crate::error::BusError;
use crate::lock::LockState;
use keyboard::KeyEvent;
use mouse::PointerSample;

/// Operations the dispatch loop needs from the bus driver.
///
/// Every call is fallible; the loop treats an error as "nothing this
/// cycle" and never as a state change.
#[allow(async_fn_in_trait)]
pub trait AdbBus {
    /// Talk to the keyboard's register 0.
    async fn read_keyboard_event(&mut self) -> Result<KeyEvent, BusError>;

    /// Talk to the mouse's register 0.
    async fn read_mouse_sample(&mut self) -> Result<PointerSample, BusError>;

    /// Write the full lock state to the keyboard LEDs (register 2).
    /// See [`LockState::adb_led_bits`] for the wire encoding.
    async fn write_lock_leds(&mut self, num: bool, caps: bool, scroll: bool)
        -> Result<(), BusError>;

    /// Ask the device at `address` to switch to `handler_id`.
    ///
    /// `Err` means no device answered. `Ok(accepted)` means a device is
    /// present; `accepted` tells whether it took the new handler.
    async fn negotiate_device(&mut self, address: u8, handler_id: u8) -> Result<bool, BusError>;
}

/// Mirror a whole [`LockState`] onto the keyboard LEDs.
pub(crate) async fn write_leds<B: AdbBus>(bus: &mut B, leds: LockState) -> Result<(), BusError> {
    bus.write_lock_leds(leds.num, leds.caps, leds.scroll).await
}
