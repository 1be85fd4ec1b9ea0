//! Application-wide constants and runtime configuration.
//!
//! Timing parameters, bus addresses and protocol constants live here so
//! they can be tuned in one place. [`BridgeConfig`] carries the knobs an
//! integrator may want to change at construction time; nothing is
//! persisted.

// ADB bus

/// Bus address of the keyboard.
pub const ADB_ADDR_KEYBOARD: u8 = 2;

/// Bus address of the mouse.
pub const ADB_ADDR_MOUSE: u8 = 3;

/// Keyboard handler ID requested at detection (Apple Extended protocol,
/// reports left and right modifiers separately).
pub const ADB_KEYBOARD_HANDLER_EXTENDED: u8 = 0x03;

/// Mouse handler ID requested at detection (higher resolution).
pub const ADB_MOUSE_HANDLER_HIGH_RES: u8 = 0x02;

// Timing

/// Delay after each device poll (ms).
pub const POLL_DELAY_MS: u32 = 5;

/// Time the Caps Lock key is held down in a synthetic pulse (ms).
pub const CAPS_LOCK_SETTLE_MS: u32 = 80;

/// Wait before talking to the bus after power-up (ms).
/// Some keyboards (AEKII) take a moment to reset.
pub const STARTUP_DELAY_MS: u32 = 1000;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "adb2usb";
pub const USB_PRODUCT: &str = "ADB-to-USB HID Bridge";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

// BLE

/// Device name advertised by the BLE HID service.
pub const BLE_DEVICE_NAME: &str = "ADB Keyboard";

/// How Caps Lock is presented to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CapsLockMode {
    /// Each toggle sends a Caps Lock press followed by a release, for hosts
    /// that only see Caps Lock as an edge-triggered key.
    #[default]
    Pulse,
    /// Only the keyboard LED follows the toggle; Caps Lock never reaches
    /// the HID report.
    LedOnly,
}

/// Runtime configuration for [`crate::bridge::Bridge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// Delay after each device poll (ms).
    pub poll_delay_ms: u32,
    /// Wait before device detection (ms).
    pub startup_delay_ms: u32,
    /// Caps Lock presentation.
    pub caps_lock_mode: CapsLockMode,
    /// Hold time of the synthetic Caps Lock press (ms).
    pub caps_lock_settle_ms: u32,
    /// Toggle Caps Lock on release as well as press. Needed for keyboards
    /// whose Caps Lock key latches mechanically.
    pub caps_lock_latching: bool,
    /// Num Lock state at power-up.
    pub num_lock_on_start: bool,
    /// Track Scroll Lock and mirror it on the keyboard LED.
    pub scroll_lock_led: bool,
    /// Adopt Caps/Scroll Lock LED state pushed by the host.
    pub sync_host_leds: bool,
    /// Handler ID requested from the keyboard during detection.
    pub keyboard_handler_id: u8,
    /// Handler ID requested from the mouse during detection.
    pub mouse_handler_id: u8,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            poll_delay_ms: POLL_DELAY_MS,
            startup_delay_ms: STARTUP_DELAY_MS,
            caps_lock_mode: CapsLockMode::Pulse,
            caps_lock_settle_ms: CAPS_LOCK_SETTLE_MS,
            caps_lock_latching: false,
            num_lock_on_start: true,
            scroll_lock_led: true,
            sync_host_leds: true,
            keyboard_handler_id: ADB_KEYBOARD_HANDLER_EXTENDED,
            mouse_handler_id: ADB_MOUSE_HANDLER_HIGH_RES,
        }
    }
}
