//! USB HID mouse report (boot protocol compatible).
//!
//! Layout (4 bytes):
//! ```text
//! Byte 0: Button bitfield (bit 0 = the single ADB button)
//! Byte 1: X displacement (signed, -127..127)
//! Byte 2: Y displacement (signed, -127..127)
//! Byte 3: Reserved / wheel, always 0
//! ```

use crate::adb::mouse::{decode_axis, PointerSample};

/// Mouse report size in bytes.
pub const MOUSE_REPORT_SIZE: usize = 4;

/// Standard USB HID boot-protocol mouse report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Button bitfield (bit 0 = left).
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed).
    pub y: i8,
}

impl MouseReport {
    /// Create an idle (no movement, no buttons) report.
    #[cfg(test)]
    pub const fn empty() -> Self {
        Self {
            buttons: 0,
            x: 0,
            y: 0,
        }
    }

    /// Build a report from a bus sample.
    ///
    /// The wire button is active-low, so it is inverted here. The caller
    /// must have filtered out the empty-sample sentinel.
    pub fn from_sample(sample: &PointerSample) -> Self {
        Self {
            buttons: if sample.button { 0 } else { 1 },
            x: axis_to_hid(sample.x_offset),
            y: axis_to_hid(sample.y_offset),
        }
    }

    /// Sample straight to wire bytes.
    pub fn build(sample: &PointerSample) -> [u8; MOUSE_REPORT_SIZE] {
        Self::from_sample(sample).to_wire_bytes()
    }

    /// Wire image: `[buttons, x, y, 0]`.
    pub fn to_wire_bytes(&self) -> [u8; MOUSE_REPORT_SIZE] {
        [self.buttons, self.x as u8, self.y as u8, 0]
    }

    /// Returns `true` when no buttons are pressed and there is no movement.
    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.buttons == 0 && self.x == 0 && self.y == 0
    }
}

/// Bus delta to HID delta, kept inside the descriptor's logical range.
fn axis_to_hid(v: u8) -> i8 {
    decode_axis(v).clamp(-127, 127)
}

// USB HID report descriptor for a boot-protocol mouse

/// USB HID Report Descriptor for a 3-button mouse with scroll wheel.
///
/// ADB mice only have one button and no wheel; the extra fields stay zero
/// but keep the layout identical to the boot protocol.
pub const MOUSE_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    //
    //   - Buttons (3 bits + 5 padding) -
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x01, //     Input (Constant) - padding
    //
    //   - X, Y displacement -
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    //   - Scroll wheel -
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    0xC0, //   End Collection (Physical)
    0xC0, // End Collection (Application)
];
