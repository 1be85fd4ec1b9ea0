//! USB HID keyboard report (boot protocol compatible).
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```
//!
//! The report is the long-lived key state of the bridge: the translator
//! adds and removes usages as bus transitions arrive, and the whole report
//! is re-sent whenever it changes.

use crate::hid::usage::{is_keypad, KEY_NONE};

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Number of key slots. Fixed by the boot protocol.
pub const KEY_SLOTS: usize = 6;

/// Standard USB HID boot-protocol keyboard report.
///
/// No usage ever occupies two slots. Slot order follows insertion but
/// carries no meaning for the host.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Up to 6 simultaneously pressed key codes, 0 = empty slot.
    pub keycodes: [u8; KEY_SLOTS],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            keycodes: [0; KEY_SLOTS],
        }
    }

    /// Put a usage into the first free slot.
    ///
    /// Returns `true` only if a slot was filled. A key that is already
    /// held is left alone and reports `false`, as do [`KEY_NONE`] and a
    /// full report (the seventh key is dropped).
    pub fn add_key(&mut self, code: u8) -> bool {
        if code == KEY_NONE {
            return false;
        }

        let mut free_slot = None;
        for (i, &k) in self.keycodes.iter().enumerate() {
            if k == code {
                return false;
            }
            if k == KEY_NONE && free_slot.is_none() {
                free_slot = Some(i);
            }
        }

        match free_slot {
            Some(i) => {
                self.keycodes[i] = code;
                true
            }
            None => false,
        }
    }

    /// Clear every slot holding `code`. Returns `true` if any was cleared.
    pub fn remove_key(&mut self, code: u8) -> bool {
        if code == KEY_NONE {
            return false;
        }

        let mut changed = false;
        for k in self.keycodes.iter_mut().filter(|k| **k == code) {
            *k = KEY_NONE;
            changed = true;
        }
        changed
    }

    /// Set or clear a modifier bit. Returns `false` if it was already in
    /// the requested state.
    pub fn update_modifier(&mut self, mask: u8, pressed: bool) -> bool {
        if mask == 0 || (self.modifier & mask == mask) == pressed {
            return false;
        }

        if pressed {
            self.modifier |= mask;
        } else {
            self.modifier &= !mask;
        }
        true
    }

    /// `true` if `code` occupies a slot.
    pub fn contains(&self, code: u8) -> bool {
        code != KEY_NONE && self.keycodes.contains(&code)
    }

    /// Drop every numeric keypad usage. Returns `true` if any was present.
    pub fn strip_keypad(&mut self) -> bool {
        let mut changed = false;
        for k in self.keycodes.iter_mut().filter(|k| is_keypad(**k)) {
            *k = KEY_NONE;
            changed = true;
        }
        changed
    }

    /// Wire image: `[modifiers, 0, key0..key5]`.
    pub fn to_wire_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        buf[0] = self.modifier;
        buf[2..8].copy_from_slice(&self.keycodes);
        buf
    }

    /// Returns `true` if no keys or modifiers are held.
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == KEY_NONE)
    }
}

// USB HID report descriptor for a boot-protocol keyboard

/// USB HID Report Descriptor for a standard keyboard.
///
/// This descriptor tells the USB host that we are a keyboard with:
///   - 8 modifier key bits (input)
///   - 1 reserved byte
///   - 5 LED indicators (output)
///   - 6 key code bytes (input)
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];
