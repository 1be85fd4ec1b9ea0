//! Apple Extended keyboard codes to USB HID usages.
//!
//! The table covers the whole 7-bit code space; unused and unknown codes
//! map to [`KEY_NONE`] so that garbage from the bus is silently dropped.
//! Modifiers are not translated through the table: they set bits in the
//! report's modifier byte instead.
//!
//! Caps Lock and Num Lock (keypad Clear) also map to [`KEY_NONE`]. The
//! lock controller owns them, so the plain key path never sees them.

use crate::adb::keyboard::code;
use crate::hid::usage::*;

/// Immutable translation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keymap {
    table: [u8; 128],
}

/// Layout of the Apple Extended Keyboard (and the standard ADB keyboard,
/// which is a subset).
#[rustfmt::skip]
pub static APPLE_EXTENDED: Keymap = Keymap {
    table: [
        // 0x00
        KEY_A, KEY_S, KEY_D, KEY_F, KEY_H, KEY_G, KEY_Z, KEY_X,
        KEY_C, KEY_V, KEY_102ND, KEY_B, KEY_Q, KEY_W, KEY_E, KEY_R,
        // 0x10
        KEY_Y, KEY_T, KEY_1, KEY_2, KEY_3, KEY_4, KEY_6, KEY_5,
        KEY_EQUAL, KEY_9, KEY_7, KEY_MINUS, KEY_8, KEY_0, KEY_RIGHTBRACE, KEY_O,
        // 0x20
        KEY_U, KEY_LEFTBRACE, KEY_I, KEY_P, KEY_ENTER, KEY_L, KEY_J, KEY_APOSTROPHE,
        KEY_K, KEY_SEMICOLON, KEY_BACKSLASH, KEY_COMMA, KEY_SLASH, KEY_N, KEY_M, KEY_DOT,
        // 0x30
        KEY_TAB, KEY_SPACE, KEY_GRAVE, KEY_BACKSPACE, KEY_KPENTER, KEY_ESC, KEY_NONE, KEY_NONE,
        KEY_NONE, KEY_NONE, KEY_NONE, KEY_LEFT, KEY_RIGHT, KEY_DOWN, KEY_UP, KEY_NONE,
        // 0x40
        KEY_NONE, KEY_KPDOT, KEY_NONE, KEY_KPASTERISK, KEY_NONE, KEY_KPPLUS, KEY_NONE, KEY_NONE,
        KEY_NONE, KEY_NONE, KEY_NONE, KEY_KPSLASH, KEY_KPENTER, KEY_NONE, KEY_KPMINUS, KEY_NONE,
        // 0x50
        KEY_NONE, KEY_KPEQUAL, KEY_KP0, KEY_KP1, KEY_KP2, KEY_KP3, KEY_KP4, KEY_KP5,
        KEY_KP6, KEY_KP7, KEY_NONE, KEY_KP8, KEY_KP9, KEY_NONE, KEY_NONE, KEY_NONE,
        // 0x60
        KEY_F5, KEY_F6, KEY_F7, KEY_F3, KEY_F8, KEY_F9, KEY_NONE, KEY_F11,
        KEY_NONE, KEY_SYSRQ, KEY_NONE, KEY_SCROLLLOCK, KEY_NONE, KEY_F10, KEY_NONE, KEY_F12,
        // 0x70
        KEY_NONE, KEY_PAUSE, KEY_INSERT, KEY_HOME, KEY_PAGEUP, KEY_DELETE, KEY_F4, KEY_END,
        KEY_F2, KEY_PAGEDOWN, KEY_F1, KEY_NONE, KEY_NONE, KEY_NONE, KEY_NONE, KEY_NONE,
    ],
};

impl Keymap {
    /// HID usage for a bus key code, [`KEY_NONE`] if it has none.
    pub fn to_hid(&self, adb_code: u8) -> u8 {
        self.table[(adb_code & 0x7F) as usize]
    }

    /// `true` if the code is a modifier key.
    pub fn is_modifier(&self, adb_code: u8) -> bool {
        self.modifier_mask(adb_code) != 0
    }

    /// Report byte 0 bit for a modifier code, 0 for anything else.
    pub fn modifier_mask(&self, adb_code: u8) -> u8 {
        match adb_code {
            code::LEFT_CONTROL => MOD_LCTRL,
            code::LEFT_SHIFT => MOD_LSHIFT,
            code::LEFT_OPTION => MOD_LALT,
            code::LEFT_COMMAND => MOD_LMETA,
            code::RIGHT_CONTROL => MOD_RCTRL,
            code::RIGHT_SHIFT => MOD_RSHIFT,
            code::RIGHT_OPTION => MOD_RALT,
            _ => 0,
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        APPLE_EXTENDED
    }
}
