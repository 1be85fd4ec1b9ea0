//! Bus keyboard register → HID report state.
//!
//! Both halves of a register are applied every time, even when one of
//! them is the idle filler: the filler translates to [`KEY_NONE`] and
//! falls out in [`update_key`], which is simpler than working out which
//! half carried the real transition.

use crate::adb::keyboard::{KeyEvent, POWER_DOWN, POWER_UP};
use crate::hid::keyboard::KeyboardReport;
use crate::hid::usage::{KEY_NONE, KEY_POWER};
use crate::keymap::Keymap;

/// Applies keyboard register samples to a [`KeyboardReport`].
#[derive(Clone, Copy, Debug)]
pub struct KeyEventTranslator<'a> {
    keymap: &'a Keymap,
}

impl<'a> KeyEventTranslator<'a> {
    pub const fn new(keymap: &'a Keymap) -> Self {
        Self { keymap }
    }

    /// Apply one register. Returns `true` if the report changed.
    pub fn apply(&self, report: &mut KeyboardReport, event: &KeyEvent) -> bool {
        // The power key shows up in both halves at once.
        match event.raw {
            POWER_DOWN => return update_key(report, KEY_POWER, false),
            POWER_UP => return update_key(report, KEY_POWER, true),
            _ => {}
        }

        let mut changed = false;
        for (code, released) in event.halves() {
            changed |= self.apply_half(report, code, released);
        }
        changed
    }

    fn apply_half(&self, report: &mut KeyboardReport, code: u8, released: bool) -> bool {
        if self.keymap.is_modifier(code) {
            report.update_modifier(self.keymap.modifier_mask(code), !released)
        } else {
            update_key(report, self.keymap.to_hid(code), released)
        }
    }
}

/// Press or release one HID usage.
///
/// [`KEY_NONE`] is rejected up front: the keyboard sometimes answers with
/// rubbish that decodes to nothing.
pub fn update_key(report: &mut KeyboardReport, hid_code: u8, released: bool) -> bool {
    if hid_code == KEY_NONE {
        return false;
    }

    if released {
        report.remove_key(hid_code)
    } else {
        report.add_key(hid_code)
    }
}
