//! Lock keys: Caps Lock, Num Lock and Scroll Lock.
//!
//! Each lock is an Off/On toggle flipped by a *press* of its key. After
//! a flip the whole [`LockState`] is written to the keyboard LEDs, never
//! a single bit, so a dropped write is repaired by the next one.
//!
//! - Caps Lock never travels through the key array on its own. In
//!   [`CapsLockMode::Pulse`] every flip sends the host a synthetic press
//!   and release; in [`CapsLockMode::LedOnly`] only the LED changes.
//! - Num Lock is local bookkeeping. While it is off, keypad usages are
//!   stripped from the report before every transmission.
//! - Scroll Lock passes through to the host as a normal key; only its
//!   LED is tracked here.

use embedded_hal_async::delay::DelayNs;

use crate::adb::keyboard::{code, KeyEvent};
pub use crate::config::CapsLockMode;
use crate::config::BridgeConfig;
use crate::hid::keyboard::KeyboardReport;
use crate::hid::usage::{KEY_CAPSLOCK, LED_CAPS_LOCK, LED_NUM_LOCK, LED_SCROLL_LOCK};
use crate::hid::HidTransport;

/// Logical lock state, mirrored on the keyboard LEDs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockState {
    pub caps: bool,
    pub num: bool,
    pub scroll: bool,
}

impl LockState {
    /// HID LED output byte layout (bit 0 Num, bit 1 Caps, bit 2 Scroll).
    pub const fn host_led_bits(&self) -> u8 {
        (self.num as u8) * LED_NUM_LOCK
            | (self.caps as u8) * LED_CAPS_LOCK
            | (self.scroll as u8) * LED_SCROLL_LOCK
    }

    /// Low three bits of keyboard register 2. Same bit order as the HID
    /// byte, but active-low: a cleared bit lights the LED.
    pub const fn adb_led_bits(&self) -> u8 {
        !self.host_led_bits() & 0x07
    }
}

/// Which locks flipped on one register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockUpdate {
    pub caps: bool,
    pub num: bool,
    pub scroll: bool,
}

impl LockUpdate {
    pub const fn is_empty(&self) -> bool {
        !(self.caps || self.num || self.scroll)
    }
}

/// Owns the lock state and decides when it changes.
#[derive(Clone, Debug)]
pub struct LockKeyController {
    state: LockState,
    caps_mode: CapsLockMode,
    caps_latching: bool,
    track_scroll: bool,
    sync_host: bool,
    settle_ms: u32,
}

impl LockKeyController {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            state: LockState {
                caps: false,
                num: config.num_lock_on_start,
                scroll: false,
            },
            caps_mode: config.caps_lock_mode,
            caps_latching: config.caps_lock_latching,
            track_scroll: config.scroll_lock_led,
            sync_host: config.sync_host_leds,
            settle_ms: config.caps_lock_settle_ms,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn caps_mode(&self) -> CapsLockMode {
        self.caps_mode
    }

    /// Strip keypad usages while Num Lock is off.
    /// Returns `true` if the report changed and must be re-sent.
    pub fn filter_keypad(&self, report: &mut KeyboardReport) -> bool {
        if self.state.num {
            return false;
        }
        report.strip_keypad()
    }

    /// Flip whichever locks this register presses.
    ///
    /// Releases are ignored unless Caps Lock is configured as latching. A
    /// register carrying Caps Lock in both halves is malformed (a single
    /// key cannot change twice in one poll) and is ignored outright.
    pub fn on_key_event(&mut self, event: &KeyEvent) -> LockUpdate {
        let caps_twice = event.key0 == code::CAPS_LOCK && event.key1 == code::CAPS_LOCK;
        let caps = if caps_twice {
            debug!("caps lock in both halves of {:#x}, ignored", event.raw);
            false
        } else if self.caps_latching {
            event.mentions(code::CAPS_LOCK)
        } else {
            event.pressed(code::CAPS_LOCK)
        };

        let update = LockUpdate {
            caps,
            num: event.pressed(code::NUM_LOCK),
            scroll: self.track_scroll && event.pressed(code::SCROLL_LOCK),
        };

        self.state.caps ^= update.caps;
        self.state.num ^= update.num;
        self.state.scroll ^= update.scroll;

        if !update.is_empty() {
            info!("lock state: {}", self.state);
        }
        update
    }

    /// `true` if `update` requires a synthetic Caps Lock keystroke.
    pub fn needs_caps_pulse(&self, update: &LockUpdate) -> bool {
        update.caps && self.caps_mode == CapsLockMode::Pulse
    }

    /// Press Caps Lock in `report`, send it, hold for the settle time,
    /// then release it again (the caller sends the release).
    ///
    /// Returns `false` if there was no free slot for the press.
    pub async fn pulse_caps_lock<T, D>(
        &self,
        report: &mut KeyboardReport,
        transport: &mut T,
        delay: &mut D,
    ) -> bool
    where
        T: HidTransport,
        D: DelayNs,
    {
        if !report.add_key(KEY_CAPSLOCK) {
            warn!("no free key slot, caps lock pulse dropped");
            return false;
        }

        transport.send_keyboard_report(report.to_wire_bytes()).await;
        delay.delay_ms(self.settle_ms).await;
        report.remove_key(KEY_CAPSLOCK);
        true
    }

    /// Adopt the LED byte the host pushed.
    ///
    /// Only Caps and Scroll Lock are taken over. The host never sees our
    /// Num Lock key, so its Num Lock bit says nothing about ours. In
    /// [`CapsLockMode::LedOnly`] the host never sees Caps Lock either and
    /// its Caps bit is ignored too.
    /// Returns `true` if the state changed.
    pub fn apply_host_leds(&mut self, bits: u8) -> bool {
        if !self.sync_host {
            return false;
        }

        let next = LockState {
            caps: match self.caps_mode {
                CapsLockMode::Pulse => bits & LED_CAPS_LOCK != 0,
                CapsLockMode::LedOnly => self.state.caps,
            },
            num: self.state.num,
            scroll: self.track_scroll && bits & LED_SCROLL_LOCK != 0,
        };
        if next == self.state {
            return false;
        }

        debug!("host leds {:#x}: {} -> {}", bits, self.state, next);
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adb::keyboard::IDLE_HALF;
    use crate::hid::usage::{KEY_A, KEY_KP1, KEY_KPEQUAL};
    use embassy_futures::block_on;

    fn controller() -> LockKeyController {
        LockKeyController::new(&BridgeConfig::default())
    }

    #[derive(Default)]
    struct Recorder {
        keyboard: [[u8; 8]; 4],
        sent: usize,
    }

    impl HidTransport for Recorder {
        async fn send_keyboard_report(&mut self, report: [u8; 8]) {
            self.keyboard[self.sent] = report;
            self.sent += 1;
        }

        async fn send_mouse_report(&mut self, _report: [u8; 4]) {}
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ms: u64,
    }

    impl DelayNs for CountingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += u64::from(ns) / 1_000_000;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += u64::from(ms);
        }
    }

    #[test]
    fn default_state_has_num_lock_on() {
        let c = controller();
        assert_eq!(
            c.state(),
            LockState {
                caps: false,
                num: true,
                scroll: false
            }
        );
    }

    #[test]
    fn caps_toggles_on_press_only() {
        let mut c = controller();
        let up = c.on_key_event(&KeyEvent::single(code::CAPS_LOCK, false));
        assert!(up.caps);
        assert!(c.state().caps);

        let up = c.on_key_event(&KeyEvent::single(code::CAPS_LOCK, true));
        assert!(up.is_empty());
        assert!(c.state().caps);

        c.on_key_event(&KeyEvent::single(code::CAPS_LOCK, false));
        assert!(!c.state().caps);
    }

    #[test]
    fn latching_caps_toggles_on_release_too() {
        let mut c = LockKeyController::new(&BridgeConfig {
            caps_lock_latching: true,
            ..BridgeConfig::default()
        });
        c.on_key_event(&KeyEvent::single(code::CAPS_LOCK, false));
        assert!(c.state().caps);
        c.on_key_event(&KeyEvent::single(code::CAPS_LOCK, true));
        assert!(!c.state().caps);
    }

    #[test]
    fn caps_in_both_halves_is_ignored() {
        let mut c = controller();
        let ev = KeyEvent::new(code::CAPS_LOCK, false, code::CAPS_LOCK, false);
        assert!(c.on_key_event(&ev).is_empty());
        let ev = KeyEvent::new(code::CAPS_LOCK, false, code::CAPS_LOCK, true);
        assert!(c.on_key_event(&ev).is_empty());
        assert!(!c.state().caps);
    }

    #[test]
    fn num_lock_toggles_and_gates_keypad() {
        let mut c = controller();
        let mut report = KeyboardReport::empty();
        report.add_key(KEY_KP1);
        assert!(!c.filter_keypad(&mut report));
        assert!(report.contains(KEY_KP1));

        let up = c.on_key_event(&KeyEvent::single(code::NUM_LOCK, false));
        assert!(up.num && !up.caps);
        assert!(!c.state().num);

        report.add_key(KEY_KPEQUAL);
        report.add_key(KEY_A);
        assert!(c.filter_keypad(&mut report));
        assert!(!report.contains(KEY_KP1));
        assert!(!report.contains(KEY_KPEQUAL));
        assert!(report.contains(KEY_A));
    }

    #[test]
    fn scroll_lock_tracking_can_be_disabled() {
        let mut c = controller();
        assert!(c.on_key_event(&KeyEvent::single(code::SCROLL_LOCK, false)).scroll);
        assert!(c.state().scroll);

        let mut c = LockKeyController::new(&BridgeConfig {
            scroll_lock_led: false,
            ..BridgeConfig::default()
        });
        assert!(c.on_key_event(&KeyEvent::single(code::SCROLL_LOCK, false)).is_empty());
        assert!(!c.state().scroll);
    }

    #[test]
    fn idle_register_touches_nothing() {
        let mut c = controller();
        let before = c.state();
        let ev = KeyEvent::new(IDLE_HALF, true, IDLE_HALF, true);
        assert!(c.on_key_event(&ev).is_empty());
        assert_eq!(c.state(), before);
    }

    #[test]
    fn pulse_only_in_pulse_mode() {
        let caps = LockUpdate {
            caps: true,
            ..LockUpdate::default()
        };
        assert!(controller().needs_caps_pulse(&caps));

        let led_only = LockKeyController::new(&BridgeConfig {
            caps_lock_mode: CapsLockMode::LedOnly,
            ..BridgeConfig::default()
        });
        assert!(!led_only.needs_caps_pulse(&caps));
        assert!(!controller().needs_caps_pulse(&LockUpdate::default()));
    }

    #[test]
    fn pulse_sends_press_then_leaves_release_pending() {
        let c = controller();
        let mut report = KeyboardReport::empty();
        report.add_key(KEY_A);
        let mut transport = Recorder::default();
        let mut delay = CountingDelay::default();

        assert!(block_on(c.pulse_caps_lock(&mut report, &mut transport, &mut delay)));
        assert_eq!(transport.sent, 1);
        assert_eq!(transport.keyboard[0], [0, 0, KEY_A, KEY_CAPSLOCK, 0, 0, 0, 0]);
        assert_eq!(delay.total_ms, 80);
        assert!(!report.contains(KEY_CAPSLOCK));
        assert!(report.contains(KEY_A));
    }

    #[test]
    fn pulse_dropped_when_report_full() {
        let c = controller();
        let mut report = KeyboardReport {
            modifier: 0,
            keycodes: [4, 5, 6, 7, 8, 9],
        };
        let mut transport = Recorder::default();
        let mut delay = CountingDelay::default();

        assert!(!block_on(c.pulse_caps_lock(&mut report, &mut transport, &mut delay)));
        assert_eq!(transport.sent, 0);
        assert_eq!(delay.total_ms, 0);
    }

    #[test]
    fn host_leds_adopt_caps_and_scroll_but_not_num() {
        let mut c = controller();
        assert!(c.apply_host_leds(LED_CAPS_LOCK | LED_SCROLL_LOCK));
        assert_eq!(
            c.state(),
            LockState {
                caps: true,
                num: true,
                scroll: true
            }
        );

        // Num Lock bit clear in the push: ours stays on.
        assert!(!c.apply_host_leds(LED_CAPS_LOCK | LED_SCROLL_LOCK));
        assert!(c.state().num);
    }

    #[test]
    fn led_only_caps_survives_host_push() {
        let mut c = LockKeyController::new(&BridgeConfig {
            caps_lock_mode: CapsLockMode::LedOnly,
            ..BridgeConfig::default()
        });
        c.on_key_event(&KeyEvent::single(code::CAPS_LOCK, false));
        assert!(c.state().caps);

        // The host has never seen Caps Lock, so its bit is always clear.
        assert!(!c.apply_host_leds(LED_NUM_LOCK));
        assert!(c.state().caps);

        // Scroll Lock is still adopted.
        assert!(c.apply_host_leds(LED_SCROLL_LOCK));
        assert!(c.state().caps);
        assert!(c.state().scroll);
    }

    #[test]
    fn host_leds_ignored_when_sync_disabled() {
        let mut c = LockKeyController::new(&BridgeConfig {
            sync_host_leds: false,
            ..BridgeConfig::default()
        });
        assert!(!c.apply_host_leds(LED_CAPS_LOCK));
        assert!(!c.state().caps);
    }

    #[test]
    fn led_bit_encodings() {
        let s = LockState {
            caps: true,
            num: true,
            scroll: false,
        };
        assert_eq!(s.host_led_bits(), 0b011);
        assert_eq!(s.adb_led_bits(), 0b100);
        assert_eq!(LockState::default().adb_led_bits(), 0b111);
    }
}
