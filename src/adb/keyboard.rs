//! Keyboard register 0: two key transitions per poll.
//!
//! The keyboard always answers with two halves. When only one key
//! changed, the second half is the idle filler `0xFF` (code 0x7F,
//! released), which the keymap translates to nothing.

/// Register value reported when the power key goes down (both halves).
pub const POWER_DOWN: u16 = 0x7F7F;

/// Register value reported when the power key comes back up.
pub const POWER_UP: u16 = 0xFFFF;

/// Half-register filler meaning "no transition".
pub const IDLE_HALF: u8 = 0xFF;

/// Apple Extended keyboard codes referenced outside the keymap table.
pub mod code {
    pub const CAPS_LOCK: u8 = 0x39;
    /// Keypad "Clear", which doubles as Num Lock.
    pub const NUM_LOCK: u8 = 0x47;
    /// F14, labelled Scroll Lock on extended keyboards.
    pub const SCROLL_LOCK: u8 = 0x6B;
    pub const POWER: u8 = 0x7F;

    pub const LEFT_CONTROL: u8 = 0x36;
    pub const LEFT_COMMAND: u8 = 0x37;
    pub const LEFT_SHIFT: u8 = 0x38;
    pub const LEFT_OPTION: u8 = 0x3A;
    pub const RIGHT_SHIFT: u8 = 0x7B;
    pub const RIGHT_OPTION: u8 = 0x7C;
    pub const RIGHT_CONTROL: u8 = 0x7D;
}

/// One keyboard register sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// First (high octet) key code, 7 bits.
    pub key0: u8,
    /// `true` if `key0` was released, `false` if pressed.
    pub released0: bool,
    /// Second (low octet) key code, 7 bits.
    pub key1: u8,
    /// `true` if `key1` was released, `false` if pressed.
    pub released1: bool,
    /// The register as read from the bus.
    pub raw: u16,
}

impl KeyEvent {
    /// Decode a raw register 0 value.
    pub const fn from_register(raw: u16) -> Self {
        Self {
            key0: ((raw >> 8) & 0x7F) as u8,
            released0: raw & 0x8000 != 0,
            key1: (raw & 0x7F) as u8,
            released1: raw & 0x0080 != 0,
            raw,
        }
    }

    /// Build an event from its two halves. Codes are truncated to 7 bits.
    pub const fn new(key0: u8, released0: bool, key1: u8, released1: bool) -> Self {
        let hi = (key0 & 0x7F) as u16 | if released0 { 0x80 } else { 0 };
        let lo = (key1 & 0x7F) as u16 | if released1 { 0x80 } else { 0 };
        Self::from_register(hi << 8 | lo)
    }

    /// A single transition in the high half, idle filler in the low half.
    pub const fn single(key: u8, released: bool) -> Self {
        let hi = (key & 0x7F) as u16 | if released { 0x80 } else { 0 };
        Self::from_register(hi << 8 | IDLE_HALF as u16)
    }

    /// Both halves as `(code, released)` pairs, high half first.
    pub const fn halves(&self) -> [(u8, bool); 2] {
        [(self.key0, self.released0), (self.key1, self.released1)]
    }

    /// `true` if either half reports a press of `code`.
    pub fn pressed(&self, code: u8) -> bool {
        self.halves().iter().any(|&(k, released)| k == code && !released)
    }

    /// `true` if either half mentions `code`, pressed or released.
    pub fn mentions(&self, code: u8) -> bool {
        self.key0 == code || self.key1 == code
    }
}
