//! Mouse register 0: one button and two 7-bit relative deltas.

/// One mouse register sample.
///
/// `raw == 0` is what the bus hands back when the mouse had nothing new
/// and must be filtered before it reaches the report builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerSample {
    /// Wire button level: `true` = released, `false` = pressed.
    pub button: bool,
    /// X delta in bus encoding (7-bit two's complement).
    pub x_offset: u8,
    /// Y delta in bus encoding (7-bit two's complement).
    pub y_offset: u8,
    /// The register as read from the bus.
    pub raw: u16,
}

impl PointerSample {
    /// Decode a raw register 0 value.
    pub const fn from_register(raw: u16) -> Self {
        Self {
            button: raw & 0x8000 != 0,
            y_offset: ((raw >> 8) & 0x7F) as u8,
            x_offset: (raw & 0x7F) as u8,
            raw,
        }
    }

    /// Encode a sample from signed deltas, clamped to the 7-bit range.
    pub fn from_deltas(button: bool, dx: i8, dy: i8) -> Self {
        let x = encode_axis(dx) as u16;
        let y = encode_axis(dy) as u16;
        let b = if button { 0x8000 } else { 0 };
        // Bit 7 is the unused second button, idle high.
        Self::from_register(b | y << 8 | 0x0080 | x)
    }

    /// `true` for the "no new sample" sentinel.
    pub const fn is_empty(&self) -> bool {
        self.raw == 0
    }
}

/// Sign-extend a 7-bit bus delta.
pub const fn decode_axis(v: u8) -> i8 {
    let v = v & 0x7F;
    if v & 0x40 != 0 {
        (v | 0x80) as i8
    } else {
        v as i8
    }
}

fn encode_axis(delta: i8) -> u8 {
    (delta.clamp(-64, 63) as u8) & 0x7F
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_axis_sign_extends() {
        assert_eq!(decode_axis(0x00), 0);
        assert_eq!(decode_axis(0x03), 3);
        assert_eq!(decode_axis(0x3F), 63);
        assert_eq!(decode_axis(0x40), -64);
        assert_eq!(decode_axis(0x7E), -2);
        assert_eq!(decode_axis(0x7F), -1);
    }

    #[test]
    fn decode_register_fields() {
        // button released, dy = -2 (0x7E), dx = +3
        let s = PointerSample::from_register(0xFE03);
        assert!(s.button);
        assert_eq!(s.y_offset, 0x7E);
        assert_eq!(s.x_offset, 0x03);
        assert!(!s.is_empty());
    }

    #[test]
    fn from_deltas_clamps_to_seven_bits() {
        let s = PointerSample::from_deltas(false, 100, -100);
        assert_eq!(decode_axis(s.x_offset), 63);
        assert_eq!(decode_axis(s.y_offset), -64);
    }

    #[test]
    fn pressed_button_without_motion_is_not_sentinel() {
        let s = PointerSample::from_deltas(false, 0, 0);
        assert!(!s.button);
        assert!(!s.is_empty());
    }

    #[test]
    fn zero_register_is_sentinel() {
        assert!(PointerSample::from_register(0).is_empty());
        // Button pressed with no motion is a real sample, not a sentinel.
        assert!(!PointerSample::from_register(0x0080).is_empty());
    }
}
