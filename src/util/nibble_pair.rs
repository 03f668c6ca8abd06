/// A packed byte holding two 4-bit values, such as two pixel intensities.
/// The high nibble comes first (the left pixel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NibblePair(u8);

impl NibblePair {

    pub fn new(packed: u8) -> NibblePair {
        NibblePair(packed)
    }

    /// Pack two nibbles, discarding anything above the low 4 bits of each.
    pub fn from_nibbles(high: u8, low: u8) -> NibblePair {
        NibblePair(((high & 0x0F) << 4) | (low & 0x0F))
    }

    pub fn high(&self) -> u8 {
        self.0 >> 4
    }

    pub fn low(&self) -> u8 {
        self.0 & 0x0F
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn as_two_u8(&self) -> (u8, u8) {
        (self.high(), self.low())
    }
}

/// Combine two bytes stored least significant first.
pub fn le_u16(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Split a `u16` into its little-endian byte order.
pub fn split_le_u16(value: u16) -> (u8, u8) {
    ((value & 0x00FF) as u8, (value >> 8) as u8)
}

#[cfg(test)]
mod tests {

    use super::*;
    use test_case::test_case;

    #[test_case(0x00 => (0x0, 0x0) ; "empty")]
    #[test_case(0xF0 => (0xF, 0x0) ; "left only")]
    #[test_case(0x0F => (0x0, 0xF) ; "right only")]
    #[test_case(0xA5 => (0xA, 0x5) ; "both")]
    fn splits_packed_byte(packed: u8) -> (u8, u8) {
        NibblePair::new(packed).as_two_u8()
    }

    #[test]
    fn from_nibbles_masks_input() {
        assert_eq!(NibblePair::from_nibbles(0x1A, 0xF3).as_u8(), 0xA3);
    }

    #[test]
    fn le_helpers_agree() {
        assert_eq!(le_u16(0x34, 0x12), 0x1234);
        assert_eq!(split_le_u16(0x1234), (0x34, 0x12));
        assert_eq!(le_u16(0xFF, 0xFF), 0xFFFF);
    }
}
