/// A 16-bit instruction word assembled from two consecutive memory bytes,
/// with accessors for the operand fields the instruction set uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word(u16);

impl Word {
    /// Assemble a word from two bytes, big-endian.
    pub fn from_bytes(high: u8, low: u8) -> Word {
        Word(((high as u16) << 8) | low as u16)
    }

    pub fn from_u16(value: u16) -> Word {
        Word(value)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// The four nibbles of the word, most significant first.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            ((self.0 >> 12) & 0xF) as u8,
            ((self.0 >> 8) & 0xF) as u8,
            ((self.0 >> 4) & 0xF) as u8,
            (self.0 & 0xF) as u8,
        )
    }

    /// The 12-bit address field (lowest three nibbles).
    pub fn addr(self) -> u16 {
        self.0 & 0x0FFF
    }

    /// The 8-bit immediate field (lowest byte).
    pub fn imm(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_is_big_endian() {
        assert_eq!(0x1234, Word::from_bytes(0x12, 0x34).as_u16());
        assert_eq!(0xFFFF, Word::from_bytes(0xFF, 0xFF).as_u16());
        assert_eq!(0x0000, Word::from_bytes(0x00, 0x00).as_u16());
        assert_eq!(0xF00F, Word::from_bytes(0xF0, 0x0F).as_u16());
    }

    #[test]
    fn nibbles_are_extracted_in_order() {
        assert_eq!((0xA, 0xB, 0xC, 0xD), Word::from_u16(0xABCD).nibbles());
        assert_eq!((0, 0, 0, 0), Word::from_u16(0x0000).nibbles());
        assert_eq!((0xF, 0, 0xF, 0), Word::from_u16(0xF0F0).nibbles());
    }

    #[test]
    fn operand_fields() {
        assert_eq!(0xBCD, Word::from_u16(0xABCD).addr());
        assert_eq!(0xCD, Word::from_u16(0xABCD).imm());
    }
}
