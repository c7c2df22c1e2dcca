use crate::util::word::Word;

/// A register selector in the range 0x0..=0xF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A 12-bit memory address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// An 8-bit immediate operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Imm(pub u8);

/// A single decoded instruction.
///
/// Each variant is listed with its encoding, where
/// - NNN is a 12-bit address,
/// - NN an 8-bit immediate,
/// - N a 4-bit immediate,
/// - X and Y 4-bit register selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,            // 00E0
    Return,                 // 00EE
    Jump(Addr),             // 1NNN
    Call(Addr),             // 2NNN
    SkipEqImm(Reg, Imm),    // 3XNN
    SkipNeImm(Reg, Imm),    // 4XNN
    SkipEqReg(Reg, Reg),    // 5XY0
    LoadImm(Reg, Imm),      // 6XNN
    AddImm(Reg, Imm),       // 7XNN
    Copy(Reg, Reg),         // 8XY0
    Or(Reg, Reg),           // 8XY1
    And(Reg, Reg),          // 8XY2
    Xor(Reg, Reg),          // 8XY3
    AddReg(Reg, Reg),       // 8XY4
    SubReg(Reg, Reg),       // 8XY5
    ShiftRight(Reg),        // 8XY6
    SubFrom(Reg, Reg),      // 8XY7
    ShiftLeft(Reg),         // 8XYE
    SkipNeReg(Reg, Reg),    // 9XY0
    LoadIndex(Addr),        // ANNN
    JumpOffset(Addr),       // BNNN
    Random(Reg, Imm),       // CXNN
    Draw(Reg, Reg, u8),     // DXYN
    SkipKeyPressed(Reg),    // EX9E
    SkipKeyNotPressed(Reg), // EXA1
    ReadDelay(Reg),         // FX07
    WaitKey(Reg),           // FX0A
    SetDelay(Reg),          // FX15
    SetSound(Reg),          // FX18
    AddIndex(Reg),          // FX1E
    LoadGlyph(Reg),         // FX29
    StoreBcd(Reg),          // FX33
    StoreRegs(Reg),         // FX55
    LoadRegs(Reg),          // FX65
}

impl Instruction {
    /// Decode an instruction word, or `None` if the nibble combination
    /// is outside the instruction set.
    pub fn decode(word: Word) -> Option<Instruction> {
        let instruction = match word.nibbles() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (1, _, _, _) => Instruction::Jump(Addr(word.addr())),
            (2, _, _, _) => Instruction::Call(Addr(word.addr())),
            (3, x, _, _) => Instruction::SkipEqImm(Reg(x), Imm(word.imm())),
            (4, x, _, _) => Instruction::SkipNeImm(Reg(x), Imm(word.imm())),
            (5, x, y, 0) => Instruction::SkipEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::LoadImm(Reg(x), Imm(word.imm())),
            (7, x, _, _) => Instruction::AddImm(Reg(x), Imm(word.imm())),
            (8, x, y, 0) => Instruction::Copy(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::Or(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::And(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::Xor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::AddReg(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::SubReg(Reg(x), Reg(y)),
            (8, x, _, 6) => Instruction::ShiftRight(Reg(x)),
            (8, x, y, 7) => Instruction::SubFrom(Reg(x), Reg(y)),
            (8, x, _, 0xE) => Instruction::ShiftLeft(Reg(x)),
            (9, x, y, 0) => Instruction::SkipNeReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::LoadIndex(Addr(word.addr())),
            (0xB, _, _, _) => Instruction::JumpOffset(Addr(word.addr())),
            (0xC, x, _, _) => Instruction::Random(Reg(x), Imm(word.imm())),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), n),
            (0xE, x, 9, 0xE) => Instruction::SkipKeyPressed(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::SkipKeyNotPressed(Reg(x)),
            (0xF, x, 0, 7) => Instruction::ReadDelay(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::WaitKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelay(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSound(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddIndex(Reg(x)),
            (0xF, x, 2, 9) => Instruction::LoadGlyph(Reg(x)),
            (0xF, x, 3, 3) => Instruction::StoreBcd(Reg(x)),
            (0xF, x, 5, 5) => Instruction::StoreRegs(Reg(x)),
            (0xF, x, 6, 5) => Instruction::LoadRegs(Reg(x)),
            _ => return None,
        };
        Some(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(word: u16) -> Instruction {
        Instruction::decode(Word::from_u16(word)).unwrap()
    }

    #[test]
    fn instructions_are_decoded_correctly() {
        assert_eq!(Instruction::ClearScreen, decode(0x00E0));
        assert_eq!(Instruction::Return, decode(0x00EE));
        assert_eq!(Instruction::Jump(Addr(0x025)), decode(0x1025));
        assert_eq!(Instruction::Call(Addr(0x037)), decode(0x2037));
        assert_eq!(Instruction::SkipEqImm(Reg(0xA), Imm(8)), decode(0x3A08));
        assert_eq!(Instruction::SkipNeImm(Reg(0xA), Imm(8)), decode(0x4A08));
        assert_eq!(Instruction::SkipEqReg(Reg(0xA), Reg(0xB)), decode(0x5AB0));
        assert_eq!(Instruction::LoadImm(Reg(0xB), Imm(0x23)), decode(0x6B23));
        assert_eq!(Instruction::AddImm(Reg(0xC), Imm(0xA1)), decode(0x7CA1));
        assert_eq!(Instruction::Copy(Reg(0xA), Reg(0xB)), decode(0x8AB0));
        assert_eq!(Instruction::Or(Reg(0xD), Reg(0xE)), decode(0x8DE1));
        assert_eq!(Instruction::And(Reg(0xD), Reg(0xE)), decode(0x8DE2));
        assert_eq!(Instruction::Xor(Reg(0xD), Reg(0xE)), decode(0x8DE3));
        assert_eq!(Instruction::AddReg(Reg(0xA), Reg(0xB)), decode(0x8AB4));
        assert_eq!(Instruction::SubReg(Reg(0xA), Reg(0xB)), decode(0x8AB5));
        assert_eq!(Instruction::ShiftRight(Reg(0xA)), decode(0x8AB6));
        assert_eq!(Instruction::SubFrom(Reg(0xA), Reg(0xB)), decode(0x8AB7));
        assert_eq!(Instruction::ShiftLeft(Reg(0xA)), decode(0x8A0E));
        assert_eq!(Instruction::SkipNeReg(Reg(0xA), Reg(0xB)), decode(0x9AB0));
        assert_eq!(Instruction::LoadIndex(Addr(0x025)), decode(0xA025));
        assert_eq!(Instruction::JumpOffset(Addr(0x025)), decode(0xB025));
        assert_eq!(Instruction::Random(Reg(0xA), Imm(0x23)), decode(0xCA23));
        assert_eq!(Instruction::Draw(Reg(0xA), Reg(0xB), 0xC), decode(0xDABC));
        assert_eq!(Instruction::SkipKeyPressed(Reg(0xA)), decode(0xEA9E));
        assert_eq!(Instruction::SkipKeyNotPressed(Reg(0xA)), decode(0xEAA1));
        assert_eq!(Instruction::ReadDelay(Reg(0xA)), decode(0xFA07));
        assert_eq!(Instruction::WaitKey(Reg(0xA)), decode(0xFA0A));
        assert_eq!(Instruction::SetDelay(Reg(0xA)), decode(0xFA15));
        assert_eq!(Instruction::SetSound(Reg(0xA)), decode(0xFA18));
        assert_eq!(Instruction::AddIndex(Reg(0xA)), decode(0xFA1E));
        assert_eq!(Instruction::LoadGlyph(Reg(0xA)), decode(0xFA29));
        assert_eq!(Instruction::StoreBcd(Reg(0xA)), decode(0xFA33));
        assert_eq!(Instruction::StoreRegs(Reg(0xA)), decode(0xFA55));
        assert_eq!(Instruction::LoadRegs(Reg(0xA)), decode(0xFA65));
    }

    #[test]
    fn unknown_nibble_combinations_do_not_decode() {
        for &word in &[0xFFFFu16, 0x0000, 0x00E1, 0x5AB1, 0x8AB8, 0x9AB1, 0xEA00, 0xFA00] {
            assert_eq!(None, Instruction::decode(Word::from_u16(word)));
        }
    }
}
