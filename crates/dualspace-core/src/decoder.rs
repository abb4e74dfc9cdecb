//! Instruction decoder for the Dualspace instruction word.
//!
//! Decoding is a pure mask-and-shift over one fixed bit layout (see
//! [`crate::encoding::FIELD_LAYOUT`]); it never fails. Memory-resident words
//! are assembled least-significant byte first, independent of host
//! endianness.

use crate::encoding::{
    Opcode, BYTE_FIELD_MASK, GOTO_SHIFT, IMMEDIATE_ENABLE_SHIFT, INSTRUCTION_MASK,
    JUMP_OFFSET_SHIFT, OPCODE_MASK, OPCODE_SHIFT, RAM_MODE_SHIFT, READ_A_SHIFT, READ_B_SHIFT,
    WRITE_SELECT_SHIFT,
};

/// Number of bytes a memory-resident instruction word occupies.
pub const INSTRUCTION_WORD_BYTES: usize = 8;

/// Raw instruction word: 44 meaningful bits in a 64-bit container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InstructionWord(u64);

impl InstructionWord {
    /// Wraps a raw container value. Bits above bit 43 are kept but never decoded.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw container value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns only the 44 meaningful bits.
    #[must_use]
    pub const fn meaningful_bits(self) -> u64 {
        self.0 & INSTRUCTION_MASK
    }

    /// Assembles a word from memory bytes, lowest address first.
    #[must_use]
    pub const fn from_le_bytes(bytes: [u8; INSTRUCTION_WORD_BYTES]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    /// Splits the word into memory bytes, lowest address first.
    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; INSTRUCTION_WORD_BYTES] {
        self.0.to_le_bytes()
    }
}

impl From<u64> for InstructionWord {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Decoded instruction with every field extracted.
///
/// The builder-style `with_*` methods make it convenient to assemble program
/// images by hand and then [`encode`](Self::encode) them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedInstruction {
    /// Turns a taken branch or space switch into an absolute jump to `output`.
    pub goto: bool,
    /// Instruction space the next fetch should use (`true` = RAM).
    pub ram_mode: bool,
    /// Operation selector.
    pub opcode: Opcode,
    /// Relative branch distance applied when a comparison holds.
    pub jump_offset: u8,
    /// 1-based destination selector; 0 disables write-back.
    pub write_select: u8,
    /// 1-based register selector for `path_a`; 0 yields zero.
    pub read_a_select: u8,
    /// When set, `read_b_or_immediate` is a raw immediate.
    pub immediate_enable: bool,
    /// 1-based selector for `path_b`, or the raw immediate.
    pub read_b_or_immediate: u8,
}

impl DecodedInstruction {
    /// Creates an instruction with every field other than `opcode` cleared.
    #[must_use]
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            goto: false,
            ram_mode: false,
            opcode,
            jump_offset: 0,
            write_select: 0,
            read_a_select: 0,
            immediate_enable: false,
            read_b_or_immediate: 0,
        }
    }

    /// Sets the `goto` flag.
    #[must_use]
    pub const fn with_goto(mut self) -> Self {
        self.goto = true;
        self
    }

    /// Sets the `ram_mode` flag.
    #[must_use]
    pub const fn with_ram_mode(mut self) -> Self {
        self.ram_mode = true;
        self
    }

    /// Sets the relative branch distance.
    #[must_use]
    pub const fn with_jump_offset(mut self, offset: u8) -> Self {
        self.jump_offset = offset;
        self
    }

    /// Sets the 1-based destination selector.
    #[must_use]
    pub const fn with_write_select(mut self, selector: u8) -> Self {
        self.write_select = selector;
        self
    }

    /// Sets the 1-based `path_a` register selector.
    #[must_use]
    pub const fn with_read_a(mut self, selector: u8) -> Self {
        self.read_a_select = selector;
        self
    }

    /// Sets the 1-based `path_b` selector and clears `immediate_enable`.
    #[must_use]
    pub const fn with_read_b(mut self, selector: u8) -> Self {
        self.immediate_enable = false;
        self.read_b_or_immediate = selector;
        self
    }

    /// Sets a raw immediate for `path_b` and enables the immediate form.
    #[must_use]
    pub const fn with_immediate(mut self, value: u8) -> Self {
        self.immediate_enable = true;
        self.read_b_or_immediate = value;
        self
    }

    /// Re-encodes this instruction into a word. The reserved nibble is zero.
    #[must_use]
    pub const fn encode(self) -> InstructionWord {
        let mut raw = 0u64;
        raw |= (self.goto as u64) << GOTO_SHIFT;
        raw |= (self.ram_mode as u64) << RAM_MODE_SHIFT;
        raw |= ((self.opcode.code() as u64) & OPCODE_MASK) << OPCODE_SHIFT;
        raw |= (self.jump_offset as u64) << JUMP_OFFSET_SHIFT;
        raw |= (self.write_select as u64) << WRITE_SELECT_SHIFT;
        raw |= (self.read_a_select as u64) << READ_A_SHIFT;
        raw |= (self.immediate_enable as u64) << IMMEDIATE_ENABLE_SHIFT;
        raw |= (self.read_b_or_immediate as u64) << READ_B_SHIFT;
        InstructionWord(raw)
    }
}

/// Instruction decoder for the Dualspace instruction word.
pub struct Decoder;

#[allow(clippy::cast_possible_truncation)]
const fn byte_field(raw: u64, shift: u32) -> u8 {
    ((raw >> shift) & BYTE_FIELD_MASK) as u8
}

const fn flag(raw: u64, shift: u32) -> bool {
    (raw >> shift) & 1 == 1
}

impl Decoder {
    /// Decodes an instruction word.
    ///
    /// Total over all bit patterns: unassigned opcodes decode to
    /// [`Opcode::Unrecognized`], and bits outside the 44-bit layout or in the
    /// reserved nibble are ignored.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn decode(word: InstructionWord) -> DecodedInstruction {
        let raw = word.meaningful_bits();

        DecodedInstruction {
            goto: flag(raw, GOTO_SHIFT),
            ram_mode: flag(raw, RAM_MODE_SHIFT),
            opcode: Opcode::from_u5(((raw >> OPCODE_SHIFT) & OPCODE_MASK) as u8),
            jump_offset: byte_field(raw, JUMP_OFFSET_SHIFT),
            write_select: byte_field(raw, WRITE_SELECT_SHIFT),
            read_a_select: byte_field(raw, READ_A_SHIFT),
            immediate_enable: flag(raw, IMMEDIATE_ENABLE_SHIFT),
            read_b_or_immediate: byte_field(raw, READ_B_SHIFT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::RESERVED_MASK;

    #[test]
    fn decode_zero_word_is_plain_add() {
        let instruction = Decoder::decode(InstructionWord::new(0));
        assert_eq!(instruction, DecodedInstruction::new(Opcode::Add));
    }

    #[test]
    fn decode_extracts_each_field_at_its_position() {
        let raw = (1u64 << 43)
            | (1u64 << 42)
            | (16u64 << 37)
            | (0xA5u64 << 29)
            | (0x03u64 << 21)
            | (0x10u64 << 13)
            | (1u64 << 12)
            | (0xFEu64 << 4);
        let instruction = Decoder::decode(InstructionWord::new(raw));

        assert!(instruction.goto);
        assert!(instruction.ram_mode);
        assert_eq!(instruction.opcode, Opcode::RamWrite);
        assert_eq!(instruction.jump_offset, 0xA5);
        assert_eq!(instruction.write_select, 0x03);
        assert_eq!(instruction.read_a_select, 0x10);
        assert!(instruction.immediate_enable);
        assert_eq!(instruction.read_b_or_immediate, 0xFE);
    }

    #[test]
    fn decode_ignores_reserved_nibble_and_upper_container_bits() {
        let base = DecodedInstruction::new(Opcode::Xor)
            .with_write_select(2)
            .with_read_a(1)
            .with_immediate(9)
            .encode();
        let noisy = InstructionWord::new(base.raw() | RESERVED_MASK | (0xFFFu64 << 52));
        assert_eq!(Decoder::decode(noisy), Decoder::decode(base));
    }

    #[test]
    fn encode_leaves_reserved_nibble_clear() {
        let word = DecodedInstruction::new(Opcode::Output)
            .with_goto()
            .with_ram_mode()
            .with_immediate(0xFF)
            .encode();
        assert_eq!(word.raw() & RESERVED_MASK, 0);
        assert_eq!(word.raw(), word.meaningful_bits());
    }

    #[test]
    fn unassigned_opcode_decodes_without_failing() {
        let word = InstructionWord::new(29u64 << 37);
        assert_eq!(Decoder::decode(word).opcode, Opcode::Unrecognized(29));
    }

    #[test]
    fn memory_byte_order_is_least_significant_first() {
        let word = InstructionWord::new(0x0000_0807_0605_0403);
        assert_eq!(word.to_le_bytes(), [0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0, 0]);
        assert_eq!(InstructionWord::from_le_bytes(word.to_le_bytes()), word);
    }

    #[test]
    fn with_read_b_clears_immediate_form() {
        let instruction = DecodedInstruction::new(Opcode::Add)
            .with_immediate(5)
            .with_read_b(3);
        assert!(!instruction.immediate_enable);
        assert_eq!(instruction.read_b_or_immediate, 3);
    }

    #[test]
    fn exhaustive_opcode_field_decode_roundtrip() {
        for code in 0u8..32 {
            let instruction = DecodedInstruction::new(Opcode::from_u5(code))
                .with_jump_offset(code)
                .with_write_select(code.wrapping_mul(7))
                .with_read_a(code.wrapping_mul(13))
                .with_immediate(code.wrapping_mul(31));
            assert_eq!(Decoder::decode(instruction.encode()), instruction);
        }
    }
}
