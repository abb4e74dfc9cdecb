//! Opcode table and instruction-word field layout.
//!
//! An instruction word carries 44 meaningful bits packed most-significant
//! first. The named fields cover bits 43..4; bits 3..0 are reserved and are
//! ignored on decode and written as zero on encode.

/// Number of meaningful bits in an instruction word container.
pub const INSTRUCTION_BITS: u32 = 44;

/// Mask selecting the meaningful bits of a 64-bit instruction container.
pub const INSTRUCTION_MASK: u64 = (1 << INSTRUCTION_BITS) - 1;

/// Mask of the reserved low nibble below `read_b_select_or_immediate`.
pub const RESERVED_MASK: u64 = 0xF;

/// Named bit fields of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionField {
    /// Absolute-jump tag.
    Goto,
    /// Instruction space requested for the next fetch.
    RamMode,
    /// Operation selector.
    Opcode,
    /// Relative branch distance used by comparison opcodes.
    JumpOffset,
    /// Destination register or memory cell selector.
    WriteSelect,
    /// First operand register selector.
    ReadASelect,
    /// Selects the immediate form of the second operand.
    ImmediateEnable,
    /// Second operand selector, or the raw immediate.
    ReadBOrImmediate,
}

/// Single source-of-truth field layout as `(field, shift, width)`.
pub const FIELD_LAYOUT: &[(InstructionField, u32, u32)] = &[
    (InstructionField::Goto, 43, 1),
    (InstructionField::RamMode, 42, 1),
    (InstructionField::Opcode, 37, 5),
    (InstructionField::JumpOffset, 29, 8),
    (InstructionField::WriteSelect, 21, 8),
    (InstructionField::ReadASelect, 13, 8),
    (InstructionField::ImmediateEnable, 12, 1),
    (InstructionField::ReadBOrImmediate, 4, 8),
];

/// Bit position of the `goto` flag.
pub const GOTO_SHIFT: u32 = 43;
/// Bit position of the `ram_mode` flag.
pub const RAM_MODE_SHIFT: u32 = 42;
/// Lowest bit of the 5-bit opcode field.
pub const OPCODE_SHIFT: u32 = 37;
/// Lowest bit of the 8-bit jump offset field.
pub const JUMP_OFFSET_SHIFT: u32 = 29;
/// Lowest bit of the 8-bit write select field.
pub const WRITE_SELECT_SHIFT: u32 = 21;
/// Lowest bit of the 8-bit read-A select field.
pub const READ_A_SHIFT: u32 = 13;
/// Bit position of the `immediate_enable` flag.
pub const IMMEDIATE_ENABLE_SHIFT: u32 = 12;
/// Lowest bit of the 8-bit read-B select / immediate field.
pub const READ_B_SHIFT: u32 = 4;

/// Mask for the 5-bit opcode field after shifting.
pub const OPCODE_MASK: u64 = 0x1F;
/// Mask for any 8-bit field after shifting.
pub const BYTE_FIELD_MASK: u64 = 0xFF;

/// Operation selected by the 5-bit opcode field.
///
/// Every 5-bit value maps to a variant; values without an assigned meaning
/// decode to [`Opcode::Unrecognized`] and execute as the default addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Opcode {
    /// `path_a + path_b`.
    Add,
    /// `path_a - path_b`.
    Sub,
    /// `path_a * path_b`.
    Mul,
    /// `path_a / path_b`, or the division sentinel when `path_b == 0`.
    Div,
    /// Bitwise OR.
    Or,
    /// Bitwise AND.
    And,
    /// Bitwise XOR.
    Xor,
    /// `(path_a + path_b) >> 1`.
    #[strum(serialize = "SHIFT_R")]
    ShiftRight,
    /// `(path_a + path_b) << 1`.
    #[strum(serialize = "SHIFT_L")]
    ShiftLeft,
    /// Branch when `path_a == path_b`.
    Je,
    /// Branch when `path_a <= path_b`.
    Jle,
    /// Branch when `path_a >= path_b`.
    Jge,
    /// Branch when `path_a < path_b`.
    Jl,
    /// Branch when `path_a > path_b`.
    Jg,
    /// Branch when `path_a != path_b`.
    Jne,
    /// Reads `path_b` from console input.
    Scan,
    /// Stores `output` to memory and then announces it on the console.
    RamWrite,
    /// Reads `path_b` from memory.
    RamRead,
    /// Emits `output` on the console.
    Output,
    /// Any 5-bit value without an assigned meaning.
    Unrecognized(u8),
}

/// Assigned opcode values. Any 5-bit value absent here is unrecognized.
pub const OPCODE_TABLE: &[(u8, Opcode)] = &[
    (0, Opcode::Add),
    (1, Opcode::Sub),
    (2, Opcode::Mul),
    (3, Opcode::Div),
    (4, Opcode::Or),
    (5, Opcode::And),
    (6, Opcode::Xor),
    (7, Opcode::ShiftRight),
    (8, Opcode::ShiftLeft),
    (9, Opcode::Je),
    (10, Opcode::Jle),
    (11, Opcode::Jge),
    (12, Opcode::Jl),
    (13, Opcode::Jg),
    (14, Opcode::Jne),
    (15, Opcode::Scan),
    (16, Opcode::RamWrite),
    (17, Opcode::RamRead),
    (18, Opcode::Output),
];

impl Opcode {
    /// Classifies a 5-bit opcode value. Bits above the field width are ignored.
    #[must_use]
    pub const fn from_u5(value: u8) -> Self {
        match value & 0x1F {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::Mul,
            3 => Self::Div,
            4 => Self::Or,
            5 => Self::And,
            6 => Self::Xor,
            7 => Self::ShiftRight,
            8 => Self::ShiftLeft,
            9 => Self::Je,
            10 => Self::Jle,
            11 => Self::Jge,
            12 => Self::Jl,
            13 => Self::Jg,
            14 => Self::Jne,
            15 => Self::Scan,
            16 => Self::RamWrite,
            17 => Self::RamRead,
            18 => Self::Output,
            other => Self::Unrecognized(other),
        }
    }

    /// Returns the 5-bit field value for this opcode.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Sub => 1,
            Self::Mul => 2,
            Self::Div => 3,
            Self::Or => 4,
            Self::And => 5,
            Self::Xor => 6,
            Self::ShiftRight => 7,
            Self::ShiftLeft => 8,
            Self::Je => 9,
            Self::Jle => 10,
            Self::Jge => 11,
            Self::Jl => 12,
            Self::Jg => 13,
            Self::Jne => 14,
            Self::Scan => 15,
            Self::RamWrite => 16,
            Self::RamRead => 17,
            Self::Output => 18,
            Self::Unrecognized(value) => value & 0x1F,
        }
    }

    /// Returns true for the six comparison opcodes that may set a branch.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Je | Self::Jle | Self::Jge | Self::Jl | Self::Jg | Self::Jne
        )
    }

    /// Upper-case mnemonic used in trace output.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        self.into()
    }
}
