//! Instruction disassembly.
//!
//! Rows render as `MNEMONIC dest, a, b[, +offset][, goto][, ram]` where `_`
//! marks a disabled selector, `rN` a 1-based register, `#N` an immediate,
//! `mem[N]` a memory cell and `in` a console read.

use crate::{
    DecodedInstruction, Decoder, ExecutionMode, InstructionWord, Memory, Opcode, ProgramImage,
    INSTRUCTION_WORD_BYTES,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Instruction index in `mode`.
    pub pc: u32,
    /// Space the word was read from.
    pub mode: ExecutionMode,
    /// Raw instruction word.
    pub raw: InstructionWord,
    /// Opcode mnemonic, e.g. `ADD` or `RAM_WRITE`.
    pub mnemonic: String,
    /// Formatted operand list.
    pub operands: String,
}

impl std::fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:>3}: {} {}", self.mode, self.pc, self.mnemonic, self.operands)
    }
}

/// Renders one decoded instruction as `MNEMONIC operands`.
#[must_use]
pub fn format_instruction(instruction: &DecodedInstruction) -> String {
    format!(
        "{} {}",
        instruction.opcode.mnemonic(),
        format_operands(instruction)
    )
}

/// Disassembles `count` ROM entries starting at `start`, stopping at the end
/// of the table.
#[must_use]
pub fn disassemble_rom(program: &ProgramImage, start: u32, count: usize) -> Vec<DisassemblyRow> {
    (start..)
        .take(count)
        .map_while(|pc| {
            let word = program.word_at(usize::try_from(pc).ok()?)?;
            Some(row(pc, ExecutionMode::Rom, word))
        })
        .collect()
}

/// Disassembles `count` RAM instruction slots starting at slot `start`,
/// stopping at the last slot that fits in memory.
#[must_use]
pub fn disassemble_ram(memory: &Memory, start: u32, count: usize) -> Vec<DisassemblyRow> {
    (start..)
        .take(count)
        .map_while(|pc| {
            let addr = usize::try_from(pc)
                .ok()?
                .checked_mul(INSTRUCTION_WORD_BYTES)?;
            let word = memory.instruction_at(addr)?;
            Some(row(pc, ExecutionMode::Ram, word))
        })
        .collect()
}

fn row(pc: u32, mode: ExecutionMode, raw: InstructionWord) -> DisassemblyRow {
    let instruction = Decoder::decode(raw);
    DisassemblyRow {
        pc,
        mode,
        raw,
        mnemonic: instruction.opcode.mnemonic().to_string(),
        operands: format_operands(&instruction),
    }
}

fn format_operands(instruction: &DecodedInstruction) -> String {
    let dest = match instruction.opcode {
        Opcode::RamWrite => format_cell(instruction.write_select),
        _ => format_register(instruction.write_select),
    };
    let field = instruction.read_b_or_immediate;
    let b = match instruction.opcode {
        Opcode::Scan => "in".to_string(),
        Opcode::RamRead => format_cell(field),
        _ if instruction.immediate_enable => format!("#{field}"),
        _ => format_register(field),
    };

    let mut parts = vec![dest, format_register(instruction.read_a_select), b];
    if instruction.opcode.is_comparison() {
        parts.push(format!("+{}", instruction.jump_offset));
    }
    if instruction.goto {
        parts.push("goto".to_string());
    }
    if instruction.ram_mode {
        parts.push("ram".to_string());
    }
    parts.join(", ")
}

fn format_register(selector: u8) -> String {
    if selector == 0 {
        "_".to_string()
    } else {
        format!("r{selector}")
    }
}

fn format_cell(selector: u8) -> String {
    match selector.checked_sub(1) {
        Some(addr) => format!("mem[{addr}]"),
        None => "_".to_string(),
    }
}
