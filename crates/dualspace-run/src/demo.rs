//! Built-in demo program.
//!
//! Reads two numbers, writes an `OUTPUT` instruction for their sum into RAM
//! slot 0 and a jump back to ROM into slot 1, runs both from RAM, then falls
//! off the end of ROM.
//!
//! Every `RAM_WRITE` also prints the byte it stores, so the console shows the
//! encoded instruction bytes (96, 64, 6, 160, 16) before the sum.

use dualspace_core::{DecodedInstruction, ImageError, Opcode, ProgramImage};

/// Bytes per RAM instruction slot.
const SLOT_BYTES: u8 = 8;

/// ROM index the RAM code returns to.
const RETURN_PC: u8 = 10;

/// Number of meaningful ROM entries, for listings.
pub const PROGRAM_LEN: usize = 12;

/// Builds the demo ROM image.
pub fn program() -> Result<ProgramImage, ImageError> {
    let print_sum = DecodedInstruction::new(Opcode::Output)
        .with_ram_mode()
        .with_read_a(3);
    let back_to_rom = DecodedInstruction::new(Opcode::Add).with_immediate(RETURN_PC);

    let mut rom = vec![
        DecodedInstruction::new(Opcode::Scan).with_write_select(1),
        DecodedInstruction::new(Opcode::Scan).with_write_select(2),
        DecodedInstruction::new(Opcode::Add)
            .with_write_select(3)
            .with_read_a(1)
            .with_read_b(2),
    ];
    rom.extend(poke(0, print_sum));
    rom.extend(poke(1, back_to_rom));
    rom.push(DecodedInstruction::new(Opcode::Add).with_ram_mode());
    rom.resize(usize::from(RETURN_PC), DecodedInstruction::new(Opcode::Add));

    // r4 = 255; 255 >= 1 so the goto lands on 256, one past the last entry.
    rom.push(
        DecodedInstruction::new(Opcode::Add)
            .with_write_select(4)
            .with_immediate(u8::MAX),
    );
    rom.push(
        DecodedInstruction::new(Opcode::Jge)
            .with_read_a(4)
            .with_immediate(1)
            .with_jump_offset(1)
            .with_goto(),
    );

    ProgramImage::from_instructions(&rom)
}

/// `RAM_WRITE`s storing the nonzero bytes of `instruction` into RAM slot
/// `slot`; memory starts zeroed.
fn poke(slot: u8, instruction: DecodedInstruction) -> Vec<DecodedInstruction> {
    let first_cell = slot * SLOT_BYTES;
    (first_cell..)
        .zip(instruction.encode().to_le_bytes())
        .filter(|(_, byte)| *byte != 0)
        .map(|(cell, byte)| {
            DecodedInstruction::new(Opcode::RamWrite)
                .with_write_select(cell + 1)
                .with_immediate(byte)
        })
        .collect()
}
