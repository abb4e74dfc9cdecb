use crate::{
    validate_ram_fetch, validate_rom_fetch, ExecutionMode, FaultCode, InstructionWord,
    MachineState,
};

/// Reads the word at `state.pc` from the active instruction space.
///
/// ROM fetches index the program table. RAM fetches assemble eight
/// little-endian bytes starting at `pc * 8`, so a program that rewrites
/// those bytes changes what runs next.
///
/// # Errors
///
/// Returns [`FaultCode::AddressOutOfRange`] when the PC lies outside the
/// active space.
pub fn fetch_instruction(state: &MachineState) -> Result<InstructionWord, FaultCode> {
    match state.mode {
        ExecutionMode::Rom => {
            let index = validate_rom_fetch(state.pc)?;
            state
                .program
                .word_at(index)
                .ok_or(FaultCode::AddressOutOfRange)
        }
        ExecutionMode::Ram => {
            let addr = validate_ram_fetch(state.pc)?;
            state
                .memory
                .instruction_at(addr)
                .ok_or(FaultCode::AddressOutOfRange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fetch_instruction;
    use crate::{
        DecodedInstruction, ExecutionMode, FaultCode, InstructionWord, MachineState, Opcode,
        ProgramImage,
    };

    #[test]
    fn rom_fetch_reads_program_table() {
        let state = MachineState::new(ProgramImage::from_words(&[1, 2, 3]).expect("fits"));
        let mut at_two = state.clone();
        at_two.pc = 2;
        assert_eq!(fetch_instruction(&state), Ok(InstructionWord::new(1)));
        assert_eq!(fetch_instruction(&at_two), Ok(InstructionWord::new(3)));
    }

    #[test]
    fn ram_fetch_reads_eight_byte_slots() {
        let word = DecodedInstruction::new(Opcode::Output)
            .with_ram_mode()
            .with_read_a(3)
            .encode();
        let mut state = MachineState::default();
        assert!(state.memory.store_instruction(8, word));
        state.mode = ExecutionMode::Ram;
        state.pc = 1;

        assert_eq!(fetch_instruction(&state), Ok(word));
    }

    #[test]
    fn fetch_outside_active_space_faults() {
        let mut state = MachineState::default();
        state.pc = 256;
        assert_eq!(
            fetch_instruction(&state),
            Err(FaultCode::AddressOutOfRange)
        );

        state.mode = ExecutionMode::Ram;
        state.pc = 31;
        assert!(fetch_instruction(&state).is_ok());
        state.pc = 32;
        assert_eq!(
            fetch_instruction(&state),
            Err(FaultCode::AddressOutOfRange)
        );
    }
}
