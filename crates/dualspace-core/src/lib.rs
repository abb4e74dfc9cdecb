//! Core simulator crate for the dual-space (ROM/RAM) microprocessor.

/// Instruction field layout and opcode tables.
pub mod encoding;
pub use encoding::{
    InstructionField, Opcode, FIELD_LAYOUT, INSTRUCTION_BITS, INSTRUCTION_MASK, OPCODE_TABLE,
    RESERVED_MASK,
};

/// Instruction word container and field extraction.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder, InstructionWord, INSTRUCTION_WORD_BYTES};

/// Register file, run state and instruction space.
pub mod state;
pub use state::{
    ExecutionMode, RegisterFile, RegisterIndex, RegisterSelector, RunState, REGISTER_COUNT,
};

/// Data memory, ROM program table and fetch-range policy.
pub mod memory;
pub use memory::{
    validate_ram_fetch, validate_rom_fetch, Memory, ProgramImage, MEMORY_BYTES, PROGRAM_WORDS,
};

/// Fault, warning and image error taxonomy.
pub mod fault;
pub use fault::{FaultCode, ImageError, MachineWarning};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    Console, MachineConfig, MachineState, RunOutcome, StepOutcome, TraceCategory, TraceEvent,
    TraceLevel, TraceSink, DEFAULT_CYCLE_DURATION,
};

/// Scripted and stream-backed console implementations.
pub mod console;
pub use console::{ScriptedConsole, StdConsole};

/// Trace sink implementations.
pub mod trace;
pub use trace::{LogTraceSink, NullTraceSink, TraceLog};

/// Instruction disassembly for traces and listings.
pub mod disasm;
pub use disasm::{disassemble_ram, disassemble_rom, format_instruction, DisassemblyRow};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{run_steps, step_one, CycleState, Tracer};

/// Clock sources and the cycle scheduler.
pub mod timing;
pub use timing::{Clock, ManualClock, Scheduler, SystemClock};

#[cfg(test)]
use proptest as _;
