#![no_main]

use dualspace_core::{
    run_steps, Decoder, ExecutionMode, InstructionWord, MachineConfig, MachineState,
    NullTraceSink, ProgramImage, ScriptedConsole, MEMORY_BYTES,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }

    let mut first = [0u8; 8];
    first.copy_from_slice(&data[1..9]);
    let _ = Decoder::decode(InstructionWord::from_le_bytes(first));

    // Fuzz bytes become RAM; the ROM image is empty so execution starts in RAM.
    let ram = &data[1..data.len().min(MEMORY_BYTES + 1)];
    let Ok(mut state) = MachineState::with_ram_image(ProgramImage::default(), ram) else {
        return;
    };
    state.mode = ExecutionMode::Ram;

    let mut console = ScriptedConsole::new(["7", "-1", "x"]);
    let config = MachineConfig {
        tracing_enabled: data[0] & 1 == 1,
        ..MachineConfig::default()
    };
    let _ = run_steps(
        &mut state,
        &mut console,
        &mut NullTraceSink,
        &config,
        u64::from(data[0]),
    );
});
