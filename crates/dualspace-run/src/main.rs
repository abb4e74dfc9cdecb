//! Console host: runs the built-in demo program on stdin/stdout.

mod demo;

use anyhow::Result;
use dualspace_core::{
    disassemble_rom, LogTraceSink, MachineConfig, MachineState, Scheduler, StdConsole,
    SystemClock,
};

fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let program = demo::program()?;
    for row in disassemble_rom(&program, 0, demo::PROGRAM_LEN) {
        log::debug!("{row}");
    }

    let config = MachineConfig::default();
    let mut state = MachineState::new(program);
    let mut console = StdConsole::stdio();
    let mut clock = SystemClock::default();
    let mut scheduler = Scheduler::new(&config, &clock);

    log::info!(
        "running at one instruction per {:?}",
        config.cycle_duration
    );
    let outcome = scheduler.run(
        &mut state,
        &mut console,
        &mut LogTraceSink,
        &config,
        &mut clock,
    );
    log::info!(
        "halted after {} instructions: {:?}",
        outcome.steps,
        outcome.final_step
    );
    Ok(())
}
