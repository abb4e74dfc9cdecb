//! Instruction execution pipeline.
//!
//! One call to [`step_one`] retires one instruction in a fixed order:
//! 1. Fetch the word at `pc` from the active instruction space
//! 2. Decode it
//! 3. Resolve `path_a` and `path_b` (a `SCAN` may block on the console)
//! 4. Dispatch the opcode into `output` and `branch`
//! 5. Commit the result to a register, or to memory on `RAM_WRITE` cycles;
//!    a `SCAN` whose input was rejected commits nothing
//! 6. Emit console output for `OUTPUT` and `RAM_WRITE`
//! 7. Choose the next fetch target and instruction space
//!
//! A fetch outside the active space latches [`RunState::Halted`] and leaves
//! every other field untouched.

mod alu;
mod control;
mod fetch;
mod operands;
mod write_back;

pub use alu::{dispatch, DIVIDE_BY_ZERO_SENTINEL};
pub use control::{next_fetch_target, FetchTarget};
pub use fetch::fetch_instruction;
pub use operands::{parse_console_integer, resolve_operands, Operands};
pub use write_back::write_back;

use crate::{
    Console, Decoder, ExecutionMode, FaultCode, MachineConfig, MachineState, MachineWarning,
    RunOutcome, RunState, StepOutcome, TraceEvent, TraceSink,
};

/// Transient ALU state for one cycle. Rebuilt from scratch every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleState {
    /// First operand.
    pub path_a: u32,
    /// Second operand.
    pub path_b: u32,
    /// Dispatcher result.
    pub output: u32,
    /// Relative branch distance, nonzero only when a comparison holds.
    pub branch: u8,
    /// `RAM_WRITE`: commit `output` to memory instead of a register.
    pub memory_write: bool,
    /// `OUTPUT` or `RAM_WRITE`: emit `output` on the console.
    pub console_write: bool,
}

/// Threshold-gated event emitter bound to the cycle's fetch location.
pub struct Tracer<'a> {
    sink: &'a mut dyn TraceSink,
    config: &'a MachineConfig,
    pc: u32,
    mode: ExecutionMode,
}

impl<'a> Tracer<'a> {
    /// Creates an emitter; faults are reported at `pc` in `mode`.
    pub fn new(
        sink: &'a mut dyn TraceSink,
        config: &'a MachineConfig,
        pc: u32,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            sink,
            config,
            pc,
            mode,
        }
    }

    /// Forwards `event` when its level passes the configured threshold.
    pub fn emit(&mut self, event: TraceEvent) {
        if self.config.traces(event.level()) {
            self.sink.on_event(event);
        }
    }

    /// Reports a recoverable condition.
    pub fn warn(&mut self, warning: MachineWarning) {
        self.emit(TraceEvent::Warning(warning));
    }

    /// Reports a fault at the cycle's fetch location.
    pub fn fault(&mut self, cause: FaultCode) {
        let (pc, mode) = (self.pc, self.mode);
        self.emit(TraceEvent::FaultRaised { cause, pc, mode });
    }
}

/// Executes exactly one instruction.
///
/// A machine that is already halted makes no progress and reports the
/// latched cause again.
pub fn step_one(
    state: &mut MachineState,
    console: &mut dyn Console,
    sink: &mut dyn TraceSink,
    config: &MachineConfig,
) -> StepOutcome {
    if let Some(cause) = state.run_state.halt_cause() {
        return StepOutcome::Halted { cause };
    }

    let (pc, mode) = (state.pc, state.mode);
    let mut tracer = Tracer::new(sink, config, pc, mode);

    let word = match fetch_instruction(state) {
        Ok(word) => word,
        Err(cause) => {
            tracer.fault(cause);
            state.run_state = RunState::Halted(cause);
            return StepOutcome::Halted { cause };
        }
    };
    tracer.emit(TraceEvent::Fetch { pc, mode, word });

    let instruction = Decoder::decode(word);
    let operands = resolve_operands(&instruction, state, console, &mut tracer);
    let cycle = dispatch(&instruction, operands.path_a, operands.path_b, &mut tracer);
    if !operands.input_rejected {
        write_back(&instruction, &cycle, state, &mut tracer);
    }

    if cycle.console_write {
        console.write_value(cycle.output);
        tracer.emit(TraceEvent::Output {
            value: cycle.output,
        });
    }

    let target = next_fetch_target(&instruction, &cycle, pc, mode);
    tracer.emit(TraceEvent::BranchDecision {
        from: mode,
        to: target.mode,
        next_pc: target.pc,
    });

    state.pc = target.pc;
    state.mode = target.mode;
    state.retired = state.retired.wrapping_add(1);

    StepOutcome::Retired {
        next_pc: target.pc,
        mode: target.mode,
    }
}

/// Executes up to `max_steps` instructions without pacing, stopping early
/// once the machine halts.
pub fn run_steps(
    state: &mut MachineState,
    console: &mut dyn Console,
    sink: &mut dyn TraceSink,
    config: &MachineConfig,
    max_steps: u64,
) -> RunOutcome {
    let mut steps = 0;
    let mut final_step = state.run_state.halt_cause().map_or(
        StepOutcome::Retired {
            next_pc: state.pc,
            mode: state.mode,
        },
        |cause| StepOutcome::Halted { cause },
    );

    while steps < max_steps {
        final_step = step_one(state, console, sink, config);
        match final_step {
            StepOutcome::Retired { .. } => steps += 1,
            StepOutcome::Halted { .. } => break,
        }
    }

    RunOutcome { steps, final_step }
}
