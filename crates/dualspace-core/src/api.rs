//! Public host-facing API contracts for embedding the simulator core.

use std::time::Duration;

use crate::{
    ExecutionMode, FaultCode, ImageError, InstructionWord, MachineWarning, Memory, Opcode,
    ProgramImage, RegisterFile, RegisterIndex, RunState,
};

/// Default wall-clock interval between retired instructions.
pub const DEFAULT_CYCLE_DURATION: Duration = Duration::from_millis(500);

/// Top-level immutable configuration for a machine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Minimum interval between two retired instructions.
    pub cycle_duration: Duration,
    /// Enables trace dispatch to the sink.
    pub tracing_enabled: bool,
    /// Events below this level are not dispatched.
    pub trace_threshold: TraceLevel,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            cycle_duration: DEFAULT_CYCLE_DURATION,
            tracing_enabled: true,
            trace_threshold: TraceLevel::Info,
        }
    }
}

impl MachineConfig {
    /// Returns true when an event at `level` reaches the sink.
    #[must_use]
    pub fn traces(&self, level: TraceLevel) -> bool {
        self.tracing_enabled && level >= self.trace_threshold
    }
}

/// Complete machine state, owned by one execution context and passed by
/// exclusive reference through every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    /// General-purpose registers.
    pub registers: RegisterFile,
    /// Data memory and RAM instruction space.
    pub memory: Memory,
    /// ROM instruction space.
    pub program: ProgramImage,
    /// Instruction index of the next fetch in the active space.
    pub pc: u32,
    /// Active instruction space.
    pub mode: ExecutionMode,
    /// Running or halted.
    pub run_state: RunState,
    /// Number of retired instructions since construction or reset.
    pub retired: u64,
}

impl MachineState {
    /// Creates a machine at ROM entry with zeroed registers and memory.
    #[must_use]
    pub fn new(program: ProgramImage) -> Self {
        Self {
            program,
            ..Self::default()
        }
    }

    /// Creates a machine whose memory is preloaded with `ram`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::MemoryTooLarge`] when `ram` exceeds memory.
    pub fn with_ram_image(program: ProgramImage, ram: &[u8]) -> Result<Self, ImageError> {
        Ok(Self {
            memory: Memory::from_image(ram)?,
            ..Self::new(program)
        })
    }

    /// Restores registers, memory, PC, mode and run state to their power-on
    /// values. The program image is kept.
    pub fn reset(&mut self) {
        self.registers = RegisterFile::default();
        self.memory.clear();
        self.pc = 0;
        self.mode = ExecutionMode::Rom;
        self.run_state = RunState::Running;
        self.retired = 0;
    }

    /// Reads a register by 1-based selector.
    #[must_use]
    pub const fn register(&self, selector: u8) -> Option<u32> {
        self.registers.get_by_selector(selector)
    }
}

/// Console seam used by `SCAN` and `OUTPUT`.
///
/// `read_line` is the cycle's only suspension point: it may block until the
/// host has a line of input.
pub trait Console {
    /// Blocks until one line of input is available; `None` once input is closed.
    fn read_line(&mut self) -> Option<String>;

    /// Emits one numeric value, in cycle order.
    fn write_value(&mut self, value: u32);
}

/// Output status from one instruction retirement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired; the next fetch targets `next_pc` in `mode`.
    Retired {
        /// Instruction index of the next fetch.
        next_pc: u32,
        /// Instruction space of the next fetch.
        mode: ExecutionMode,
    },
    /// The machine is halted and made no progress.
    Halted {
        /// Terminal fault that stopped the machine.
        cause: FaultCode,
    },
}

/// Aggregated outcome from running multiple steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of retired steps during this run call.
    pub steps: u64,
    /// Last step-level status observed before returning.
    pub final_step: StepOutcome,
}

/// Severity scale of the diagnostic feed, lowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[strum(serialize_all = "UPPERCASE")]
pub enum TraceLevel {
    /// Pipeline activity.
    #[default]
    Info,
    /// Recoverable conditions.
    Warn,
    /// Errors and faults.
    Error,
    /// Console output.
    #[strum(serialize = "OUT")]
    Output,
    /// Console input requests.
    #[strum(serialize = "IN")]
    Input,
}

/// Which pipeline stage or channel produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TraceCategory {
    /// Machine start.
    Lifecycle,
    /// Fetch unit.
    Fetch,
    /// Operand resolver.
    OperandResolve,
    /// Opcode dispatcher.
    Dispatch,
    /// Write-back unit.
    WriteBack,
    /// Control-flow unit.
    BranchDecision,
    /// Recoverable conditions.
    Warning,
    /// Errors and faults.
    Error,
    /// Console output.
    Output,
    /// Console input.
    Input,
}

/// Trace events emitted in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// The scheduler began driving the machine.
    Started {
        /// Entry instruction index.
        pc: u32,
        /// Entry instruction space.
        mode: ExecutionMode,
    },
    /// An instruction word was fetched.
    Fetch {
        /// Instruction index in `mode`.
        pc: u32,
        /// Space the word came from.
        mode: ExecutionMode,
        /// Raw fetched word.
        word: InstructionWord,
    },
    /// Both ALU operands were resolved.
    OperandsResolved {
        /// First operand.
        path_a: u32,
        /// Second operand.
        path_b: u32,
    },
    /// The dispatcher produced this cycle's result.
    Dispatched {
        /// Executed operation.
        opcode: Opcode,
        /// ALU result.
        output: u32,
        /// Relative branch distance requested by a comparison, or 0.
        branch: u8,
    },
    /// The write-back unit committed a register.
    RegisterWrite {
        /// Destination register.
        register: RegisterIndex,
        /// Committed value.
        value: u32,
    },
    /// A `RAM_WRITE` cycle committed a memory cell.
    MemoryWrite {
        /// Destination byte address.
        addr: u8,
        /// Committed byte.
        value: u8,
    },
    /// The control-flow unit chose the next fetch target.
    BranchDecision {
        /// Space of the instruction just executed.
        from: ExecutionMode,
        /// Space of the next fetch.
        to: ExecutionMode,
        /// Instruction index of the next fetch.
        next_pc: u32,
    },
    /// A recoverable condition was handled inside the cycle.
    Warning(MachineWarning),
    /// A fault was raised.
    FaultRaised {
        /// Raised fault.
        cause: FaultCode,
        /// Instruction index active when the fault was observed.
        pc: u32,
        /// Instruction space active when the fault was observed.
        mode: ExecutionMode,
    },
    /// `SCAN` is about to block on console input.
    InputRequested,
    /// A value was emitted on the console.
    Output {
        /// Emitted value.
        value: u32,
    },
}

impl TraceEvent {
    /// Returns the producing stage or channel.
    #[must_use]
    pub const fn category(&self) -> TraceCategory {
        match self {
            Self::Started { .. } => TraceCategory::Lifecycle,
            Self::Fetch { .. } => TraceCategory::Fetch,
            Self::OperandsResolved { .. } => TraceCategory::OperandResolve,
            Self::Dispatched { .. } => TraceCategory::Dispatch,
            Self::RegisterWrite { .. } | Self::MemoryWrite { .. } => TraceCategory::WriteBack,
            Self::BranchDecision { .. } => TraceCategory::BranchDecision,
            Self::Warning(_) => TraceCategory::Warning,
            Self::FaultRaised { .. } => TraceCategory::Error,
            Self::InputRequested => TraceCategory::Input,
            Self::Output { .. } => TraceCategory::Output,
        }
    }

    /// Returns the severity used for threshold gating.
    #[must_use]
    pub const fn level(&self) -> TraceLevel {
        match self.category() {
            TraceCategory::Lifecycle
            | TraceCategory::Fetch
            | TraceCategory::OperandResolve
            | TraceCategory::Dispatch
            | TraceCategory::WriteBack
            | TraceCategory::BranchDecision => TraceLevel::Info,
            TraceCategory::Warning => TraceLevel::Warn,
            TraceCategory::Error => TraceLevel::Error,
            TraceCategory::Output => TraceLevel::Output,
            TraceCategory::Input => TraceLevel::Input,
        }
    }
}

/// Sink trait for the diagnostic feed.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        MachineConfig, MachineState, TraceCategory, TraceEvent, TraceLevel,
        DEFAULT_CYCLE_DURATION,
    };
    use crate::{
        ExecutionMode, FaultCode, ImageError, MachineWarning, ProgramImage, RegisterIndex,
        RunState, MEMORY_BYTES,
    };

    #[test]
    fn default_config_traces_everything_every_half_second() {
        let config = MachineConfig::default();
        assert_eq!(config.cycle_duration, DEFAULT_CYCLE_DURATION);
        assert_eq!(config.cycle_duration, Duration::from_millis(500));
        assert!(config.tracing_enabled);
        assert_eq!(config.trace_threshold, TraceLevel::Info);
    }

    #[test]
    fn threshold_gates_lower_levels() {
        let config = MachineConfig {
            trace_threshold: TraceLevel::Error,
            ..MachineConfig::default()
        };
        assert!(!config.traces(TraceLevel::Info));
        assert!(!config.traces(TraceLevel::Warn));
        assert!(config.traces(TraceLevel::Error));
        assert!(config.traces(TraceLevel::Output));
        assert!(config.traces(TraceLevel::Input));

        let disabled = MachineConfig {
            tracing_enabled: false,
            ..MachineConfig::default()
        };
        assert!(!disabled.traces(TraceLevel::Input));
    }

    #[test]
    fn level_scale_orders_info_first_and_input_last() {
        assert!(TraceLevel::Info < TraceLevel::Warn);
        assert!(TraceLevel::Warn < TraceLevel::Error);
        assert!(TraceLevel::Error < TraceLevel::Output);
        assert!(TraceLevel::Output < TraceLevel::Input);
        assert_eq!(TraceLevel::Output.to_string(), "OUT");
    }

    #[test]
    fn event_categories_map_to_levels() {
        let warning = TraceEvent::Warning(MachineWarning::InputClosed);
        assert_eq!(warning.category(), TraceCategory::Warning);
        assert_eq!(warning.level(), TraceLevel::Warn);

        let fault = TraceEvent::FaultRaised {
            cause: FaultCode::DivideByZero,
            pc: 3,
            mode: ExecutionMode::Rom,
        };
        assert_eq!(fault.level(), TraceLevel::Error);

        let write = TraceEvent::RegisterWrite {
            register: RegisterIndex::new(0).expect("index in range"),
            value: 1,
        };
        assert_eq!(write.category(), TraceCategory::WriteBack);
        assert_eq!(write.level(), TraceLevel::Info);
        assert_eq!(TraceCategory::BranchDecision.to_string(), "branch-decision");
        assert_eq!(TraceEvent::InputRequested.level(), TraceLevel::Input);
        assert_eq!(TraceEvent::Output { value: 1 }.level(), TraceLevel::Output);
    }

    #[test]
    fn new_machine_starts_at_rom_entry_with_zeroed_state() {
        let state = MachineState::new(ProgramImage::default());
        assert_eq!(state.pc, 0);
        assert_eq!(state.mode, ExecutionMode::Rom);
        assert_eq!(state.run_state, RunState::Running);
        assert!(state.registers.values().iter().all(|value| *value == 0));
        assert!(state.memory.as_bytes().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn reset_restores_power_on_values_and_keeps_program() {
        let program = ProgramImage::from_words(&[0x55]).expect("fits");
        let mut state = MachineState::with_ram_image(program.clone(), &[1, 2, 3]).expect("fits");
        state
            .registers
            .set(RegisterIndex::new(4).expect("index in range"), 77);
        state.pc = 9;
        state.mode = ExecutionMode::Ram;
        state.run_state = RunState::Halted(FaultCode::AddressOutOfRange);
        state.retired = 12;

        state.reset();

        assert_eq!(state, MachineState::new(program));
    }

    #[test]
    fn oversized_ram_image_is_rejected() {
        let image = vec![0u8; MEMORY_BYTES + 1];
        assert!(matches!(
            MachineState::with_ram_image(ProgramImage::default(), &image),
            Err(ImageError::MemoryTooLarge { .. })
        ));
    }
}
