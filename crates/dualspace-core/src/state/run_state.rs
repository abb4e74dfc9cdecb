use crate::FaultCode;

/// Execution state machine for host-observable progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// A terminal fault stopped the machine; only a reset resumes it.
    Halted(FaultCode),
}

impl RunState {
    /// Returns the fault that halted the machine, if any.
    #[must_use]
    pub const fn halt_cause(self) -> Option<FaultCode> {
        match self {
            Self::Halted(cause) => Some(cause),
            Self::Running => None,
        }
    }

    /// Returns true once the machine has reached its terminal state.
    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted(_))
    }
}

/// Instruction space the fetch unit reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[strum(serialize_all = "UPPERCASE")]
pub enum ExecutionMode {
    /// Fixed 256-entry program table; PC is a word index.
    #[default]
    Rom,
    /// Mutable memory in 8-byte strides; PC is a byte address divided by 8.
    Ram,
}

impl ExecutionMode {
    /// Maps an instruction's `ram_mode` bit to the space it requests.
    #[must_use]
    pub const fn from_ram_bit(ram_mode: bool) -> Self {
        if ram_mode {
            Self::Ram
        } else {
            Self::Rom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecutionMode, RunState};
    use crate::FaultCode;

    #[test]
    fn run_state_default_is_running() {
        assert_eq!(RunState::default(), RunState::Running);
        assert!(!RunState::default().is_halted());
    }

    #[test]
    fn halt_cause_reports_only_halted_variant() {
        assert_eq!(RunState::Running.halt_cause(), None);
        assert_eq!(
            RunState::Halted(FaultCode::AddressOutOfRange).halt_cause(),
            Some(FaultCode::AddressOutOfRange)
        );
    }

    #[test]
    fn execution_mode_starts_in_rom_and_follows_ram_bit() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Rom);
        assert_eq!(ExecutionMode::from_ram_bit(true), ExecutionMode::Ram);
        assert_eq!(ExecutionMode::from_ram_bit(false), ExecutionMode::Rom);
        assert_eq!(ExecutionMode::Ram.to_string(), "RAM");
    }
}
