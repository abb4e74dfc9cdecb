use thiserror::Error;

/// Fault taxonomy raised while executing a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultCode {
    /// `DIV` with a zero divisor; the cycle continues with the sentinel result.
    #[error("division by zero")]
    DivideByZero,
    /// Fetch targeted an address outside the active instruction space.
    /// Terminal: the machine halts until reset.
    #[error("instruction fetch address out of range")]
    AddressOutOfRange,
}

/// Non-fatal conditions handled inside the cycle that detected them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum MachineWarning {
    /// A selector field named a register past the end of the register file.
    #[error("register selector {selector} out of range")]
    RegisterSelectorOutOfRange {
        /// Raw 1-based selector value.
        selector: u8,
    },
    /// `SCAN` read an integer that does not fit a register.
    #[error("console input {token:?} exceeds the representable range")]
    InputOutOfRange {
        /// Token as typed.
        token: String,
    },
    /// `SCAN` read a token that is not a decimal integer.
    #[error("console input {token:?} is not an integer")]
    InputNotANumber {
        /// Token as typed.
        token: String,
    },
    /// `SCAN` found the console input stream closed.
    #[error("console input closed")]
    InputClosed,
}

/// Rejected program or memory image supplied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ImageError {
    /// More instruction words than the program table holds.
    #[error("program image has {len} words, capacity is {capacity}")]
    ProgramTooLarge {
        /// Supplied word count.
        len: usize,
        /// Table capacity.
        capacity: usize,
    },
    /// More bytes than memory holds.
    #[error("memory image has {len} bytes, capacity is {capacity}")]
    MemoryTooLarge {
        /// Supplied byte count.
        len: usize,
        /// Memory capacity.
        capacity: usize,
    },
}
