//! Architectural machine state primitives.

/// Register file types and storage model.
pub mod registers;
/// Run state and instruction-space selection.
pub mod run_state;

pub use registers::{RegisterFile, RegisterIndex, RegisterSelector, REGISTER_COUNT};
pub use run_state::{ExecutionMode, RunState};
