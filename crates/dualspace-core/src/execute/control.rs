use super::CycleState;
use crate::{DecodedInstruction, ExecutionMode};

/// Relative ROM branches wrap modulo the program table length.
const ROM_BRANCH_MODULUS: u32 = 256;

/// Location of the next fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTarget {
    /// Instruction index in `mode`.
    pub pc: u32,
    /// Instruction space.
    pub mode: ExecutionMode,
}

/// Chooses where the next instruction comes from.
///
/// Control flow is redirected when a comparison produced a nonzero `branch`
/// or when the instruction's RAM bit differs from the active space. A
/// redirect lands on `output` when the RAM bit or `goto` is set, or on
/// `(pc + branch) mod 256` otherwise. A space switch always lands on
/// `output` in the requested space. Without a redirect the PC advances by
/// one in the current space.
#[must_use]
pub fn next_fetch_target(
    instruction: &DecodedInstruction,
    cycle: &CycleState,
    pc: u32,
    mode: ExecutionMode,
) -> FetchTarget {
    let requested = ExecutionMode::from_ram_bit(instruction.ram_mode);
    let switching = requested != mode;

    if cycle.branch == 0 && !switching {
        return FetchTarget {
            pc: pc.wrapping_add(1),
            mode,
        };
    }

    let pc = if switching || instruction.ram_mode || instruction.goto {
        cycle.output
    } else {
        pc.wrapping_add(u32::from(cycle.branch)) % ROM_BRANCH_MODULUS
    };

    FetchTarget {
        pc,
        mode: requested,
    }
}
