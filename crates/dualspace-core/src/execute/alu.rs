use super::{CycleState, Tracer};
use crate::{DecodedInstruction, FaultCode, Opcode, TraceEvent};

/// Result of `DIV` with a zero divisor. One past the largest byte so it is
/// distinguishable from any quotient a program can store in memory.
pub const DIVIDE_BY_ZERO_SENTINEL: u32 = 256;

/// Computes `output` and `branch` for one cycle.
///
/// Arithmetic wraps modulo 2^32. Both shifts operate on `path_a + path_b`.
/// Comparisons leave `output` at the sum and set `branch` to the
/// instruction's `jump_offset` when they hold. Unrecognized opcodes behave
/// like `ADD`.
pub fn dispatch(
    instruction: &DecodedInstruction,
    path_a: u32,
    path_b: u32,
    tracer: &mut Tracer<'_>,
) -> CycleState {
    let sum = path_a.wrapping_add(path_b);
    let mut cycle = CycleState {
        path_a,
        path_b,
        output: sum,
        ..CycleState::default()
    };

    match instruction.opcode {
        Opcode::Add | Opcode::Scan | Opcode::RamRead | Opcode::Unrecognized(_) => {}
        Opcode::Sub => cycle.output = path_a.wrapping_sub(path_b),
        Opcode::Mul => cycle.output = path_a.wrapping_mul(path_b),
        Opcode::Div => {
            cycle.output = if let Some(quotient) = path_a.checked_div(path_b) {
                quotient
            } else {
                tracer.fault(FaultCode::DivideByZero);
                DIVIDE_BY_ZERO_SENTINEL
            };
        }
        Opcode::Or => cycle.output = path_a | path_b,
        Opcode::And => cycle.output = path_a & path_b,
        Opcode::Xor => cycle.output = path_a ^ path_b,
        Opcode::ShiftRight => cycle.output = sum >> 1,
        Opcode::ShiftLeft => cycle.output = sum << 1,
        opcode @ (Opcode::Je
        | Opcode::Jle
        | Opcode::Jge
        | Opcode::Jl
        | Opcode::Jg
        | Opcode::Jne) => {
            if compare(opcode, path_a, path_b) {
                cycle.branch = instruction.jump_offset;
            }
        }
        Opcode::RamWrite => {
            cycle.memory_write = true;
            cycle.console_write = true;
        }
        Opcode::Output => cycle.console_write = true,
    }

    tracer.emit(TraceEvent::Dispatched {
        opcode: instruction.opcode,
        output: cycle.output,
        branch: cycle.branch,
    });
    cycle
}

const fn compare(opcode: Opcode, a: u32, b: u32) -> bool {
    match opcode {
        Opcode::Je => a == b,
        Opcode::Jle => a <= b,
        Opcode::Jge => a >= b,
        Opcode::Jl => a < b,
        Opcode::Jg => a > b,
        Opcode::Jne => a != b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{dispatch, DIVIDE_BY_ZERO_SENTINEL};
    use crate::execute::{CycleState, Tracer};
    use crate::trace::TraceLog;
    use crate::{
        DecodedInstruction, ExecutionMode, FaultCode, MachineConfig, Opcode, TraceCategory,
        TraceEvent,
    };

    fn run(instruction: DecodedInstruction, a: u32, b: u32) -> (CycleState, TraceLog) {
        let config = MachineConfig::default();
        let mut log = TraceLog::default();
        let mut tracer = Tracer::new(&mut log, &config, 3, ExecutionMode::Rom);
        let cycle = dispatch(&instruction, a, b, &mut tracer);
        (cycle, log)
    }

    #[rstest]
    #[case(Opcode::Add, 7, 5, 12)]
    #[case(Opcode::Add, u32::MAX, 2, 1)]
    #[case(Opcode::Sub, 7, 5, 2)]
    #[case(Opcode::Sub, 5, 7, u32::MAX - 1)]
    #[case(Opcode::Mul, 6, 7, 42)]
    #[case(Opcode::Mul, 0x1_0000, 0x1_0000, 0)]
    #[case(Opcode::Div, 17, 5, 3)]
    #[case(Opcode::Or, 0b1100, 0b1010, 0b1110)]
    #[case(Opcode::And, 0b1100, 0b1010, 0b1000)]
    #[case(Opcode::Xor, 0b1100, 0b1010, 0b0110)]
    #[case(Opcode::ShiftRight, 6, 3, 4)]
    #[case(Opcode::ShiftLeft, 6, 3, 18)]
    #[case(Opcode::ShiftLeft, 0x8000_0000, 0, 0)]
    #[case(Opcode::Scan, 1, 41, 42)]
    #[case(Opcode::RamRead, 2, 9, 11)]
    #[case(Opcode::Output, 2, 3, 5)]
    #[case(Opcode::RamWrite, 0x60, 0, 0x60)]
    #[case(Opcode::Unrecognized(25), 4, 4, 8)]
    fn opcode_outputs(#[case] opcode: Opcode, #[case] a: u32, #[case] b: u32, #[case] out: u32) {
        let (cycle, _) = run(DecodedInstruction::new(opcode), a, b);
        assert_eq!(cycle.output, out);
        assert_eq!(cycle.branch, 0);
    }

    #[rstest]
    #[case(Opcode::Je, 4, 4, true)]
    #[case(Opcode::Je, 4, 5, false)]
    #[case(Opcode::Jle, 4, 5, true)]
    #[case(Opcode::Jle, 5, 5, true)]
    #[case(Opcode::Jle, 6, 5, false)]
    #[case(Opcode::Jge, 5, 5, true)]
    #[case(Opcode::Jge, 4, 5, false)]
    #[case(Opcode::Jl, 4, 5, true)]
    #[case(Opcode::Jl, 5, 5, false)]
    #[case(Opcode::Jg, 6, 5, true)]
    #[case(Opcode::Jg, 5, 5, false)]
    #[case(Opcode::Jne, 4, 5, true)]
    #[case(Opcode::Jne, 5, 5, false)]
    fn comparisons_set_branch_to_jump_offset(
        #[case] opcode: Opcode,
        #[case] a: u32,
        #[case] b: u32,
        #[case] holds: bool,
    ) {
        let (cycle, _) = run(DecodedInstruction::new(opcode).with_jump_offset(9), a, b);
        assert_eq!(cycle.branch, if holds { 9 } else { 0 });
        assert_eq!(cycle.output, a.wrapping_add(b));
    }

    #[test]
    fn divide_by_zero_yields_sentinel_and_reports_fault() {
        let (cycle, log) = run(DecodedInstruction::new(Opcode::Div), 9, 0);

        assert_eq!(cycle.output, DIVIDE_BY_ZERO_SENTINEL);
        assert_eq!(
            log.events()[0],
            TraceEvent::FaultRaised {
                cause: FaultCode::DivideByZero,
                pc: 3,
                mode: ExecutionMode::Rom
            }
        );
        assert_eq!(log.of_category(TraceCategory::Dispatch).count(), 1);
    }

    #[test]
    fn console_and_memory_effects_follow_opcode() {
        let (output, _) = run(DecodedInstruction::new(Opcode::Output), 1, 0);
        assert!(output.console_write);
        assert!(!output.memory_write);

        let (ram_write, _) = run(DecodedInstruction::new(Opcode::RamWrite), 1, 0);
        assert!(ram_write.console_write);
        assert!(ram_write.memory_write);

        let (add, _) = run(DecodedInstruction::new(Opcode::Add), 1, 0);
        assert!(!add.console_write);
        assert!(!add.memory_write);
    }
}
