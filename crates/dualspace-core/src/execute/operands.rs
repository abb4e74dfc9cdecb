use super::Tracer;
use crate::{
    Console, DecodedInstruction, MachineState, MachineWarning, Opcode, RegisterFile,
    RegisterSelector, TraceEvent,
};

/// Operands for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operands {
    /// First operand.
    pub path_a: u32,
    /// Second operand.
    pub path_b: u32,
    /// A `SCAN` got no usable value; the cycle must not commit its result.
    pub input_rejected: bool,
}

/// Produces `path_a` and `path_b` for one cycle.
///
/// `path_a` always comes from the `read_a` register selector. `path_b` comes
/// from the console for `SCAN`, from memory for `RAM_READ`, from the raw
/// field when the immediate flag is set, or from the `read_b` register.
/// Rejected console input leaves `path_b` at 0 and sets
/// [`Operands::input_rejected`].
pub fn resolve_operands(
    instruction: &DecodedInstruction,
    state: &MachineState,
    console: &mut dyn Console,
    tracer: &mut Tracer<'_>,
) -> Operands {
    let path_a = read_register(&state.registers, instruction.read_a_select, tracer);
    let field = instruction.read_b_or_immediate;
    let mut input_rejected = false;

    let path_b = match instruction.opcode {
        Opcode::Scan => scan(console, tracer).unwrap_or_else(|| {
            input_rejected = true;
            0
        }),
        Opcode::RamRead if field == 0 => 0,
        Opcode::RamRead => u32::from(state.memory.read(field - 1)),
        _ if instruction.immediate_enable => u32::from(field),
        _ => read_register(&state.registers, field, tracer),
    };

    tracer.emit(TraceEvent::OperandsResolved { path_a, path_b });
    Operands {
        path_a,
        path_b,
        input_rejected,
    }
}

fn read_register(registers: &RegisterFile, selector: u8, tracer: &mut Tracer<'_>) -> u32 {
    match RegisterSelector::from_field(selector) {
        RegisterSelector::Disabled => 0,
        RegisterSelector::Register(index) => registers.get(index),
        RegisterSelector::OutOfRange(selector) => {
            tracer.warn(MachineWarning::RegisterSelectorOutOfRange { selector });
            0
        }
    }
}

fn scan(console: &mut dyn Console, tracer: &mut Tracer<'_>) -> Option<u32> {
    tracer.emit(TraceEvent::InputRequested);
    let Some(line) = console.read_line() else {
        tracer.warn(MachineWarning::InputClosed);
        return None;
    };
    parse_console_integer(&line)
        .map_err(|warning| tracer.warn(warning))
        .ok()
}

/// Parses the first whitespace-delimited token of a console line.
///
/// # Errors
///
/// Returns [`MachineWarning::InputOutOfRange`] for integers that do not fit
/// in `u32` (including negatives) and [`MachineWarning::InputNotANumber`] for
/// anything else, including an empty line.
pub fn parse_console_integer(line: &str) -> Result<u32, MachineWarning> {
    let token = line.split_whitespace().next().unwrap_or_default();
    let out_of_range = || MachineWarning::InputOutOfRange {
        token: token.to_owned(),
    };

    match token.parse::<i64>() {
        Ok(value) => u32::try_from(value).map_err(|_| out_of_range()),
        Err(err) => match err.kind() {
            std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
                Err(out_of_range())
            }
            _ => Err(MachineWarning::InputNotANumber {
                token: token.to_owned(),
            }),
        },
    }
}
