use super::{CycleState, Tracer};
use crate::{DecodedInstruction, MachineState, MachineWarning, RegisterSelector, TraceEvent};

/// Commits `output` to its destination.
///
/// On `RAM_WRITE` cycles the low byte of `output` goes to memory cell
/// `write_select - 1` and no register is written. Otherwise `output` goes to
/// register `write_select`. A zero selector disables the commit.
pub fn write_back(
    instruction: &DecodedInstruction,
    cycle: &CycleState,
    state: &mut MachineState,
    tracer: &mut Tracer<'_>,
) {
    let selector = instruction.write_select;

    if cycle.memory_write {
        if selector != 0 {
            let addr = selector - 1;
            let [value, ..] = cycle.output.to_le_bytes();
            state.memory.write(addr, value);
            tracer.emit(TraceEvent::MemoryWrite { addr, value });
        }
        return;
    }

    match RegisterSelector::from_field(selector) {
        RegisterSelector::Disabled => {}
        RegisterSelector::Register(register) => {
            state.registers.set(register, cycle.output);
            tracer.emit(TraceEvent::RegisterWrite {
                register,
                value: cycle.output,
            });
        }
        RegisterSelector::OutOfRange(selector) => {
            tracer.warn(MachineWarning::RegisterSelectorOutOfRange { selector });
        }
    }
}
