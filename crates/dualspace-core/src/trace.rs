//! Trace sinks: a `log` bridge, an in-memory recorder and a discard sink.

use crate::disasm::format_instruction;
use crate::{Decoder, TraceCategory, TraceEvent, TraceLevel, TraceSink};

/// Log target used for console channel events.
pub const CONSOLE_LOG_TARGET: &str = "dualspace::console";
/// Log target used for pipeline events.
pub const PIPELINE_LOG_TARGET: &str = "dualspace::pipeline";

/// Forwards every event to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTraceSink;

impl LogTraceSink {
    const fn log_level(level: TraceLevel) -> log::Level {
        match level {
            TraceLevel::Info | TraceLevel::Output | TraceLevel::Input => log::Level::Info,
            TraceLevel::Warn => log::Level::Warn,
            TraceLevel::Error => log::Level::Error,
        }
    }
}

impl TraceSink for LogTraceSink {
    fn on_event(&mut self, event: TraceEvent) {
        let level = event.level();
        let category = event.category();
        let target = match category {
            TraceCategory::Output | TraceCategory::Input => CONSOLE_LOG_TARGET,
            _ => PIPELINE_LOG_TARGET,
        };
        log::log!(target: target, Self::log_level(level), "[{level}]|{category}| {}", describe(&event));
    }
}

fn describe(event: &TraceEvent) -> String {
    match event {
        TraceEvent::Started { pc, mode } => format!("starting at {mode} {pc}"),
        TraceEvent::Fetch { pc, mode, word } => {
            format!(
                "fetch {mode} {pc} word {:#013x} {}",
                word.raw(),
                format_instruction(&Decoder::decode(*word))
            )
        }
        TraceEvent::OperandsResolved { path_a, path_b } => {
            format!("path_a {path_a} path_b {path_b}")
        }
        TraceEvent::Dispatched {
            opcode,
            output,
            branch,
        } => format!("{} output {output} branch {branch}", opcode.mnemonic()),
        TraceEvent::RegisterWrite { register, value } => {
            format!("r{} <- {value}", register.selector())
        }
        TraceEvent::MemoryWrite { addr, value } => format!("mem[{addr}] <- {value}"),
        TraceEvent::BranchDecision { from, to, next_pc } => {
            format!("{from} -> {to} {next_pc}")
        }
        TraceEvent::Warning(warning) => warning.to_string(),
        TraceEvent::FaultRaised { cause, pc, mode } => format!("{cause} at {mode} {pc}"),
        TraceEvent::InputRequested => "awaiting input".to_string(),
        TraceEvent::Output { value } => value.to_string(),
    }
}

/// Records every event in memory, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLog {
    events: Vec<TraceEvent>,
}

impl TraceLog {
    /// Recorded events.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Recorded events of one category.
    pub fn of_category(&self, category: TraceCategory) -> impl Iterator<Item = &TraceEvent> {
        self.events
            .iter()
            .filter(move |event| event.category() == category)
    }

    /// Drops every recorded event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for TraceLog {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}
