//! Console front ends for the `SCAN`/`OUTPUT` seam.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::Console;

/// Deterministic console fed from a fixed input queue; output is captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<u32>,
}

impl ScriptedConsole {
    /// Creates a console that answers reads from `lines` in order.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Values written so far, in emission order.
    #[must_use]
    pub fn output(&self) -> &[u32] {
        &self.output
    }

    /// Number of input lines not yet consumed.
    #[must_use]
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }

    fn write_value(&mut self, value: u32) {
        self.output.push(value);
    }
}

/// Console bound to a line reader and a writer, such as stdin/stdout.
pub struct StdConsole<R, W> {
    reader: R,
    writer: W,
}

impl StdConsole<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Creates a console on the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    /// Creates a console over arbitrary streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Returns the writer, e.g. to inspect captured output.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(err) => {
                log::error!("console read failed: {err}");
                None
            }
        }
    }

    fn write_value(&mut self, value: u32) {
        if let Err(err) = writeln!(self.writer, "{value}").and_then(|()| self.writer.flush()) {
            log::error!("console write failed: {err}");
        }
    }
}
