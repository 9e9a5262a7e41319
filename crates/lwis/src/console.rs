//! Input and output for the print and read operations.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::Fault;

/// Where `print` writes and `read` reads. The engine blocks on `read_value`
/// until the console produces a value.
pub trait Console {
    fn print_hex(&mut self, value: u32) -> Result<(), Fault>;

    fn read_value(&mut self) -> Result<u32, Fault>;
}

/// Render a value the way `print` does: lowercase hex with a `0x` prefix.
#[must_use]
pub fn format_hex(value: u32) -> String {
    format!("{value:#x}")
}

/// Parse one line of input as a decimal integer and keep its low 32 bits,
/// so negative numbers land as their two's complement.
pub fn parse_input(line: &str) -> Result<u32, Fault> {
    let text = line.trim();
    text.parse::<i128>()
        .map(|value| value as u32)
        .map_err(|_| Fault::MalformedInput(text.to_string()))
}

/// A console over any buffered reader and writer, one value per line.
pub struct IoConsole<R, W> {
    input: R,
    output: W,
    line: String,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            line: String::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl IoConsole<io::StdinLock<'static>, io::Stdout> {
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn print_hex(&mut self, value: u32) -> Result<(), Fault> {
        writeln!(self.output, "{}", format_hex(value))
            .and_then(|()| self.output.flush())
            .map_err(|e| Fault::Console(e.to_string()))
    }

    fn read_value(&mut self) -> Result<u32, Fault> {
        self.line.clear();
        let read = self
            .input
            .read_line(&mut self.line)
            .map_err(|e| Fault::Console(e.to_string()))?;
        if read == 0 {
            return Err(Fault::InputExhausted);
        }
        parse_input(&self.line)
    }
}

/// An in-memory console: input comes from a queue of lines and printed
/// values are collected as strings.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(input: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    #[must_use]
    pub fn into_output(self) -> Vec<String> {
        self.output
    }
}

impl Console for ScriptedConsole {
    fn print_hex(&mut self, value: u32) -> Result<(), Fault> {
        self.output.push(format_hex(value));
        Ok(())
    }

    fn read_value(&mut self) -> Result<u32, Fault> {
        let line = self.input.pop_front().ok_or(Fault::InputExhausted)?;
        parse_input(&line)
    }
}
