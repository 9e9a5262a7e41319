//! The fetch-decode-execute loop.

use std::fmt;
use std::time::{Duration, Instant};

use crate::console::Console;
use crate::error::Fault;
use crate::execute::{Flow, execute};
use crate::isa::{Fields, Operands};
use crate::program::Program;
use crate::state::{State, VmConfig};

/// Result of a single successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The program counter points at another instruction.
    Running,
    /// The program counter reached the end of the program.
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
    Faulted(FaultReport),
}

/// Everything known about the instruction that faulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultReport {
    pub fault: Fault,
    pub pc: u32,
    pub family: u8,
    pub opcode: u8,
    pub operands: Operands,
    /// Instructions that completed before the fault.
    pub instructions_executed: u64,
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (pc: {}, family: {}, opcode: {}, operands: {:?})",
            self.fault, self.pc, self.family, self.opcode, self.operands
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub instructions_executed: u64,
    pub elapsed: Duration,
}

impl RunStats {
    /// Mean wall time per executed instruction, or `None` if nothing ran.
    #[must_use]
    pub fn average_per_instruction(&self) -> Option<Duration> {
        let count = u32::try_from(self.instructions_executed).ok()?;
        self.elapsed.checked_div(count)
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Time: {:.6} seconds", self.elapsed.as_secs_f64())?;
        writeln!(f, "Instructions Executed: {}", self.instructions_executed)?;
        if self.instructions_executed == 0 {
            write!(f, "Average Time per Instruction: n/a")
        } else {
            #[allow(clippy::cast_precision_loss)]
            let average = self.elapsed.as_secs_f64() * 1e6 / self.instructions_executed as f64;
            write!(f, "Average Time per Instruction: {average:.2} microseconds")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Halted(RunStats),
    Faulted(FaultReport),
}

impl RunOutcome {
    #[must_use]
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Faulted(report) => Some(&report.fault),
            Self::Halted(_) => None,
        }
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted(_))
    }
}

/// A virtual machine bound to one program and one console. The machine owns
/// its state for the lifetime of a single run.
pub struct Machine<C> {
    program: Program,
    config: VmConfig,
    state: State,
    console: C,
    status: Status,
    instructions_executed: u64,
}

impl<C: Console> Machine<C> {
    pub fn new(program: Program, config: VmConfig, console: C) -> Self {
        let state = State::new(&config);
        let status = if program.is_empty() {
            Status::Halted
        } else {
            Status::Running
        };
        Self {
            program,
            config,
            state,
            console,
            status,
            instructions_executed: 0,
        }
    }

    /// Execute one instruction.
    ///
    /// Once the machine has halted every further call reports `Halted`; once
    /// it has faulted every further call returns the same report.
    pub fn step(&mut self) -> Result<Step, FaultReport> {
        match &self.status {
            Status::Running => {}
            Status::Halted => return Ok(Step::Halted),
            Status::Faulted(report) => return Err(report.clone()),
        }

        let pc = self.state.pc();
        let Some(word) = self.program.fetch(pc) else {
            let fault = Fault::ProgramCounterOutOfRange {
                pc,
                len: self.program.len(),
            };
            return Err(self.fail(fault, pc, Fields::default()));
        };

        let fields = Fields::split(word);
        let result = fields.resolve().and_then(|instr| {
            tracing::trace!(
                pc,
                family = fields.family,
                opcode = fields.opcode,
                operands = ?fields.operands,
                "{instr}"
            );
            execute(&instr, &mut self.state, &mut self.console)
        });

        let next = match result {
            Ok(Flow::Continue) => pc + 1,
            Ok(Flow::Transfer(target)) => target,
            Err(fault) => return Err(self.fail(fault, pc, fields)),
        };
        self.state.set_pc(next);
        self.instructions_executed += 1;

        if next as usize == self.program.len() {
            self.status = Status::Halted;
            return Ok(Step::Halted);
        }
        Ok(Step::Running)
    }

    /// Step until the program halts or faults.
    pub fn run(&mut self) -> RunOutcome {
        tracing::debug!(
            words = self.program.len(),
            memory_size = self.config.memory_size,
            "starting run"
        );
        let start = Instant::now();

        let outcome = loop {
            match self.step() {
                Ok(Step::Running) => {}
                Ok(Step::Halted) => {
                    break RunOutcome::Halted(RunStats {
                        instructions_executed: self.instructions_executed,
                        elapsed: start.elapsed(),
                    });
                }
                Err(report) => break RunOutcome::Faulted(report),
            }
        };

        match &outcome {
            RunOutcome::Halted(stats) => tracing::debug!(
                instructions = stats.instructions_executed,
                elapsed = ?stats.elapsed,
                "halted"
            ),
            RunOutcome::Faulted(report) => tracing::warn!(%report, "run faulted"),
        }
        outcome
    }

    fn fail(&mut self, fault: Fault, pc: u32, fields: Fields) -> FaultReport {
        let report = FaultReport {
            fault,
            pc,
            family: fields.family,
            opcode: fields.opcode,
            operands: fields.operands,
            instructions_executed: self.instructions_executed,
        };
        self.status = Status::Faulted(report.clone());
        report
    }

    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    #[must_use]
    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }
}
