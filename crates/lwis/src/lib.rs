#![allow(
    clippy::cast_possible_truncation, // intentional: operand fields are masked before narrowing
    clippy::cast_possible_wrap, // intentional: the branch condition is read as a signed i32
    clippy::cast_sign_loss, // input is parsed signed and kept as its low 32 bits
    clippy::missing_errors_doc // every fallible operation returns a `Fault` or `Error`
)]

pub mod console;
pub mod error;
pub mod execute;
pub mod isa;
pub mod machine;
pub mod program;
pub mod state;

/// Test harness module for writing unit and integration tests.
///
/// This module is only available when running tests or when the
/// `test-harness` feature is enabled.
#[cfg(any(test, feature = "test-harness"))]
pub mod test_harness;

pub use console::{Console, IoConsole, ScriptedConsole};
pub use error::{Error, Fault, Result};
pub use isa::{Family, Instruction, Operation, Word};
pub use machine::{FaultReport, Machine, RunOutcome, RunStats, Status, Step};
pub use program::Program;
pub use state::{State, VmConfig};
