//! Test harness for LWIS programs.
//!
//! Builders for every instruction, plus helpers that run a program against a
//! scripted console and hand back the outcome and everything it printed.
//!
//! # Example
//!
//! ```rust
//! use lwis::test_harness::*;
//!
//! let (outcome, output) = run(&[li(2, 5), li(3, 3), add(4, &[2, 3]), print(4)], &[]);
//! assert!(outcome.is_halted());
//! assert_eq!(output, ["0x8"]);
//! ```

#![allow(
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use crate::console::ScriptedConsole;
use crate::isa::{Instruction, Operation};
use crate::machine::{Machine, RunOutcome};
use crate::program::Program;
use crate::state::VmConfig;

/// Memory used by [`run`]; small enough to make range faults easy to hit.
pub const TEST_MEMORY_SIZE: usize = 1024;

/// Build a machine over `instructions` with a scripted console.
pub fn machine(
    instructions: &[Instruction],
    input: &[&str],
    config: VmConfig,
) -> Machine<ScriptedConsole> {
    let program = Program::from_instructions(instructions).expect("test program too large");
    Machine::new(program, config, ScriptedConsole::new(input.iter().copied()))
}

/// Run `instructions` to completion with [`TEST_MEMORY_SIZE`] cells of memory.
pub fn run(instructions: &[Instruction], input: &[&str]) -> (RunOutcome, Vec<String>) {
    run_with_config(
        instructions,
        input,
        VmConfig::default().with_memory_size(TEST_MEMORY_SIZE),
    )
}

pub fn run_with_config(
    instructions: &[Instruction],
    input: &[&str],
    config: VmConfig,
) -> (RunOutcome, Vec<String>) {
    let mut vm = machine(instructions, input, config);
    let outcome = vm.run();
    (outcome, vm.into_console().into_output())
}

// Family 0

pub fn nop() -> Instruction {
    Instruction::new(Operation::Nop, &[])
}

pub fn ret() -> Instruction {
    Instruction::new(Operation::Return, &[])
}

// Family 1

pub fn print(reg: u8) -> Instruction {
    Instruction::new(Operation::Print, &[reg.into()])
}

pub fn read(reg: u8) -> Instruction {
    Instruction::new(Operation::Read, &[reg.into()])
}

// Family 2

/// `r[dst] = r[a] CMP r[b]` for one of the family-2 comparisons.
pub fn compare(op: Operation, dst: u8, a: u8, b: u8) -> Instruction {
    Instruction::new(op, &[dst.into(), a.into(), b.into()])
}

pub fn lt(dst: u8, a: u8, b: u8) -> Instruction {
    compare(Operation::SetLt, dst, a, b)
}

pub fn ge(dst: u8, a: u8, b: u8) -> Instruction {
    compare(Operation::SetGe, dst, a, b)
}

// Family 3

pub fn li(reg: u8, value: u32) -> Instruction {
    Instruction::new(Operation::LoadImm, &[reg.into(), value])
}

pub fn jmp(base: u8, offset: u32) -> Instruction {
    Instruction::new(Operation::Jump, &[base.into(), offset])
}

pub fn call(base: u8, offset: u32) -> Instruction {
    Instruction::new(Operation::Call, &[base.into(), offset])
}

// Family 4

pub fn st(src: u8, base: u8, offset: u32) -> Instruction {
    Instruction::new(Operation::Store, &[src.into(), base.into(), offset])
}

pub fn ld(dst: u8, base: u8, offset: u32) -> Instruction {
    Instruction::new(Operation::Load, &[dst.into(), base.into(), offset])
}

/// `r[dst] = r[src] OP imm` for one of the family-4 ALU operations.
pub fn alu_imm(op: Operation, dst: u8, src: u8, imm: u32) -> Instruction {
    Instruction::new(op, &[dst.into(), src.into(), imm])
}

pub fn addi(dst: u8, src: u8, imm: u32) -> Instruction {
    alu_imm(Operation::AddImm, dst, src, imm)
}

pub fn jgtz(cond: u8, base: u8, offset: u32) -> Instruction {
    Instruction::new(Operation::BranchGtz, &[cond.into(), base.into(), offset])
}

// Family 5

/// `r[dst] = r[srcs[0]] OP r[srcs[1]] ...` with operand 1 left unused.
pub fn chain(op: Operation, dst: u8, srcs: &[u8]) -> Instruction {
    assert!(srcs.len() <= 4, "at most four chained sources");
    let mut operands: Vec<u32> = vec![dst.into(), 0];
    operands.extend(srcs.iter().map(|&src| u32::from(src)));
    Instruction::new(op, &operands)
}

pub fn add(dst: u8, srcs: &[u8]) -> Instruction {
    chain(Operation::Add, dst, srcs)
}

pub fn mul(dst: u8, srcs: &[u8]) -> Instruction {
    chain(Operation::Mul, dst, srcs)
}

/// Quotient into `quotient`, remainder into `remainder`.
pub fn div(quotient: u8, remainder: u8, srcs: &[u8]) -> Instruction {
    assert!(srcs.len() <= 4, "at most four chained sources");
    let mut operands: Vec<u32> = vec![quotient.into(), remainder.into()];
    operands.extend(srcs.iter().map(|&src| u32::from(src)));
    Instruction::new(Operation::Div, &operands)
}

/// `r[dsts[i]] = r[srcs[i]]` for every non-null source.
pub fn shuf(srcs: [u8; 3], dsts: [u8; 3]) -> Instruction {
    let operands: Vec<u32> = srcs.iter().chain(&dsts).map(|&r| r.into()).collect();
    Instruction::new(Operation::ShuffleMove, &operands)
}

/// Sieve of Eratosthenes: prints every prime below `n`, using memory cells
/// `0..n` as the composite table. Needs at least `max(n, 2)` cells.
pub fn sieve(n: u32) -> Vec<Instruction> {
    vec![
        li(2, n),
        li(3, 2),
        lt(6, 2, 3),
        li(4, 1),
        st(4, 0, 0),
        st(4, 0, 1),
        // r7 = ceil(sqrt(n))
        mul(8, &[7, 7]), // 6
        ge(6, 8, 2),
        jgtz(6, 0, 11),
        addi(7, 7, 1),
        jmp(0, 6),
        // for r5 in 2..r7
        li(5, 2), // 11
        ge(6, 5, 7),
        jgtz(6, 0, 25),
        li(9, 0),
        mul(8, &[5, 5]),
        // mark r5 * r9 + r5 * r5 while below n
        mul(10, &[5, 9]), // 16
        add(10, &[10, 8]),
        ge(6, 10, 2),
        jgtz(6, 0, 23),
        st(4, 10, 0),
        addi(9, 9, 1),
        jmp(0, 16),
        addi(5, 5, 1), // 23
        jmp(0, 12),
        // print unmarked cells
        li(5, 0), // 25
        addi(5, 5, 1),
        ge(6, 5, 2),
        jgtz(6, 0, 33),
        ld(7, 5, 0),
        jgtz(7, 0, 26),
        print(5),
        jmp(0, 26),
    ]
}
