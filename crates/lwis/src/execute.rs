//! Semantics of every operation in the matrix.
//!
//! Operations never write the program counter directly: they return a
//! [`Flow`] and the engine applies it. Every operation that writes a register
//! validates all of its destinations and computes all of its results before
//! the first write, so a fault leaves the state untouched.

use crate::console::Console;
use crate::error::Fault;
use crate::isa::{Instruction, Operation};
use crate::state::{NULL_REGISTER, State};

/// What the engine does with the program counter after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance to the next instruction.
    Continue,
    /// Continue at the given address.
    Transfer(u32),
}

pub fn execute<C>(instr: &Instruction, state: &mut State, console: &mut C) -> Result<Flow, Fault>
where
    C: Console + ?Sized,
{
    use Operation as Op;

    match instr.operation {
        Op::Nop => {}
        Op::Return => return Ok(Flow::Transfer(state.pop_return()?)),

        Op::Print => console.print_hex(state.reg(instr.reg(0)))?,
        Op::Read => {
            let dst = instr.reg(0);
            State::check_writable(dst)?;
            let value = console.read_value()?;
            state.set_reg(dst, value)?;
        }

        Op::SetLt => compare_regs(state, instr, |a, b| a < b)?,
        Op::SetGt => compare_regs(state, instr, |a, b| a > b)?,
        Op::SetEq => compare_regs(state, instr, |a, b| a == b)?,
        Op::SetGe => compare_regs(state, instr, |a, b| a >= b)?,
        Op::SetLe => compare_regs(state, instr, |a, b| a <= b)?,

        Op::LoadImm => state.set_reg(instr.reg(0), instr.imm(1))?,
        Op::Jump => return Ok(Flow::Transfer(target(state, instr.reg(0), instr.imm(1)))),
        Op::Call => {
            let target = target(state, instr.reg(0), instr.imm(1));
            state.push_return(state.pc().wrapping_add(1));
            return Ok(Flow::Transfer(target));
        }

        Op::Store => {
            let address = state.address(instr.reg(1), instr.imm(2))?;
            state.store(address, state.reg(instr.reg(0)));
        }
        Op::Load => {
            let dst = instr.reg(0);
            State::check_writable(dst)?;
            let address = state.address(instr.reg(1), instr.imm(2))?;
            state.set_reg(dst, state.load(address))?;
        }
        Op::AddImm => with_imm(state, instr, |a, imm| Some(a.wrapping_add(imm)))?,
        Op::SubImm => with_imm(state, instr, |a, imm| Some(a.wrapping_sub(imm)))?,
        Op::MulImm => with_imm(state, instr, |a, imm| Some(a.wrapping_mul(imm)))?,
        Op::DivImm => with_imm(state, instr, u32::checked_div)?,
        Op::ShrImm => with_imm(state, instr, |a, imm| Some(a.checked_shr(imm).unwrap_or(0)))?,
        Op::ShlImm => with_imm(state, instr, |a, imm| Some(a.checked_shl(imm).unwrap_or(0)))?,
        Op::AndImm => with_imm(state, instr, |a, imm| Some(a & imm))?,
        Op::OrImm => with_imm(state, instr, |a, imm| Some(a | imm))?,
        Op::XorImm => with_imm(state, instr, |a, imm| Some(a ^ imm))?,
        Op::SetLtImm => with_imm(state, instr, |a, imm| Some(u32::from(a < imm)))?,
        Op::SetGtImm => with_imm(state, instr, |a, imm| Some(u32::from(a > imm)))?,
        Op::SetEqImm => with_imm(state, instr, |a, imm| Some(u32::from(a == imm)))?,
        Op::BranchGtz => {
            // The condition is signed: values with the top bit set are negative.
            if (state.reg(instr.reg(0)) as i32) > 0 {
                return Ok(Flow::Transfer(target(state, instr.reg(1), instr.imm(2))));
            }
        }

        Op::Div => divide(state, instr)?,
        Op::Mul => chain(state, instr, u32::wrapping_mul)?,
        Op::Add => chain(state, instr, u32::wrapping_add)?,
        Op::Sub => chain(state, instr, u32::wrapping_sub)?,
        Op::And => chain(state, instr, |a, b| a & b)?,
        Op::Or => chain(state, instr, |a, b| a | b)?,
        Op::Xor => chain(state, instr, |a, b| a ^ b)?,
        Op::ShuffleMove => shuffle_move(state, instr)?,
    }

    Ok(Flow::Continue)
}

/// Jump target `r[base] + offset`, wrapping at 32 bits so that an offset
/// with the top bit set moves backwards.
fn target(state: &State, base: u8, offset: u32) -> u32 {
    state.reg(base).wrapping_add(offset)
}

/// `r[o0] = r[o1] CMP r[o2]`
fn compare_regs(
    state: &mut State,
    instr: &Instruction,
    cmp: impl FnOnce(u32, u32) -> bool,
) -> Result<(), Fault> {
    let value = cmp(state.reg(instr.reg(1)), state.reg(instr.reg(2)));
    state.set_reg(instr.reg(0), u32::from(value))
}

/// `r[o0] = r[o1] OP imm`. `op` returns `None` on division by zero.
fn with_imm(
    state: &mut State,
    instr: &Instruction,
    op: impl FnOnce(u32, u32) -> Option<u32>,
) -> Result<(), Fault> {
    let dst = instr.reg(0);
    State::check_writable(dst)?;
    let value = op(state.reg(instr.reg(1)), instr.imm(2)).ok_or(Fault::ArithmeticFault)?;
    state.set_reg(dst, value)
}

/// Source operands that follow `first`, up to the first null-register
/// sentinel.
fn chained(instr: &Instruction, first: usize) -> impl Iterator<Item = u8> + '_ {
    instr.operands[first..]
        .iter()
        .map(|&operand| operand as u8)
        .take_while(|&reg| reg != NULL_REGISTER)
}

/// `r[o0] = r[o2] OP r[o3] OP ...`, folded left to right. Operand 1 is
/// unused by everything but division.
fn chain(state: &mut State, instr: &Instruction, op: fn(u32, u32) -> u32) -> Result<(), Fault> {
    let dst = instr.reg(0);
    State::check_writable(dst)?;
    let value = chained(instr, 3).fold(state.reg(instr.reg(2)), |acc, src| op(acc, state.reg(src)));
    state.set_reg(dst, value)
}

/// Quotient into `o0` and remainder into `o1` of `r[o2] / r[o3]`, then of
/// the running quotient by each further chained divisor.
fn divide(state: &mut State, instr: &Instruction) -> Result<(), Fault> {
    let (quotient_reg, remainder_reg) = (instr.reg(0), instr.reg(1));
    State::check_writable(quotient_reg)?;
    State::check_writable(remainder_reg)?;

    let mut quotient = state.reg(instr.reg(2));
    let mut remainder = 0;
    let divisors = std::iter::once(instr.reg(3)).chain(chained(instr, 4));
    for src in divisors {
        let divisor = state.reg(src);
        if divisor == 0 {
            return Err(Fault::ArithmeticFault);
        }
        remainder = quotient % divisor;
        quotient /= divisor;
    }

    state.set_reg(quotient_reg, quotient)?;
    state.set_reg(remainder_reg, remainder)
}

/// `r[o3] = r[o0]`, `r[o4] = r[o1]`, `r[o5] = r[o2]`, skipping any pair
/// whose source is the null register. All sources are read first.
fn shuffle_move(state: &mut State, instr: &Instruction) -> Result<(), Fault> {
    let mut moves = [(0u8, 0u32); 3];
    let mut count = 0;
    for i in 0..3 {
        let src = instr.reg(i);
        if src == NULL_REGISTER {
            continue;
        }
        let dst = instr.reg(i + 3);
        State::check_writable(dst)?;
        moves[count] = (dst, state.reg(src));
        count += 1;
    }

    for &(dst, value) in &moves[..count] {
        state.set_reg(dst, value)?;
    }
    Ok(())
}
