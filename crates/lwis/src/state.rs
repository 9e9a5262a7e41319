//! Register file, memory and call stack owned by a single run.

use crate::error::Fault;

pub const REGISTER_COUNT: usize = 256;

/// Always reads as zero; doubles as the "absent operand" sentinel.
pub const NULL_REGISTER: u8 = 0;

/// Index of the next instruction to fetch.
pub const PROGRAM_COUNTER: u8 = 1;

/// Memory capacity in cells when none is configured.
pub const DEFAULT_MEMORY_SIZE: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    pub memory_size: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
        }
    }
}

impl VmConfig {
    #[must_use]
    pub fn with_memory_size(mut self, memory_size: usize) -> Self {
        self.memory_size = memory_size;
        self
    }
}

#[derive(Debug, Clone)]
pub struct State {
    registers: [u32; REGISTER_COUNT],
    memory: Vec<u32>,
    call_stack: Vec<u32>,
}

impl State {
    #[must_use]
    pub fn new(config: &VmConfig) -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            memory: vec![0; config.memory_size],
            call_stack: Vec::new(),
        }
    }

    #[must_use]
    pub fn reg(&self, reg: u8) -> u32 {
        self.registers[usize::from(reg)]
    }

    /// Fails for the null register and the program counter, which only
    /// control transfers may change.
    pub fn check_writable(reg: u8) -> Result<(), Fault> {
        if reg == NULL_REGISTER || reg == PROGRAM_COUNTER {
            return Err(Fault::IllegalRegisterWrite(reg));
        }
        Ok(())
    }

    pub fn set_reg(&mut self, reg: u8, value: u32) -> Result<(), Fault> {
        Self::check_writable(reg)?;
        self.registers[usize::from(reg)] = value;
        Ok(())
    }

    #[must_use]
    pub fn pc(&self) -> u32 {
        self.registers[usize::from(PROGRAM_COUNTER)]
    }

    pub(crate) fn set_pc(&mut self, pc: u32) {
        self.registers[usize::from(PROGRAM_COUNTER)] = pc;
    }

    /// Compute `r[base] + offset` (wrapping at 32 bits) and check it against
    /// the memory capacity.
    pub fn address(&self, base: u8, offset: u32) -> Result<usize, Fault> {
        let address = self.reg(base).wrapping_add(offset);
        let index = address as usize;
        if index >= self.memory.len() {
            return Err(Fault::OutOfRangeMemoryAccess {
                address,
                capacity: self.memory.len(),
            });
        }
        Ok(index)
    }

    /// Read a cell at an address produced by [`State::address`].
    #[must_use]
    pub fn load(&self, index: usize) -> u32 {
        self.memory[index]
    }

    /// Write a cell at an address produced by [`State::address`].
    pub fn store(&mut self, index: usize, value: u32) {
        self.memory[index] = value;
    }

    pub fn push_return(&mut self, address: u32) {
        self.call_stack.push(address);
    }

    pub fn pop_return(&mut self) -> Result<u32, Fault> {
        self.call_stack.pop().ok_or(Fault::StackUnderflow)
    }

    #[must_use]
    pub fn registers(&self) -> &[u32] {
        &self.registers
    }

    #[must_use]
    pub fn memory(&self) -> &[u32] {
        &self.memory
    }

    #[must_use]
    pub fn call_stack(&self) -> &[u32] {
        &self.call_stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_state() -> State {
        State::new(&VmConfig::default().with_memory_size(16))
    }

    #[test]
    fn test_new_state_is_zeroed() {
        let state = small_state();
        assert!(state.registers().iter().all(|&r| r == 0));
        assert_eq!(state.memory(), &[0; 16]);
        assert!(state.call_stack().is_empty());
        assert_eq!(state.pc(), 0);
    }

    #[test]
    fn test_reserved_registers_reject_writes() {
        let mut state = small_state();
        assert_eq!(
            state.set_reg(NULL_REGISTER, 7),
            Err(Fault::IllegalRegisterWrite(0))
        );
        assert_eq!(
            state.set_reg(PROGRAM_COUNTER, 7),
            Err(Fault::IllegalRegisterWrite(1))
        );
        assert_eq!(state.reg(0), 0);
        assert_eq!(state.pc(), 0);

        state.set_reg(255, 7).unwrap();
        assert_eq!(state.reg(255), 7);
    }

    #[test]
    fn test_address_bounds() {
        let mut state = small_state();
        state.set_reg(2, 10).unwrap();
        assert_eq!(state.address(2, 5), Ok(15));
        assert_eq!(
            state.address(2, 6),
            Err(Fault::OutOfRangeMemoryAccess {
                address: 16,
                capacity: 16
            })
        );
    }

    #[test]
    fn test_address_wraps_negative_offset() {
        let mut state = small_state();
        state.set_reg(2, 10).unwrap();
        // 0xFFFF_FFFF is -1 as a two's complement offset
        assert_eq!(state.address(2, u32::MAX), Ok(9));
    }

    #[test]
    fn test_call_stack() {
        let mut state = small_state();
        assert_eq!(state.pop_return(), Err(Fault::StackUnderflow));
        state.push_return(3);
        state.push_return(9);
        assert_eq!(state.pop_return(), Ok(9));
        assert_eq!(state.pop_return(), Ok(3));
        assert_eq!(state.pop_return(), Err(Fault::StackUnderflow));
    }
}
