use std::fmt;

use super::{Family, MAX_OPERANDS, Operation, field_mask};
use crate::error::Fault;

/// A packed instruction word as stored in the program image.
pub type Word = u64;

/// Decoded operand fields. Slots past the family's operand count are 0.
pub type Operands = [u32; MAX_OPERANDS];

/// Bits taken by the family id and the opcode at the bottom of every word.
const HEADER_BITS: u32 = 16;

/// The raw fields of an instruction word, before the `(family, opcode)` pair
/// has been resolved against the operation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fields {
    pub family: u8,
    pub opcode: u8,
    pub operands: Operands,
}

impl Fields {
    /// Split a word into family id, opcode and operand fields. Operands are
    /// only extracted when the family id names a known layout.
    #[must_use]
    pub fn split(word: Word) -> Self {
        let family = (word & field_mask(8)) as u8;
        let opcode = ((word >> 8) & field_mask(8)) as u8;

        let mut operands = [0; MAX_OPERANDS];
        if let Some(layout) = Family::from_id(family) {
            let mut rest = word >> HEADER_BITS;
            for (slot, &width) in operands.iter_mut().zip(layout.operand_widths()) {
                *slot = (rest & field_mask(width)) as u32;
                rest >>= width;
            }
        }

        Self {
            family,
            opcode,
            operands,
        }
    }

    /// Resolve the fields against the operation matrix.
    pub fn resolve(&self) -> Result<Instruction, Fault> {
        let unknown = Fault::UnknownOperation {
            family: self.family,
            opcode: self.opcode,
        };
        let family = Family::from_id(self.family).ok_or_else(|| unknown.clone())?;
        let operation = Operation::lookup(family, self.opcode).ok_or(unknown)?;
        Ok(Instruction {
            operation,
            operands: self.operands,
        })
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "family {} opcode {} operands {:?}",
            self.family, self.opcode, self.operands
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Operation,
    pub operands: Operands,
}

impl Instruction {
    /// Build an instruction from its leading operands. Missing operands are 0.
    ///
    /// # Panics
    ///
    /// Panics if more operands are supplied than the family declares.
    #[must_use]
    pub fn new(operation: Operation, operands: &[u32]) -> Self {
        let count = operation.family().operand_count();
        assert!(
            operands.len() <= count,
            "{operation:?} takes {count} operands, got {}",
            operands.len()
        );
        let mut packed = [0; MAX_OPERANDS];
        packed[..operands.len()].copy_from_slice(operands);
        Self {
            operation,
            operands: packed,
        }
    }

    /// Decode one instruction word.
    pub fn decode(word: Word) -> Result<Self, Fault> {
        Fields::split(word).resolve()
    }

    /// Pack the instruction into a word. Each operand is truncated to its
    /// field width; operands past the family's count are not encoded.
    #[must_use]
    pub fn encode(&self) -> Word {
        let family = self.operation.family();
        let mut word = Word::from(family.id()) | (Word::from(self.operation.opcode()) << 8);
        let mut shift = HEADER_BITS;
        for (&operand, &width) in self.operands.iter().zip(family.operand_widths()) {
            word |= (Word::from(operand) & field_mask(width)) << shift;
            shift += width;
        }
        word
    }

    #[must_use]
    pub fn fields(&self) -> Fields {
        Fields {
            family: self.operation.family().id(),
            opcode: self.operation.opcode(),
            operands: self.operands,
        }
    }

    /// Operand `i` read as a register index.
    #[must_use]
    pub const fn reg(&self, i: usize) -> u8 {
        self.operands[i] as u8
    }

    /// Operand `i` read as an immediate.
    #[must_use]
    pub const fn imm(&self, i: usize) -> u32 {
        self.operands[i]
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = self.operation.family();
        write!(f, "{}", self.operation.mnemonic())?;
        for (i, &width) in family.operand_widths().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            if width == 8 {
                write!(f, "{sep}r{}", self.reg(i))?;
            } else {
                write!(f, "{sep}{}", self.imm(i))?;
            }
        }
        Ok(())
    }
}
