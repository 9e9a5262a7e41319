/// Instruction family. The family id is the low byte of every instruction
/// word and selects both the operand layout and the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Family {
    /// No operands: no-op, return.
    Nullary = 0,
    /// One register: print, read.
    OneReg = 1,
    /// Three registers: register comparisons.
    ThreeReg = 2,
    /// One register, one 32-bit immediate: load immediate, jump, call.
    OneRegOneImm = 3,
    /// Two registers, one 32-bit immediate: memory, immediate ALU, branch.
    TwoRegOneImm = 4,
    /// Six registers: chained arithmetic, shuffle move.
    SixReg = 5,
}

/// Largest operand count of any family.
pub const MAX_OPERANDS: usize = 6;

const NULLARY: &[u32] = &[];
const ONE_REG: &[u32] = &[8];
const THREE_REG: &[u32] = &[8, 8, 8];
const ONE_REG_ONE_IMM: &[u32] = &[8, 32];
const TWO_REG_ONE_IMM: &[u32] = &[8, 8, 32];
const SIX_REG: &[u32] = &[8, 8, 8, 8, 8, 8];

impl Family {
    pub const ALL: [Family; 6] = [
        Family::Nullary,
        Family::OneReg,
        Family::ThreeReg,
        Family::OneRegOneImm,
        Family::TwoRegOneImm,
        Family::SixReg,
    ];

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Nullary),
            1 => Some(Self::OneReg),
            2 => Some(Self::ThreeReg),
            3 => Some(Self::OneRegOneImm),
            4 => Some(Self::TwoRegOneImm),
            5 => Some(Self::SixReg),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Bit widths of the operand fields, lowest-order field first.
    #[must_use]
    pub const fn operand_widths(self) -> &'static [u32] {
        match self {
            Self::Nullary => NULLARY,
            Self::OneReg => ONE_REG,
            Self::ThreeReg => THREE_REG,
            Self::OneRegOneImm => ONE_REG_ONE_IMM,
            Self::TwoRegOneImm => TWO_REG_ONE_IMM,
            Self::SixReg => SIX_REG,
        }
    }

    #[must_use]
    pub const fn operand_count(self) -> usize {
        self.operand_widths().len()
    }
}

/// Mask selecting the low `width` bits of a field.
#[must_use]
pub const fn field_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
