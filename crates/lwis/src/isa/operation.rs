use super::Family;

/// Every operation of the instruction set, one variant per `(family, opcode)`
/// pair. `Operation::lookup` is the dispatch matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Family 0
    Nop,
    Return,
    // Family 1
    Print,
    Read,
    // Family 2: d = a OP b
    SetLt,
    SetGt,
    SetEq,
    SetGe,
    SetLe,
    // Family 3
    LoadImm,
    Jump,
    Call,
    // Family 4: d, s, imm
    Store,
    Load,
    AddImm,
    SubImm,
    MulImm,
    DivImm,
    ShrImm,
    ShlImm,
    AndImm,
    OrImm,
    XorImm,
    SetLtImm,
    SetGtImm,
    SetEqImm,
    BranchGtz,
    // Family 5: chained over operands 2..6
    Div,
    Mul,
    Add,
    Sub,
    And,
    Or,
    Xor,
    ShuffleMove,
}

impl Operation {
    pub const ALL: [Operation; 35] = [
        Self::Nop,
        Self::Return,
        Self::Print,
        Self::Read,
        Self::SetLt,
        Self::SetGt,
        Self::SetEq,
        Self::SetGe,
        Self::SetLe,
        Self::LoadImm,
        Self::Jump,
        Self::Call,
        Self::Store,
        Self::Load,
        Self::AddImm,
        Self::SubImm,
        Self::MulImm,
        Self::DivImm,
        Self::ShrImm,
        Self::ShlImm,
        Self::AndImm,
        Self::OrImm,
        Self::XorImm,
        Self::SetLtImm,
        Self::SetGtImm,
        Self::SetEqImm,
        Self::BranchGtz,
        Self::Div,
        Self::Mul,
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::ShuffleMove,
    ];

    /// Resolve a decoded `(family, opcode)` pair. Returns `None` for opcodes
    /// the family does not define.
    #[must_use]
    pub const fn lookup(family: Family, opcode: u8) -> Option<Self> {
        let op = match (family, opcode) {
            (Family::Nullary, 0) => Self::Nop,
            (Family::Nullary, 1) => Self::Return,

            (Family::OneReg, 0) => Self::Print,
            (Family::OneReg, 1) => Self::Read,

            (Family::ThreeReg, 0) => Self::SetLt,
            (Family::ThreeReg, 1) => Self::SetGt,
            (Family::ThreeReg, 2) => Self::SetEq,
            (Family::ThreeReg, 3) => Self::SetGe,
            (Family::ThreeReg, 4) => Self::SetLe,

            (Family::OneRegOneImm, 0) => Self::LoadImm,
            (Family::OneRegOneImm, 1) => Self::Jump,
            (Family::OneRegOneImm, 2) => Self::Call,

            (Family::TwoRegOneImm, 0) => Self::Store,
            (Family::TwoRegOneImm, 1) => Self::Load,
            (Family::TwoRegOneImm, 2) => Self::AddImm,
            (Family::TwoRegOneImm, 3) => Self::SubImm,
            (Family::TwoRegOneImm, 4) => Self::MulImm,
            (Family::TwoRegOneImm, 5) => Self::DivImm,
            (Family::TwoRegOneImm, 6) => Self::ShrImm,
            (Family::TwoRegOneImm, 7) => Self::ShlImm,
            (Family::TwoRegOneImm, 8) => Self::AndImm,
            (Family::TwoRegOneImm, 9) => Self::OrImm,
            (Family::TwoRegOneImm, 10) => Self::XorImm,
            (Family::TwoRegOneImm, 11) => Self::SetLtImm,
            (Family::TwoRegOneImm, 12) => Self::SetGtImm,
            (Family::TwoRegOneImm, 13) => Self::SetEqImm,
            (Family::TwoRegOneImm, 14) => Self::BranchGtz,

            (Family::SixReg, 0) => Self::Div,
            (Family::SixReg, 1) => Self::Mul,
            (Family::SixReg, 2) => Self::Add,
            (Family::SixReg, 3) => Self::Sub,
            (Family::SixReg, 4) => Self::And,
            (Family::SixReg, 5) => Self::Or,
            (Family::SixReg, 6) => Self::Xor,
            (Family::SixReg, 7) => Self::ShuffleMove,

            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::Nop | Self::Return => Family::Nullary,
            Self::Print | Self::Read => Family::OneReg,
            Self::SetLt | Self::SetGt | Self::SetEq | Self::SetGe | Self::SetLe => Family::ThreeReg,
            Self::LoadImm | Self::Jump | Self::Call => Family::OneRegOneImm,
            Self::Store
            | Self::Load
            | Self::AddImm
            | Self::SubImm
            | Self::MulImm
            | Self::DivImm
            | Self::ShrImm
            | Self::ShlImm
            | Self::AndImm
            | Self::OrImm
            | Self::XorImm
            | Self::SetLtImm
            | Self::SetGtImm
            | Self::SetEqImm
            | Self::BranchGtz => Family::TwoRegOneImm,
            Self::Div
            | Self::Mul
            | Self::Add
            | Self::Sub
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::ShuffleMove => Family::SixReg,
        }
    }

    /// Opcode of this operation within its family.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        match self {
            Self::Nop
            | Self::Print
            | Self::SetLt
            | Self::LoadImm
            | Self::Store
            | Self::Div => 0,
            Self::Return
            | Self::Read
            | Self::SetGt
            | Self::Jump
            | Self::Load
            | Self::Mul => 1,
            Self::SetEq | Self::Call | Self::AddImm | Self::Add => 2,
            Self::SetGe | Self::SubImm | Self::Sub => 3,
            Self::SetLe | Self::MulImm | Self::And => 4,
            Self::DivImm | Self::Or => 5,
            Self::ShrImm | Self::Xor => 6,
            Self::ShlImm | Self::ShuffleMove => 7,
            Self::AndImm => 8,
            Self::OrImm => 9,
            Self::XorImm => 10,
            Self::SetLtImm => 11,
            Self::SetGtImm => 12,
            Self::SetEqImm => 13,
            Self::BranchGtz => 14,
        }
    }

    /// Operations that set the program counter themselves. The engine does
    /// not advance the counter after these unless they decline to branch.
    #[must_use]
    pub const fn is_control_transfer(self) -> bool {
        matches!(
            self,
            Self::Return | Self::Jump | Self::Call | Self::BranchGtz
        )
    }

    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "nop",
            Self::Return => "ret",
            Self::Print => "print",
            Self::Read => "read",
            Self::SetLt => "lt",
            Self::SetGt => "gt",
            Self::SetEq => "eq",
            Self::SetGe => "ge",
            Self::SetLe => "le",
            Self::LoadImm => "li",
            Self::Jump => "jmp",
            Self::Call => "call",
            Self::Store => "st",
            Self::Load => "ld",
            Self::AddImm => "addi",
            Self::SubImm => "subi",
            Self::MulImm => "muli",
            Self::DivImm => "divi",
            Self::ShrImm => "shri",
            Self::ShlImm => "shli",
            Self::AndImm => "andi",
            Self::OrImm => "ori",
            Self::XorImm => "xori",
            Self::SetLtImm => "lti",
            Self::SetGtImm => "gti",
            Self::SetEqImm => "eqi",
            Self::BranchGtz => "jgtz",
            Self::Div => "div",
            Self::Mul => "mul",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::ShuffleMove => "shuf",
        }
    }
}
