#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: invalid instruction word '{text}'")]
    InvalidWord { line: usize, text: String },

    #[error("Program of {0} words exceeds the addressable range of the program counter")]
    ProgramTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A condition that stops the machine. Faults are terminal: the run that
/// raised one cannot be resumed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("Illegal attempt to modify register {0}")]
    IllegalRegisterWrite(u8),

    #[error("Unknown operation: family {family}, opcode {opcode}")]
    UnknownOperation { family: u8, opcode: u8 },

    #[error("Memory address {address} is outside of memory (capacity {capacity})")]
    OutOfRangeMemoryAccess { address: u32, capacity: usize },

    #[error("Return with an empty call stack")]
    StackUnderflow,

    #[error("Division by zero")]
    ArithmeticFault,

    #[error("Malformed input: '{0}'")]
    MalformedInput(String),

    #[error("Input exhausted")]
    InputExhausted,

    #[error("Program counter {pc} is past the end of the program (length {len})")]
    ProgramCounterOutOfRange { pc: u32, len: usize },

    #[error("Console error: {0}")]
    Console(String),
}
