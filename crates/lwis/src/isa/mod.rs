//! The LWIS instruction set.
//!
//! An instruction word is read from the least significant bit upward:
//!
//! ```text
//! [family:8][opcode:8][operand 0][operand 1]...
//! ```
//!
//! The family id selects the operand layout (see [`Family::operand_widths`])
//! and the opcode table. Register operands are 8 bits wide, immediates 32.

mod instruction;
mod layout;
mod operation;

pub use instruction::{Fields, Instruction, Operands, Word};
pub use layout::{Family, MAX_OPERANDS, field_mask};
pub use operation::Operation;
