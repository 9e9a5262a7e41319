//! Property-based tests for the LWIS decoder and execution engine.
//!
//! Uses `proptest` to verify invariants over random inputs:
//! - Decoding then re-encoding reproduces every consumed bit of a word
//! - Register 0 reads as zero after every step of any program
//! - Faulting register writes leave the register file untouched
//! - Chained arithmetic equals the same operation applied pairwise
//! - The conditional jump branches exactly on positive signed values

use lwis::isa::{Fields, field_mask};
use lwis::test_harness::*;
use lwis::{Fault, Instruction, Operation, Step, VmConfig};
use proptest::prelude::*;

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop::sample::select(Operation::ALL.to_vec())
}

/// Instructions that never transfer control, over a small register window so
/// that the reserved registers are hit often.
fn data_instruction_strategy() -> impl Strategy<Value = Instruction> {
    let data_ops: Vec<Operation> = Operation::ALL
        .into_iter()
        .filter(|op| !op.is_control_transfer() && *op != Operation::Read)
        .collect();
    (
        prop::sample::select(data_ops),
        prop::array::uniform6(0u32..6),
        0u32..16,
    )
        .prop_map(|(op, regs, imm)| {
            let mut operands = regs;
            for (slot, &width) in op.family().operand_widths().iter().enumerate() {
                if width == 32 {
                    operands[slot] = imm;
                }
            }
            let count = op.family().operand_count();
            Instruction::new(op, &operands[..count])
        })
}

proptest! {
    #[test]
    fn decode_reencode_preserves_consumed_bits(op in operation_strategy(), upper in any::<u64>()) {
        let word = (upper << 16) | u64::from(op.family().id()) | (u64::from(op.opcode()) << 8);
        let decoded = Instruction::decode(word).unwrap();
        prop_assert_eq!(decoded.operation, op);

        let consumed: u32 = 16 + op.family().operand_widths().iter().sum::<u32>();
        prop_assert_eq!(decoded.encode(), word & field_mask(consumed));
    }

    #[test]
    fn encode_decode_preserves_fields(op in operation_strategy(), operands in prop::array::uniform6(any::<u32>())) {
        let family = op.family();
        let count = family.operand_count();
        let instr = Instruction::new(op, &operands[..count]);
        let fields = Fields::split(instr.encode());

        prop_assert_eq!(fields.family, family.id());
        prop_assert_eq!(fields.opcode, op.opcode());
        for (i, &width) in family.operand_widths().iter().enumerate() {
            prop_assert_eq!(u64::from(fields.operands[i]), u64::from(operands[i]) & field_mask(width));
        }
        prop_assert!(fields.operands[count..].iter().all(|&o| o == 0));
    }

    #[test]
    fn null_register_always_reads_zero(program in prop::collection::vec(data_instruction_strategy(), 1..24)) {
        let mut vm = machine(&program, &[], VmConfig::default().with_memory_size(32));
        loop {
            let before = vm.state().registers().to_vec();
            let step = vm.step();
            prop_assert_eq!(vm.state().reg(0), 0);
            match step {
                Ok(Step::Running) => {}
                Ok(Step::Halted) => break,
                Err(report) => {
                    prop_assert_eq!(vm.state().registers(), &before[..]);
                    if let Fault::IllegalRegisterWrite(reg) = report.fault {
                        prop_assert!(reg < 2);
                    }
                    break;
                }
            }
        }
    }

    #[test]
    fn chained_matches_pairwise(
        op in prop::sample::select(vec![
            Operation::Add, Operation::Sub, Operation::Mul,
            Operation::And, Operation::Or, Operation::Xor,
        ]),
        values in prop::array::uniform4(any::<u32>()),
        len in 2usize..=4,
    ) {
        let apply = |a: u32, b: u32| match op {
            Operation::Add => a.wrapping_add(b),
            Operation::Sub => a.wrapping_sub(b),
            Operation::Mul => a.wrapping_mul(b),
            Operation::And => a & b,
            Operation::Or => a | b,
            _ => a ^ b,
        };

        let mut program: Vec<Instruction> = (0u8..4)
            .map(|i| li(10 + i, values[usize::from(i)]))
            .collect();
        let srcs: Vec<u8> = (10u8..).take(len).collect();
        program.push(chain(op, 20, &srcs));

        // the same computation as a sequence of two-operand instructions
        program.push(chain(op, 21, &srcs[..2]));
        for &src in &srcs[2..] {
            program.push(chain(op, 21, &[21, src]));
        }
        program.push(print(20));
        program.push(print(21));

        let (outcome, output) = run(&program, &[]);
        prop_assert!(outcome.is_halted());

        let expected = values[1..len].iter().fold(values[0], |acc, &v| apply(acc, v));
        prop_assert_eq!(&output[0], &format!("{expected:#x}"));
        prop_assert_eq!(&output[0], &output[1]);
    }

    #[test]
    fn divide_chain_matches_pairwise(
        dividend in any::<u32>(),
        divisors in prop::array::uniform3(1u32..1000),
    ) {
        let program = [
            li(2, dividend),
            li(3, divisors[0]),
            li(4, divisors[1]),
            li(5, divisors[2]),
            div(6, 7, &[2, 3, 4, 5]),
            div(8, 9, &[2, 3]),
            div(8, 9, &[8, 4]),
            div(8, 9, &[8, 5]),
            print(6),
            print(7),
            print(8),
            print(9),
        ];
        let (outcome, output) = run(&program, &[]);
        prop_assert!(outcome.is_halted());
        prop_assert_eq!(&output[0], &output[2]);
        prop_assert_eq!(&output[1], &output[3]);
    }

    #[test]
    fn conditional_jump_iff_positive(value in any::<u32>()) {
        let program = [
            li(2, value),
            jgtz(2, 0, 4),
            li(3, 0xA),
            jmp(0, 5),
            li(3, 0xB),
            print(3),
        ];
        let (outcome, output) = run(&program, &[]);
        prop_assert!(outcome.is_halted());
        let taken = output == ["0xb"];
        prop_assert_eq!(taken, (value as i32) > 0);
    }
}
