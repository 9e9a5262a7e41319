//! Whole programs: the bundled demo images and the harness sieve.

use lwis::test_harness::{TEST_MEMORY_SIZE, sieve};
use lwis::{Machine, Program, RunOutcome, ScriptedConsole, VmConfig};

const ADD: &str = include_str!("../../../demos/add.lwis");
const DOUBLE: &str = include_str!("../../../demos/double.lwis");
const SIEVE: &str = include_str!("../../../demos/sieve.lwis");

fn run_image(text: &str, input: &[&str]) -> (RunOutcome, Vec<String>) {
    let program = Program::parse(text).unwrap();
    let config = VmConfig::default().with_memory_size(TEST_MEMORY_SIZE);
    let mut vm = Machine::new(program, config, ScriptedConsole::new(input.iter().copied()));
    let outcome = vm.run();
    (outcome, vm.into_console().into_output())
}

fn primes_below(n: u32) -> Vec<String> {
    (2..n)
        .filter(|&k| (2..k).take_while(|d| d * d <= k).all(|d| k % d != 0))
        .map(|p| format!("{p:#x}"))
        .collect()
}

#[test]
fn test_add_demo() {
    let (outcome, output) = run_image(ADD, &[]);
    let RunOutcome::Halted(stats) = outcome else {
        panic!("add demo faulted");
    };
    assert_eq!(stats.instructions_executed, 4);
    assert_eq!(output, ["0x8"]);
}

#[test]
fn test_double_demo() {
    let (outcome, output) = run_image(DOUBLE, &["21"]);
    assert!(outcome.is_halted());
    assert_eq!(output, ["0x2a"]);

    let (outcome, output) = run_image(DOUBLE, &[]);
    assert_eq!(outcome.fault(), Some(&lwis::Fault::InputExhausted));
    assert!(output.is_empty());
}

#[test]
fn test_sieve_demo() {
    let (outcome, output) = run_image(SIEVE, &[]);
    assert!(outcome.is_halted());
    assert_eq!(output.len(), 168);
    assert_eq!(output.first().map(String::as_str), Some("0x2"));
    assert_eq!(output.last().map(String::as_str), Some("0x3e5"));
    assert_eq!(output, primes_below(1000));
}

#[test]
fn test_sieve_demo_matches_harness() {
    let image = Program::parse(SIEVE).unwrap();
    let built = Program::from_instructions(&sieve(1000)).unwrap();
    assert_eq!(image.words(), built.words());
}

#[test]
fn test_harness_sieve() {
    for n in [2, 3, 10, 50] {
        let (outcome, output) = lwis::test_harness::run(&sieve(n), &[]);
        assert!(outcome.is_halted(), "sieve({n})");
        assert_eq!(output, primes_below(n), "sieve({n})");
    }
}

#[test]
fn test_sieve_needs_its_table() {
    let config = VmConfig::default().with_memory_size(40);
    let (outcome, output) = lwis::test_harness::run_with_config(&sieve(50), &[], config);
    assert!(matches!(
        outcome.fault(),
        Some(lwis::Fault::OutOfRangeMemoryAccess { capacity: 40, .. })
    ));
    assert!(output.is_empty());
}

#[test]
fn test_disassemble_demo() {
    let program = Program::parse(ADD).unwrap();
    let listing: Vec<String> = program
        .disassemble()
        .map(|(index, _, instr)| format!("{index}: {}", instr.unwrap()))
        .collect();
    assert_eq!(
        listing,
        [
            "0: li r2, 5",
            "1: li r3, 3",
            "2: add r4, r0, r2, r3, r0, r0",
            "3: print r4",
        ]
    );
}
