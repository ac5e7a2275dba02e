//! Shared test helpers for compiler integration tests.

use edubot_bytecode::{Opcode, Program, INSTRUCTION_SIZE};
use edubot_codegen::compile;

/// Compiles, panicking with the full diagnostic on failure.
#[allow(dead_code)]
pub fn compile_ok(source: &str) -> Program {
    let _ = env_logger::builder().is_test(true).try_init();
    match compile(source) {
        Ok(program) => program,
        Err(diagnostic) => panic!("compilation failed: {diagnostic}"),
    }
}

/// The opcode sequence of a program, for shape assertions.
#[allow(dead_code)]
pub fn opcodes(program: &Program) -> Vec<Opcode> {
    program.iter().map(|instruction| instruction.opcode).collect()
}

/// Decodes the byte distance stored low/high in a jump instruction's first
/// two operands.
#[allow(dead_code)]
pub fn jump_distance(program: &Program, index: usize) -> usize {
    let slots = program.get(index).unwrap().to_slots();
    slots[1] as usize + (slots[2] as usize) * 256
}

/// The instruction index a forward jump at `index` lands on.
#[allow(dead_code)]
pub fn forward_target(program: &Program, index: usize) -> usize {
    index + jump_distance(program, index) / INSTRUCTION_SIZE
}

/// The instruction index a WhileEnd at `index` lands on. The distance is
/// measured from the WhileEnd itself.
#[allow(dead_code)]
pub fn while_end_target(program: &Program, index: usize) -> usize {
    index - jump_distance(program, index) / INSTRUCTION_SIZE
}

/// The instruction index a JumpBackward at `index` lands on. The distance
/// is measured from the ForIncrement immediately preceding it.
#[allow(dead_code)]
pub fn jump_backward_target(program: &Program, index: usize) -> usize {
    (index - 1) - jump_distance(program, index) / INSTRUCTION_SIZE
}
