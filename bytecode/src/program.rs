//! Growable instruction arena with indexed backpatching and serialization.

use std::vec::Vec;

use crate::error::BytecodeError;
use crate::instruction::{Instruction, Operand, MAX_PROGRAM_SIZE, SLOTS_PER_INSTRUCTION};

/// An ordered sequence of instructions under construction.
///
/// Forward jumps are emitted with placeholder distances and patched in place
/// once their target is known. Patching is an indexed write that only
/// touches operands 1 and 2 of jump instructions.
#[derive(Debug, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            instructions: Vec::new(),
        }
    }

    /// Appends an instruction and returns its index.
    ///
    /// Fails once the program reaches [`MAX_PROGRAM_SIZE`] instructions.
    pub fn push(&mut self, instruction: Instruction) -> Result<usize, BytecodeError> {
        if self.instructions.len() >= MAX_PROGRAM_SIZE {
            return Err(BytecodeError::ProgramTooLarge);
        }
        let index = self.instructions.len();
        self.instructions.push(instruction);
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Writes a jump distance into a previously emitted forward jump.
    ///
    /// The distance is stored split across operands 1 and 2 as low and high
    /// bytes. Refuses to touch instructions that are not forward jumps.
    pub fn patch_jump(&mut self, index: usize, distance: u16) -> Result<(), BytecodeError> {
        let instruction = self
            .instructions
            .get_mut(index)
            .ok_or(BytecodeError::PatchOutOfBounds(index))?;
        if !instruction.opcode.is_patchable_jump() {
            return Err(BytecodeError::PatchNotAJump(instruction.opcode as u8));
        }
        let [low, high] = distance.to_le_bytes();
        instruction.operands[0] = Operand::Immediate(low as f32);
        instruction.operands[1] = Operand::Immediate(high as f32);
        Ok(())
    }

    /// Serializes to the flat wire buffer: five f32 slots per instruction,
    /// in emission order.
    pub fn to_words(&self) -> Vec<f32> {
        let mut words = Vec::with_capacity(self.instructions.len() * SLOTS_PER_INSTRUCTION);
        for instruction in &self.instructions {
            words.extend_from_slice(&instruction.to_slots());
        }
        words
    }

    /// Serializes to bytes: each f32 slot in little-endian order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.instructions.len() * SLOTS_PER_INSTRUCTION * 4);
        for word in self.to_words() {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }
}
